use std::io::Write;
use std::path::{Path, PathBuf};

use speedcard_core::export::{ExportArtifact, Exporter, format_choices};
use speedcard_core::{Entry, ExportError};

use crate::pdf::{PdfOptions, render_pdf};
use crate::{ExportFormat, ReportError};

/// Plain text: the choices list followed by a trailing newline.
pub fn render_text(entries: &[Entry]) -> String {
    let mut out = format_choices(entries);
    out.push('\n');
    out
}

/// Markdown: a title heading and one bullet per entry, notes in italics.
pub fn render_markdown(entries: &[Entry], title: &str) -> String {
    let mut out = format!("# {}\n\n", title);
    for entry in entries {
        if entry.note.is_empty() {
            out.push_str(&format!("- {}\n", escape_md(&entry.name)));
        } else {
            out.push_str(&format!(
                "- {} _({})_\n",
                escape_md(&entry.name),
                escape_md(&entry.note.replace('\n', " "))
            ));
        }
    }
    out
}

fn escape_md(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render entries in the given format.
pub fn render(
    entries: &[Entry],
    format: ExportFormat,
    pdf: &PdfOptions,
) -> Result<Vec<u8>, ReportError> {
    match format {
        ExportFormat::Pdf => render_pdf(entries, pdf),
        ExportFormat::Text => Ok(render_text(entries).into_bytes()),
        ExportFormat::Markdown => Ok(render_markdown(entries, &pdf.title).into_bytes()),
    }
}

/// Render and write to `path` atomically. Returns the number of bytes written.
pub fn export_to_path(
    entries: &[Entry],
    format: ExportFormat,
    pdf: &PdfOptions,
    path: &Path,
) -> Result<usize, ReportError> {
    let bytes = render(entries, format, pdf)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), format = format.label(), "export written");
    Ok(bytes.len())
}

/// Writes the document into a directory on disk.
///
/// The configured filename's stem is kept; the extension follows `format`.
#[derive(Debug, Clone)]
pub struct FileExporter {
    pub dir: PathBuf,
    pub filename: String,
    pub format: ExportFormat,
    pub pdf: PdfOptions,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
            format: ExportFormat::default(),
            pdf: PdfOptions::default(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pdf_options(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir
            .join(&self.filename)
            .with_extension(self.format.extension())
    }
}

impl Exporter for FileExporter {
    fn export(&self, entries: &[Entry]) -> Result<ExportArtifact, ExportError> {
        if entries.is_empty() {
            return Err(ExportError::Empty);
        }
        let path = self.target_path();
        let bytes_written = export_to_path(entries, self.format, &self.pdf, &path)?;
        Ok(ExportArtifact {
            path,
            bytes_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedcard_core::EntryList;

    fn sample() -> Vec<Entry> {
        EntryList::create_default(6, "Person")
            .toggle_flag(2)
            .toggle_flag(5)
            .set_note(5, "likes_jazz")
            .flagged()
    }

    #[test]
    fn text_matches_choice_format() {
        assert_eq!(
            render_text(&sample()),
            "Person 2\n\nPerson 5 (likes_jazz)\n"
        );
    }

    #[test]
    fn markdown_lists_entries_with_escaped_notes() {
        let md = render_markdown(&sample(), "Choices");
        assert_eq!(
            md,
            "# Choices\n\n- Person 2\n- Person 5 _(likes\\_jazz)_\n"
        );
    }

    #[test]
    fn file_exporter_writes_pdf_under_configured_name() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "speed_dating_choices.pdf");
        let artifact = exporter.export(&sample()).unwrap();
        assert_eq!(artifact.path, dir.path().join("speed_dating_choices.pdf"));
        let bytes = std::fs::read(&artifact.path).unwrap();
        assert_eq!(bytes.len(), artifact.bytes_written);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn extension_follows_format() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "speed_dating_choices.pdf")
            .with_format(ExportFormat::Text);
        let artifact = exporter.export(&sample()).unwrap();
        assert_eq!(artifact.path, dir.path().join("speed_dating_choices.txt"));
        let text = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(text.starts_with("Person 2"));
    }

    #[test]
    fn pdf_with_polish_note_needs_a_font_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "speed_dating_choices.pdf");
        let entries = EntryList::create_default(3, "Numer")
            .toggle_flag(1)
            .set_note(1, "Łucja żółć")
            .flagged();
        let err = exporter.export(&entries).unwrap_err();
        assert!(matches!(&err, ExportError::Render(msg) if msg.contains("export.font_path")));
        assert!(!dir.path().join("speed_dating_choices.pdf").exists());

        // Text formats carry the note unchanged.
        let text = exporter.clone().with_format(ExportFormat::Text);
        let artifact = text.export(&entries).unwrap();
        let written = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(written, "Numer 1 (Łucja żółć)\n");
    }

    #[test]
    fn exporting_nothing_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "out.pdf");
        assert!(matches!(exporter.export(&[]), Err(ExportError::Empty)));
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[test]
    fn creates_missing_export_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let exporter =
            FileExporter::new(&nested, "choices").with_format(ExportFormat::Markdown);
        let artifact = exporter.export(&sample()).unwrap();
        assert_eq!(artifact.path, nested.join("choices.md"));
        assert!(artifact.path.exists());
    }
}
