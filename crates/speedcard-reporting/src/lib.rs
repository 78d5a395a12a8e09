use thiserror::Error;

pub mod export;
pub mod pdf;

pub use export::{FileExporter, export_to_path, render, render_markdown, render_text};
pub use pdf::{PdfOptions, render_pdf};

/// Output document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Text,
    Markdown,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Pdf, ExportFormat::Text, ExportFormat::Markdown]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Text => "Plain Text",
            Self::Markdown => "Markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }

    /// Parse a config/CLI name (`pdf`, `text`/`txt`, `markdown`/`md`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "text" | "txt" => Some(Self::Text),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// The next format in [`ExportFormat::all`] order, wrapping.
    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("could not load font {path}: {message}")]
    Font { path: String, message: String },
    #[error("'{ch}' is not in the built-in PDF font; set export.font_path to a Unicode TrueType font")]
    Unencodable { ch: char },
}

impl From<ReportError> for speedcard_core::ExportError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io(e) => Self::Io(e),
            other => Self::Render(other.to_string()),
        }
    }
}
