//! A4 PDF rendering of the choices list.
//!
//! Text is laid out top to bottom from a fixed margin, one line per row,
//! starting a new page whenever the next row would cross the bottom margin.

use std::fs::File;
use std::path::PathBuf;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Pt};
use speedcard_core::Entry;
use speedcard_core::export::format_choices;

use crate::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
/// Distance from the top and left page edges, in points.
const MARGIN_PT: f32 = 10.0;
/// Extra leading added to the font size between rows, in points.
const LINE_GAP_PT: f32 = 4.0;
const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// TrueType font to embed. Helvetica is used when unset, which only
    /// covers WinAnsi text.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub title: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 12.0,
            title: "Speed dating choices".to_string(),
        }
    }
}

/// A row of text positioned on a page, `y` measured in points from the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

/// Split `text` into pages of positioned rows.
///
/// Blank rows are kept so entries stay visually separated.
pub fn layout_lines(text: &str, page_height_pt: f32, font_size: f32) -> Vec<Vec<PlacedLine>> {
    let advance = font_size + LINE_GAP_PT;
    let top = page_height_pt - MARGIN_PT;
    let mut pages = vec![Vec::new()];
    let mut y = top;

    for line in text.split('\n') {
        if y < MARGIN_PT {
            pages.push(Vec::new());
            y = top;
        }
        if let Some(page) = pages.last_mut() {
            page.push(PlacedLine {
                text: line.to_string(),
                y,
            });
        }
        y -= advance;
    }
    pages
}

/// Characters the built-in fonts can draw outside Latin-1: the
/// WinAnsiEncoding block at 0x80..=0x9F.
const WIN_ANSI_EXTRA: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

fn win_ansi_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF)
        || c.is_ascii_control()
        || WIN_ANSI_EXTRA.contains(c)
}

/// First character in `text` the built-in Helvetica cannot show.
pub fn first_unencodable(text: &str) -> Option<char> {
    text.chars().find(|&c| !win_ansi_encodable(c))
}

fn load_font(
    doc: &PdfDocumentReference,
    options: &PdfOptions,
    text: &str,
) -> Result<IndirectFontRef, ReportError> {
    match &options.font_path {
        Some(path) => {
            let font_err = |message: String| ReportError::Font {
                path: path.display().to_string(),
                message,
            };
            let file = File::open(path).map_err(|e| font_err(e.to_string()))?;
            doc.add_external_font(file)
                .map_err(|e| font_err(format!("{e:?}")))
        }
        None => {
            // The built-in font would silently drop anything else.
            if let Some(ch) = first_unencodable(text) {
                return Err(ReportError::Unencodable { ch });
            }
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| ReportError::Pdf(format!("{e:?}")))
        }
    }
}

/// Render flagged entries into an in-memory PDF document.
pub fn render_pdf(entries: &[Entry], options: &PdfOptions) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        options.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let text = format_choices(entries);
    let font = load_font(&doc, options, &text)?;

    let page_height_pt = Pt::from(Mm(PAGE_HEIGHT_MM)).0;
    let pages = layout_lines(&text, page_height_pt, options.font_size);

    for (idx, rows) in pages.iter().enumerate() {
        let (page, layer) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
        };
        let layer = doc.get_page(page).get_layer(layer);
        for row in rows.iter().filter(|r| !r.text.is_empty()) {
            layer.use_text(
                row.text.as_str(),
                options.font_size,
                Mm::from(Pt(MARGIN_PT)),
                Mm::from(Pt(row.y)),
                &font,
            );
        }
    }

    tracing::debug!(entries = entries.len(), pages = pages.len(), "rendered PDF");
    doc.save_to_bytes()
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))
}
