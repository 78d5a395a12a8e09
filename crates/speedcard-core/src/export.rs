use std::path::PathBuf;

use crate::ExportError;
use crate::entry::Entry;

/// Filename the downloadable document is saved under by default.
pub const DEFAULT_EXPORT_FILENAME: &str = "speed_dating_choices.pdf";

/// A document produced by an [`Exporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// Turns the flagged entries into a document.
///
/// Never called with an empty slice by [`crate::Session`].
pub trait Exporter: Send + Sync {
    fn export(&self, entries: &[Entry]) -> Result<ExportArtifact, ExportError>;
}

/// Result of an export request as seen by the session's caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nobody is flagged; the gate was opened instead.
    Blocked,
    Exported(ExportArtifact),
    /// The exporter failed. Logged, never propagated.
    Failed(String),
}

/// One line per entry (`Name` or `Name (note)`), entries separated by a blank line.
pub fn format_choices(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(format_choice)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_choice(entry: &Entry) -> String {
    if entry.note.is_empty() {
        entry.name.clone()
    } else {
        format!("{} ({})", entry.name, entry.note)
    }
}
