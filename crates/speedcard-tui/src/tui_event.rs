use speedcard_core::{Entry, ExportArtifact};
use speedcard_reporting::ExportFormat;

/// Commands sent from the TUI to the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerCommand {
    /// Render and write the given flagged entries.
    Export {
        entries: Vec<Entry>,
        format: ExportFormat,
    },
}

/// Events flowing from the worker back to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    ExportFinished(Result<ExportArtifact, String>),
}
