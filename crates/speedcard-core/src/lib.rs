use thiserror::Error;

pub mod config_file;
pub mod entry;
pub mod export;
pub mod gate;
pub mod pagination;
pub mod session;
pub mod store;
pub mod summary;

// Re-export for convenience
pub use config_file::{ConfigFile, RosterSettings, Settings};
pub use entry::{Entry, EntryList};
pub use export::{ExportArtifact, ExportOutcome, Exporter, format_choices};
pub use gate::{Gate, GateMode, GateState};
pub use pagination::{PagePolicy, Pager};
pub use session::Session;
pub use store::{
    FileBackend, MemoryBackend, PersistentStore, SnapshotStore, StorageBackend,
};
pub use summary::SummaryView;

/// Failure to read or write the snapshot slot.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page {requested} is outside 1..={total}")]
    OutOfRange { requested: i64, total: usize },
    #[error("roster has no pages")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("no confirmation pending")]
    NothingToConfirm,
    #[error("{0:?} can only be dismissed")]
    NotConfirmable(GateMode),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document generation failed: {0}")]
    Render(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
