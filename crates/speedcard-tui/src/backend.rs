//! Background worker that keeps document rendering off the UI loop.

use speedcard_core::Exporter;
use speedcard_reporting::FileExporter;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{WorkerCommand, WorkerEvent};

/// Receive commands until the channel closes or `cancel` fires.
///
/// Each export runs in its own task so a slow PDF never delays the next
/// command; results are reported in completion order.
pub async fn run_worker(
    mut cmd_rx: mpsc::UnboundedReceiver<WorkerCommand>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
    exporter: FileExporter,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(WorkerCommand::Export { entries, format }) => {
                    let exporter = exporter.clone().with_format(format);
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        let outcome = export_blocking(exporter, entries).await;
                        // The UI may already be gone on shutdown.
                        let _ = tx.send(WorkerEvent::ExportFinished(outcome));
                    });
                }
                None => break,
            }
        }
    }
    tracing::debug!("worker stopped");
}

async fn export_blocking(
    exporter: FileExporter,
    entries: Vec<speedcard_core::Entry>,
) -> Result<speedcard_core::ExportArtifact, String> {
    let count = entries.len();
    let result = tokio::task::spawn_blocking(move || exporter.export(&entries)).await;
    match result {
        Ok(Ok(artifact)) => {
            tracing::info!(path = %artifact.path.display(), entries = count, "export finished");
            Ok(artifact)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "export failed");
            Err(e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "export task panicked");
            Err(format!("export task failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedcard_core::EntryList;
    use speedcard_reporting::ExportFormat;

    #[tokio::test]
    async fn export_command_reports_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "speed_dating_choices.pdf");
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_worker(cmd_rx, event_tx, exporter, cancel.clone()));

        let entries = EntryList::create_default(3, "Person").toggle_flag(2).flagged();
        cmd_tx
            .send(WorkerCommand::Export {
                entries,
                format: ExportFormat::Text,
            })
            .unwrap();

        let Some(WorkerEvent::ExportFinished(outcome)) = event_rx.recv().await else {
            panic!("worker closed without reporting");
        };
        let artifact = outcome.unwrap();
        assert_eq!(artifact.path, dir.path().join("speed_dating_choices.txt"));
        assert_eq!(
            std::fs::read_to_string(&artifact.path).unwrap(),
            "Person 2\n"
        );

        cancel.cancel();
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn failures_come_back_as_messages() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path(), "out.pdf");
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(
            cmd_rx,
            event_tx,
            exporter,
            CancellationToken::new(),
        ));

        cmd_tx
            .send(WorkerCommand::Export {
                entries: Vec::new(),
                format: ExportFormat::Pdf,
            })
            .unwrap();
        let Some(WorkerEvent::ExportFinished(outcome)) = event_rx.recv().await else {
            panic!("worker closed without reporting");
        };
        assert!(outcome.is_err());

        drop(cmd_tx);
        worker.await.unwrap();
    }
}
