use crate::config_file::RosterSettings;
use crate::entry::{Entry, EntryList};
use crate::export::{ExportOutcome, Exporter};
use crate::gate::{Gate, GateMode};
use crate::pagination::{DEFAULT_PAGE_SIZE, PagePolicy, Pager, slice_for_page};
use crate::store::PersistentStore;
use crate::summary::SummaryView;
use crate::{GateError, PageError, StoreError};

/// Owns the canonical roster and every piece of state derived from it.
///
/// Each user event is one method call that runs to completion; list
/// mutations are saved through the injected store before returning.
pub struct Session<P> {
    store: P,
    roster: RosterSettings,
    list: EntryList,
    pager: Pager,
    gate: Gate,
    summary: SummaryView,
}

impl<P: PersistentStore> Session<P> {
    /// Load the stored roster, or start from the default one.
    pub fn open(store: P, roster: &RosterSettings, policy: PagePolicy) -> Self {
        let list = match store.load() {
            Some(list) => {
                tracing::info!(
                    entries = list.len(),
                    flagged = list.flagged_count(),
                    "restored roster"
                );
                list
            }
            None => {
                tracing::info!(entries = roster.size, "starting fresh roster");
                EntryList::create_default(roster.size, &roster.name_prefix)
            }
        };
        let pager = Pager::new(list.len(), policy);

        Self {
            store,
            roster: roster.clone(),
            list,
            pager,
            gate: Gate::new(),
            summary: SummaryView::default(),
        }
    }

    pub fn list(&self) -> &EntryList {
        &self.list
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn roster(&self) -> &RosterSettings {
        &self.roster
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    // ── Entry mutations ─────────────────────────────────────────────

    /// Invert the flag on `id` and save. The in-memory list is updated even
    /// when the save fails.
    pub fn toggle_flag(&mut self, id: u32) -> Result<(), StoreError> {
        let next = self.list.toggle_flag(id);
        self.replace(next)
    }

    /// Replace the note on `id` verbatim and save.
    pub fn set_note(&mut self, id: u32, text: &str) -> Result<(), StoreError> {
        let next = self.list.set_note(id, text);
        self.replace(next)
    }

    fn replace(&mut self, next: EntryList) -> Result<(), StoreError> {
        if next == self.list {
            return Ok(());
        }
        self.list = next;
        self.store.save(&self.list).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to save roster");
        })
    }

    // ── Paging ──────────────────────────────────────────────────────

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total()
    }

    pub fn go_to_page(&mut self, requested: i64) -> Result<usize, PageError> {
        self.pager.go_to(requested).inspect_err(|e| {
            tracing::debug!(requested, error = %e, "page change refused");
        })
    }

    pub fn next_page(&mut self) -> usize {
        self.pager.next()
    }

    pub fn prev_page(&mut self) -> usize {
        self.pager.prev()
    }

    pub fn first_page(&mut self) -> usize {
        self.pager.first()
    }

    pub fn last_page(&mut self) -> usize {
        self.pager.last()
    }

    /// Entries on the current page (one, with the default page size).
    pub fn current_slice(&self) -> &[Entry] {
        slice_for_page(self.list.entries(), self.pager.current(), DEFAULT_PAGE_SIZE)
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        self.current_slice().first()
    }

    // ── Gate ────────────────────────────────────────────────────────

    pub fn request_reset(&mut self) -> bool {
        self.gate.request_reset()
    }

    /// Confirm the open gate. For a reset this wipes the roster, clears
    /// storage, returns to page 1 and hides the summary.
    pub fn confirm(&mut self) -> Result<GateMode, GateError> {
        let mode = self.gate.confirm()?;
        if mode == GateMode::Reset {
            self.apply_reset();
        }
        Ok(mode)
    }

    pub fn cancel(&mut self) -> bool {
        self.gate.cancel()
    }

    /// Dismiss the export-blocked notice.
    pub fn acknowledge(&mut self) -> bool {
        self.gate.acknowledge()
    }

    fn apply_reset(&mut self) {
        self.list = EntryList::reset(self.roster.size, &self.roster.name_prefix);
        self.pager = Pager::new(self.list.len(), self.pager.policy());
        self.summary.hide();
        if let Err(e) = self.store.clear() {
            // Storage is cleared best-effort; the next save overwrites it anyway.
            tracing::warn!(error = %e, "failed to clear stored roster");
        }
        tracing::info!(entries = self.list.len(), "roster reset");
    }

    // ── Summary ─────────────────────────────────────────────────────

    pub fn toggle_summary(&mut self) -> bool {
        self.summary.toggle()
    }

    pub fn summary_visible(&self) -> bool {
        self.summary.is_visible()
    }

    pub fn flagged(&self) -> Vec<Entry> {
        self.list.flagged()
    }

    // ── Export ──────────────────────────────────────────────────────

    /// The entries to hand to an exporter, or `None` after routing an
    /// empty selection to the gate.
    pub fn prepare_export(&mut self) -> Option<Vec<Entry>> {
        let flagged = self.list.flagged();
        if flagged.is_empty() {
            self.gate.request_export_blocked();
            tracing::debug!("export blocked: nobody flagged");
            return None;
        }
        Some(flagged)
    }

    /// Export synchronously through `exporter`.
    pub fn export(&mut self, exporter: &dyn Exporter) -> ExportOutcome {
        let Some(entries) = self.prepare_export() else {
            return ExportOutcome::Blocked;
        };
        match exporter.export(&entries) {
            Ok(artifact) => {
                tracing::info!(
                    path = %artifact.path.display(),
                    entries = entries.len(),
                    "export written"
                );
                ExportOutcome::Exported(artifact)
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                ExportOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ExportError;
    use crate::export::ExportArtifact;
    use crate::gate::GateState;
    use crate::store::{DEFAULT_STORAGE_KEY, MemoryBackend, SnapshotStore, StorageBackend};

    fn roster(size: usize) -> RosterSettings {
        RosterSettings {
            size,
            ..RosterSettings::default()
        }
    }

    fn open(backend: &MemoryBackend, size: usize) -> Session<SnapshotStore<MemoryBackend>> {
        let store = SnapshotStore::new(backend.clone(), DEFAULT_STORAGE_KEY, size);
        Session::open(store, &roster(size), PagePolicy::Reject)
    }

    /// Counts calls; fails when asked to.
    #[derive(Default)]
    struct CountingExporter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Exporter for CountingExporter {
        fn export(&self, entries: &[Entry]) -> Result<ExportArtifact, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExportError::Render("font missing".to_string()));
            }
            Ok(ExportArtifact {
                path: PathBuf::from("choices.pdf"),
                bytes_written: entries.len(),
            })
        }
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl PersistentStore for BrokenStore {
        fn load(&self) -> Option<EntryList> {
            None
        }
        fn save(&mut self, _list: &EntryList) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }
    }

    #[test]
    fn fresh_session_starts_on_page_one_with_defaults() {
        let session = open(&MemoryBackend::new(), 20);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 20);
        assert_eq!(session.current_entry().unwrap().id, 1);
        assert!(!session.gate().is_open());
        assert!(!session.summary_visible());
    }

    #[test]
    fn every_mutation_is_saved() {
        let backend = MemoryBackend::new();
        let mut session = open(&backend, 20);
        session.toggle_flag(3).unwrap();
        let stored = backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(stored.contains(r#""id":3,"name":"Person 3","checked":true"#));

        session.set_note(3, "funny").unwrap();
        let stored = backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(stored.contains(r#""notes":"funny""#));
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let mut session = Session::open(BrokenStore, &roster(5), PagePolicy::Reject);
        assert!(session.toggle_flag(2).is_err());
        assert!(session.list().get(2).unwrap().flagged);
    }

    #[test]
    fn stale_snapshot_falls_back_to_default() {
        let backend = MemoryBackend::new();
        {
            let mut session = open(&backend, 20);
            session.toggle_flag(1).unwrap();
        }
        let session = open(&backend, 24);
        assert_eq!(session.list().len(), 24);
        assert_eq!(session.list().flagged_count(), 0);
    }

    #[test]
    fn page_zero_and_past_end_are_refused() {
        let mut session = open(&MemoryBackend::new(), 20);
        session.go_to_page(5).unwrap();
        assert!(session.go_to_page(0).is_err());
        assert!(session.go_to_page(21).is_err());
        assert_eq!(session.current_page(), 5);
        assert_eq!(session.current_entry().unwrap().id, 5);
    }

    #[test]
    fn clamp_policy_session_stays_in_range() {
        let backend = MemoryBackend::new();
        let store = SnapshotStore::new(backend, DEFAULT_STORAGE_KEY, 20);
        let mut session = Session::open(store, &roster(20), PagePolicy::Clamp);
        assert_eq!(session.go_to_page(21), Ok(20));
        assert_eq!(session.go_to_page(0), Ok(1));
    }

    #[test]
    fn cancelled_reset_changes_nothing() {
        let mut session = open(&MemoryBackend::new(), 5);
        session.toggle_flag(2).unwrap();
        session.request_reset();
        assert!(session.cancel());
        assert!(session.list().get(2).unwrap().flagged);
    }

    #[test]
    fn confirmed_reset_wipes_list_page_summary_and_storage() {
        let backend = MemoryBackend::new();
        let mut session = open(&backend, 24);
        session.toggle_flag(1).unwrap();
        session.set_note(2, "x").unwrap();
        session.go_to_page(9).unwrap();
        session.toggle_summary();

        session.request_reset();
        assert_eq!(session.confirm(), Ok(GateMode::Reset));

        assert_eq!(session.list(), &EntryList::create_default(24, "Person"));
        assert_eq!(session.current_page(), 1);
        assert!(!session.summary_visible());
        assert_eq!(session.gate().state(), GateState::Closed);
        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn reset_with_failing_clear_still_resets_memory() {
        let mut session = Session::open(BrokenStore, &roster(3), PagePolicy::Reject);
        let _ = session.toggle_flag(1);
        session.request_reset();
        assert!(session.confirm().is_ok());
        assert_eq!(session.list().flagged_count(), 0);
    }

    #[test]
    fn export_with_nothing_flagged_opens_gate_and_skips_exporter() {
        let mut session = open(&MemoryBackend::new(), 20);
        let exporter = CountingExporter::default();

        assert_eq!(session.export(&exporter), ExportOutcome::Blocked);
        assert_eq!(exporter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.gate().mode(), Some(GateMode::ExportBlocked));

        // The notice can only be acknowledged.
        assert!(session.confirm().is_err());
        assert!(session.acknowledge());
        assert!(!session.gate().is_open());
    }

    #[test]
    fn export_passes_flagged_entries_in_order() {
        let mut session = open(&MemoryBackend::new(), 20);
        session.toggle_flag(7).unwrap();
        session.toggle_flag(3).unwrap();
        let entries = session.prepare_export().unwrap();
        let ids: Vec<u32> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 7]);

        let exporter = CountingExporter::default();
        match session.export(&exporter) {
            ExportOutcome::Exported(artifact) => assert_eq!(artifact.bytes_written, 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn exporter_failure_is_reported_not_raised() {
        let mut session = open(&MemoryBackend::new(), 4);
        session.toggle_flag(1).unwrap();
        let exporter = CountingExporter {
            fail: true,
            ..CountingExporter::default()
        };
        match session.export(&exporter) {
            ExportOutcome::Failed(msg) => assert!(msg.contains("font missing")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!session.gate().is_open());
    }

    #[test]
    fn unchanged_list_is_not_rewritten() {
        let mut session = Session::open(BrokenStore, &roster(3), PagePolicy::Reject);
        // Unknown id: nothing changes, so the failing store is never touched.
        assert!(session.toggle_flag(42).is_ok());
        assert!(session.set_note(1, "").is_ok());
    }
}
