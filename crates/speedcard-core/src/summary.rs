use crate::entry::{Entry, EntryList};

/// Flagged entries in ascending id order.
pub fn flagged(list: &EntryList) -> Vec<Entry> {
    list.flagged()
}

/// Whether the flagged list is on screen. Has no say over what is flagged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryView {
    visible: bool,
}

impl SummaryView {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
