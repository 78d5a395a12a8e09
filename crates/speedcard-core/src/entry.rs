use serde::{Deserialize, Serialize};

/// Name prefix used when a roster is generated without configuration.
pub const DEFAULT_NAME_PREFIX: &str = "Person";

/// One person on the scorecard.
///
/// On disk the flag and note are stored as `checked` and `notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    #[serde(rename = "checked")]
    pub flagged: bool,
    #[serde(rename = "notes")]
    pub note: String,
}

impl Entry {
    /// A fresh, unflagged entry with an empty note.
    pub fn new(id: u32, prefix: &str) -> Self {
        Self {
            id,
            name: default_name(prefix, id),
            flagged: false,
            note: String::new(),
        }
    }
}

/// Deterministic display name for an id: `"<prefix> <id>"`.
pub fn default_name(prefix: &str, id: u32) -> String {
    format!("{prefix} {id}")
}

/// Fixed-length ordered roster of entries.
///
/// Every operation returns a new list; the list handed out is never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    /// `n` entries with ids `1..=n`, unflagged, empty notes.
    ///
    /// Ids are `u32`, so `n` is capped at `u32::MAX`.
    pub fn create_default(n: usize, prefix: &str) -> Self {
        let last = u32::try_from(n).unwrap_or(u32::MAX);
        let entries = (1..=last).map(|id| Entry::new(id, prefix)).collect();
        Self { entries }
    }

    /// Same as [`EntryList::create_default`]; prior state never leaks through.
    pub fn reset(n: usize, prefix: &str) -> Self {
        Self::create_default(n, prefix)
    }

    /// Wrap already-ordered entries. Used by the snapshot loader, which
    /// checks [`EntryList::is_well_formed`] before handing the list out.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// New list with the flag of `id` inverted. Unknown ids leave the list as is.
    pub fn toggle_flag(&self, id: u32) -> Self {
        self.map_entry(id, |e| Entry {
            flagged: !e.flagged,
            ..e.clone()
        })
    }

    /// New list with the note of `id` replaced verbatim.
    pub fn set_note(&self, id: u32, text: &str) -> Self {
        self.map_entry(id, |e| Entry {
            note: text.to_string(),
            ..e.clone()
        })
    }

    fn map_entry(&self, id: u32, f: impl Fn(&Entry) -> Entry) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| if e.id == id { f(e) } else { e.clone() })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Flagged entries in roster (ascending id) order.
    pub fn flagged(&self) -> Vec<Entry> {
        self.entries.iter().filter(|e| e.flagged).cloned().collect()
    }

    pub fn flagged_count(&self) -> usize {
        self.entries.iter().filter(|e| e.flagged).count()
    }

    /// Exactly `n` entries whose ids run `1..=n` in order.
    pub fn is_well_formed(&self, n: usize) -> bool {
        self.entries.len() == n
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(i, e)| e.id as usize == i + 1)
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_list_has_sequential_ids_and_names() {
        let list = EntryList::create_default(20, DEFAULT_NAME_PREFIX);
        assert_eq!(list.len(), 20);
        assert!(list.is_well_formed(20));
        assert_eq!(list.get(1).unwrap().name, "Person 1");
        assert_eq!(list.get(20).unwrap().name, "Person 20");
        assert!(list.iter().all(|e| !e.flagged && e.note.is_empty()));
    }

    #[test]
    fn custom_prefix_is_used() {
        let list = EntryList::create_default(3, "Numer");
        assert_eq!(list.get(3).unwrap().name, "Numer 3");
    }

    #[test]
    fn toggle_does_not_touch_original() {
        let list = EntryList::create_default(5, DEFAULT_NAME_PREFIX);
        let toggled = list.toggle_flag(2);
        assert!(!list.get(2).unwrap().flagged);
        assert!(toggled.get(2).unwrap().flagged);
        assert_eq!(toggled.flagged_count(), 1);
    }

    #[test]
    fn unknown_id_is_a_noop() {
        let list = EntryList::create_default(5, DEFAULT_NAME_PREFIX);
        assert_eq!(list.toggle_flag(99), list);
        assert_eq!(list.set_note(0, "x"), list);
    }

    #[test]
    fn note_is_stored_verbatim() {
        let list = EntryList::create_default(3, DEFAULT_NAME_PREFIX);
        let list = list.set_note(1, "  likes hiking\nand jazz  ");
        assert_eq!(list.get(1).unwrap().note, "  likes hiking\nand jazz  ");
        let list = list.set_note(1, "");
        assert_eq!(list.get(1).unwrap().note, "");
    }

    #[test]
    fn reset_clears_everything() {
        let list = EntryList::create_default(4, DEFAULT_NAME_PREFIX)
            .toggle_flag(1)
            .set_note(3, "hi");
        let fresh = EntryList::reset(4, DEFAULT_NAME_PREFIX);
        assert_ne!(list, fresh);
        assert!(fresh.iter().all(|e| !e.flagged && e.note.is_empty()));
    }

    #[test]
    fn well_formed_rejects_gaps_and_wrong_length() {
        let list = EntryList::create_default(3, DEFAULT_NAME_PREFIX);
        assert!(!list.is_well_formed(4));

        let mut entries = list.entries().to_vec();
        entries.swap(0, 1);
        assert!(!EntryList::from_entries(entries).is_well_formed(3));
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let list = EntryList::create_default(1, DEFAULT_NAME_PREFIX).toggle_flag(1);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Person 1","checked":true,"notes":""}]"#
        );
    }

    /// Arbitrary well-formed list of length `n` with random flags and notes.
    pub(crate) fn arb_list(n: usize) -> impl Strategy<Value = EntryList> {
        proptest::collection::vec((any::<bool>(), ".{0,12}"), n).prop_map(|cells| {
            let entries = cells
                .into_iter()
                .enumerate()
                .map(|(i, (flagged, note))| Entry {
                    id: i as u32 + 1,
                    name: default_name(DEFAULT_NAME_PREFIX, i as u32 + 1),
                    flagged,
                    note,
                })
                .collect();
            EntryList::from_entries(entries)
        })
    }

    proptest! {
        #[test]
        fn toggling_twice_restores_list(list in arb_list(20), id in 1u32..=20) {
            prop_assert_eq!(list.toggle_flag(id).toggle_flag(id), list);
        }

        #[test]
        fn second_note_wins_and_others_untouched(list in arb_list(20), id in 1u32..=20) {
            let updated = list.set_note(id, "a").set_note(id, "b");
            for (before, after) in list.iter().zip(updated.iter()) {
                if after.id == id {
                    prop_assert_eq!(after.note.as_str(), "b");
                    prop_assert_eq!(after.flagged, before.flagged);
                } else {
                    prop_assert_eq!(before, after);
                }
            }
        }

        #[test]
        fn flagged_is_ascending_regardless_of_toggle_order(
            ids in proptest::collection::vec(1u32..=24, 0..30)
        ) {
            let mut list = EntryList::create_default(24, DEFAULT_NAME_PREFIX);
            for id in &ids {
                list = list.toggle_flag(*id);
            }
            let flagged: Vec<u32> = list.flagged().iter().map(|e| e.id).collect();
            let mut sorted = flagged.clone();
            sorted.sort_unstable();
            prop_assert_eq!(flagged, sorted);
        }
    }
}
