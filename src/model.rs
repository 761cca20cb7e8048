use crate::datekey::{self, days_in_month, format_date_key, format_month_key};
use chrono::{DateTime, TimeZone, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type NoteId = String;

/// Fixed note palette, cycled by creation index. Tokens are stored in the
/// persisted record; the UI maps them to terminal colors.
pub const NOTE_COLORS: [&str; 8] = [
    "emerald", "purple", "orange", "pink", "cyan", "yellow", "red", "indigo",
];

/// The set of selected day keys plus the set of bulk-selected month keys.
///
/// Month membership records that a whole month was selected in one
/// operation; it is not re-derived afterwards, so removing individual days
/// later leaves the month key in place until the month is toggled again.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    days: HashSet<String>,
    months: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState::default()
    }

    pub fn from_keys(days: Vec<String>, months: Vec<String>) -> Self {
        SelectionState {
            days: days.into_iter().collect(),
            months: months.into_iter().collect(),
        }
    }

    /// Flips membership of a single day. Never touches the month set.
    pub fn toggle_day(&mut self, year: i32, month: u32, day: u32) {
        let key = format_date_key(year, month, day);
        if !self.days.remove(&key) {
            self.days.insert(key);
        }
    }

    /// Selects or deselects an entire month, keyed solely on current month
    /// membership. Bulk removal drops every day of the month even if some
    /// were toggled individually in between; bulk addition likewise wins.
    pub fn toggle_month(&mut self, year: i32, month: u32) {
        let month_key = format_month_key(year, month);
        let selected = self.months.contains(&month_key);
        if selected {
            self.months.remove(&month_key);
        } else {
            self.months.insert(month_key);
        }
        for day in 1..=days_in_month(year, month) {
            let key = format_date_key(year, month, day);
            if selected {
                self.days.remove(&key);
            } else {
                self.days.insert(key);
            }
        }
    }

    /// Adds every day from one endpoint through the other, inclusive.
    /// Endpoints are ordered chronologically regardless of argument order
    /// and the walk crosses month and year boundaries. Purely additive.
    pub fn apply_range(
        &mut self,
        year_a: i32,
        month_a: u32,
        day_a: u32,
        year_b: i32,
        month_b: u32,
        day_b: u32,
    ) {
        let (Some(a), Some(b)) = (
            datekey::to_naive_date(year_a, month_a, day_a),
            datekey::to_naive_date(year_b, month_b, day_b),
        ) else {
            debug_assert!(false, "apply_range called with a non-calendar date");
            return;
        };
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        let mut current = earlier;
        while current <= later {
            self.days.insert(datekey::date_key_of(current));
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    pub fn clear(&mut self) {
        self.days.clear();
        self.months.clear();
    }

    pub fn is_day_selected(&self, key: &str) -> bool {
        self.days.contains(key)
    }

    pub fn is_month_selected(&self, key: &str) -> bool {
        self.months.contains(key)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.months.is_empty()
    }

    /// Day keys sorted chronologically (keys sort lexicographically within
    /// equal-width years).
    pub fn day_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.days.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn month_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.months.iter().cloned().collect();
        keys.sort();
        keys
    }
}

/// A free-text note attached to a set of day keys. Immutable once created;
/// the only lifecycle transitions are create and delete.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub dates: Vec<String>,
    pub content: String,
    #[serde(rename = "createdAt", deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
    pub color: String,
}

/// Accepts both an RFC 3339 string and epoch milliseconds, the two forms
/// the record has carried over time.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
        Raw::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom("createdAt out of range")),
    }
}

/// Insertion-ordered note list. Lookups return the first note covering a
/// key; the model does not enforce one-note-per-day.
#[derive(Debug, Default, Clone)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        NoteStore::default()
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        NoteStore { notes }
    }

    pub fn find_note_for_date(&self, key: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.dates.iter().any(|d| d == key))
    }

    /// Creates a note from the given content and day keys. Rejects empty
    /// trimmed content and empty key sets by returning `None` with the
    /// store unchanged. The color cycles through `NOTE_COLORS` by current
    /// note count, so reuse past eight notes is expected.
    pub fn create_note(&mut self, content: &str, mut dates: Vec<String>) -> Option<&Note> {
        let content = content.trim();
        if content.is_empty() || dates.is_empty() {
            return None;
        }
        dates.sort();
        let color = NOTE_COLORS[self.notes.len() % NOTE_COLORS.len()];
        let note = Note {
            id: generate_note_id(),
            dates,
            content: content.to_string(),
            created_at: Utc::now(),
            color: color.to_string(),
        };
        self.notes.push(note);
        self.notes.last()
    }

    /// Removes the note with the given id. Unknown ids are a no-op.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Millisecond timestamp plus a short random suffix, so ids created within
/// the same millisecond stay distinct.
fn generate_note_id() -> NoteId {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_day_flips_membership() {
        let mut sel = SelectionState::new();
        sel.toggle_day(2024, 0, 15);
        assert!(sel.is_day_selected("2024-00-15"));
        sel.toggle_day(2024, 0, 15);
        assert!(!sel.is_day_selected("2024-00-15"));
        assert_eq!(sel.day_count(), 0);
    }

    #[test]
    fn toggle_month_bulk_selects_every_day() {
        let mut sel = SelectionState::new();
        sel.toggle_month(2024, 1);
        assert!(sel.is_month_selected("2024-01"));
        assert_eq!(sel.day_count(), 29);
        for day in 1..=29 {
            assert!(sel.is_day_selected(&format_date_key(2024, 1, day)));
        }
    }

    #[test]
    fn toggle_month_removal_wins_over_individual_toggles() {
        let mut sel = SelectionState::new();
        sel.toggle_month(2024, 3);
        // Remove a day by hand, then add a stray one back; the second
        // month toggle still strips the whole month.
        sel.toggle_day(2024, 3, 10);
        sel.toggle_day(2024, 3, 10);
        sel.toggle_day(2024, 3, 15);
        sel.toggle_month(2024, 3);
        assert!(!sel.is_month_selected("2024-03"));
        assert_eq!(sel.day_count(), 0);
    }

    #[test]
    fn month_key_not_rederived_after_day_removal() {
        let mut sel = SelectionState::new();
        sel.toggle_month(2024, 5);
        sel.toggle_day(2024, 5, 1);
        // Documented drift: the month stays marked selected.
        assert!(sel.is_month_selected("2024-05"));
        assert_eq!(sel.day_count(), 29);
    }

    #[test]
    fn apply_range_crosses_month_boundary() {
        let mut sel = SelectionState::new();
        sel.apply_range(2024, 2, 30, 2024, 3, 2);
        let expected = ["2024-02-30", "2024-02-31", "2024-03-01", "2024-03-02"];
        assert_eq!(sel.day_count(), expected.len());
        for key in expected {
            assert!(sel.is_day_selected(key), "missing {}", key);
        }
    }

    #[test]
    fn apply_range_is_order_independent() {
        let mut forward = SelectionState::new();
        forward.apply_range(2024, 2, 30, 2024, 3, 2);
        let mut reversed = SelectionState::new();
        reversed.apply_range(2024, 3, 2, 2024, 2, 30);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn apply_range_single_day() {
        let mut sel = SelectionState::new();
        sel.apply_range(2024, 6, 4, 2024, 6, 4);
        assert_eq!(sel.day_count(), 1);
        assert!(sel.is_day_selected("2024-06-04"));
    }

    #[test]
    fn apply_range_crosses_year_boundary() {
        let mut sel = SelectionState::new();
        sel.apply_range(2024, 11, 30, 2025, 0, 2);
        assert_eq!(sel.day_count(), 4);
        assert!(sel.is_day_selected("2024-11-31"));
        assert!(sel.is_day_selected("2025-00-01"));
    }

    #[test]
    fn apply_range_never_removes() {
        let mut sel = SelectionState::new();
        sel.toggle_day(2024, 0, 1);
        sel.apply_range(2024, 0, 5, 2024, 0, 7);
        assert!(sel.is_day_selected("2024-00-01"));
        assert_eq!(sel.day_count(), 4);
    }

    #[test]
    fn clear_empties_both_sets() {
        let mut sel = SelectionState::new();
        sel.toggle_month(2024, 0);
        sel.toggle_day(2024, 1, 1);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn create_note_rejects_blank_content() {
        let mut store = NoteStore::new();
        assert!(store.create_note("   ", vec!["2024-00-01".into()]).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn create_note_rejects_empty_dates() {
        let mut store = NoteStore::new();
        assert!(store.create_note("hello", Vec::new()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn create_note_trims_content() {
        let mut store = NoteStore::new();
        let note = store
            .create_note("  vacation  ", vec!["2024-06-01".into()])
            .unwrap();
        assert_eq!(note.content, "vacation");
    }

    #[test]
    fn note_colors_cycle_through_palette() {
        let mut store = NoteStore::new();
        for i in 0..9 {
            store
                .create_note(&format!("note {}", i), vec![format!("2024-00-{:02}", i + 1)])
                .unwrap();
        }
        let notes = store.notes();
        assert_eq!(notes[8].color, notes[0].color);
        assert_ne!(notes[1].color, notes[0].color);
        assert_eq!(notes[0].color, NOTE_COLORS[0]);
    }

    #[test]
    fn find_note_returns_first_match() {
        let mut store = NoteStore::new();
        let first = store
            .create_note("first", vec!["2024-00-01".into()])
            .unwrap()
            .id
            .clone();
        store
            .create_note("second", vec!["2024-00-01".into(), "2024-00-02".into()])
            .unwrap();
        assert_eq!(store.find_note_for_date("2024-00-01").unwrap().id, first);
        assert_eq!(
            store.find_note_for_date("2024-00-02").unwrap().content,
            "second"
        );
        assert!(store.find_note_for_date("2024-00-03").is_none());
    }

    #[test]
    fn delete_note_is_idempotent() {
        let mut store = NoteStore::new();
        let id = store
            .create_note("note", vec!["2024-00-01".into()])
            .unwrap()
            .id
            .clone();
        assert!(store.delete_note(&id));
        assert!(!store.delete_note(&id));
        assert!(!store.delete_note("no-such-id"));
        assert!(store.is_empty());
    }

    #[test]
    fn note_ids_are_unique_within_a_millisecond() {
        let mut store = NoteStore::new();
        for i in 0..20 {
            store
                .create_note("n", vec![format!("2024-00-{:02}", i + 1)])
                .unwrap();
        }
        let mut ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn created_at_accepts_epoch_millis() {
        let json = r#"{
            "id": "1700000000000-ab12",
            "dates": ["2024-00-01"],
            "content": "legacy",
            "createdAt": 1700000000000,
            "color": "emerald"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn created_at_accepts_rfc3339() {
        let json = r#"{
            "id": "x",
            "dates": ["2024-00-01"],
            "content": "n",
            "createdAt": "2024-06-01T12:00:00Z",
            "color": "red"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.created_at.to_rfc3339(), "2024-06-01T12:00:00+00:00");
    }
}
