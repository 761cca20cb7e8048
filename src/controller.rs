use crate::datekey::format_date_key;
use crate::model::{Note, NoteId, NoteStore, SelectionState};
use crate::storage::{self, PersistedRecord, StoreLocation};

/// In-progress drag gesture. Exists only between a day press and the
/// matching pointer release (or the pointer leaving the grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { anchor: (i32, u32, u32) },
}

/// Owns the selection and note stores and the storage location, and turns
/// UI events into state changes. Every mutation writes straight through to
/// storage; a failed write surfaces as a diagnostic, never as an error to
/// the caller. The UI reads state through the query methods only.
pub struct Controller {
    location: StoreLocation,
    selection: SelectionState,
    notes: NoteStore,
    drag: DragState,
    preview: Option<NoteId>,
    diagnostic: Option<String>,
}

impl Controller {
    /// Loads saved state from the location. Missing or unreadable data
    /// starts the calendar empty; parse failures are kept as a diagnostic
    /// for the status line.
    pub fn load(location: StoreLocation) -> Self {
        let mut diagnostic = None;
        let (selection, notes) = match storage::load_record(&location) {
            Ok(Some(record)) => record.into_state(),
            Ok(None) => (SelectionState::new(), NoteStore::new()),
            Err(err) => {
                diagnostic = Some(format!("ignoring saved data: {}", err));
                (SelectionState::new(), NoteStore::new())
            }
        };
        Controller {
            location,
            selection,
            notes,
            drag: DragState::Idle,
            preview: None,
            diagnostic,
        }
    }

    // --- event API -------------------------------------------------------

    /// Month header clicked: bulk select or deselect the whole month.
    pub fn on_month_header_click(&mut self, year: i32, month: u32) {
        self.selection.toggle_month(year, month);
        self.persist();
    }

    /// Pointer pressed on a day: the day toggles immediately and the
    /// press becomes the anchor of a potential drag.
    pub fn on_day_press(&mut self, year: i32, month: u32, day: u32) {
        self.selection.toggle_day(year, month, day);
        self.drag = DragState::Dragging {
            anchor: (year, month, day),
        };
        self.persist();
    }

    /// Pointer entered a day cell while dragging: reapply the full range
    /// from the fixed anchor. Additive, so overshooting never shrinks the
    /// selection. Outside a drag this is a no-op.
    pub fn on_day_hover_during_drag(&mut self, year: i32, month: u32, day: u32) {
        let DragState::Dragging {
            anchor: (ay, am, ad),
        } = self.drag
        else {
            return;
        };
        self.selection.apply_range(ay, am, ad, year, month, day);
        self.persist();
    }

    /// Pointer released, or left the grid entirely. Ends the drag without
    /// further selection changes.
    pub fn on_release_pointer(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Click on a day that carries a note opens its preview and reports
    /// `true`; the caller suppresses toggle/drag handling for that
    /// interaction. Clicks on plain days report `false`.
    pub fn on_day_click(&mut self, year: i32, month: u32, day: u32) -> bool {
        let key = format_date_key(year, month, day);
        match self.notes.find_note_for_date(&key) {
            Some(note) => {
                self.preview = Some(note.id.clone());
                true
            }
            None => false,
        }
    }

    /// Creates a note covering the current day selection. On success the
    /// selection is cleared (the explicit post-save step); the caller
    /// resets its draft text. Empty content or an empty selection is
    /// rejected and reported via the return value.
    pub fn on_save_note_requested(&mut self, text: &str) -> bool {
        let dates = self.selection.day_keys();
        if self.notes.create_note(text, dates).is_none() {
            return false;
        }
        self.selection.clear();
        self.persist();
        true
    }

    /// Deletes a note by id; unknown ids are a no-op. A preview pointing
    /// at the deleted note is dismissed.
    pub fn on_delete_note_requested(&mut self, id: &str) {
        if self.preview.as_deref() == Some(id) {
            self.preview = None;
        }
        if self.notes.delete_note(id) {
            self.persist();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.persist();
    }

    pub fn dismiss_preview(&mut self) {
        self.preview = None;
    }

    // --- queries ---------------------------------------------------------

    pub fn is_day_selected(&self, key: &str) -> bool {
        self.selection.is_day_selected(key)
    }

    pub fn is_month_selected(&self, key: &str) -> bool {
        self.selection.is_month_selected(key)
    }

    pub fn note_for_day(&self, key: &str) -> Option<&Note> {
        self.notes.find_note_for_date(key)
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn preview_note(&self) -> Option<&Note> {
        self.preview.as_deref().and_then(|id| self.notes.get(id))
    }

    pub fn day_count(&self) -> usize {
        self.selection.day_count()
    }

    pub fn month_count(&self) -> usize {
        self.selection.month_count()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// One-shot diagnostic for the status line (load or save problems).
    pub fn take_diagnostic(&mut self) -> Option<String> {
        self.diagnostic.take()
    }

    fn persist(&mut self) {
        let record = PersistedRecord::from_state(&self.selection, &self.notes);
        if let Err(err) = storage::save_record(&self.location, &record) {
            self.diagnostic = Some(format!("could not save calendar data: {}", err));
        }
    }
}
