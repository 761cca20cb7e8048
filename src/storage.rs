use crate::model::{Note, NoteStore, SelectionState};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed name of the single storage entry.
const STORE_FILE: &str = "calendar.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    Project,
    Global,
}

#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub path: PathBuf,
    pub scope: StoreScope,
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("saved calendar data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The on-disk snapshot: selected day keys, selected month keys, and the
/// note list, in the JSON shape the record has always had.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct PersistedRecord {
    #[serde(rename = "selectedDates", default)]
    pub selected_dates: Vec<String>,
    #[serde(rename = "selectedMonths", default)]
    pub selected_months: Vec<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl PersistedRecord {
    pub fn from_state(selection: &SelectionState, notes: &NoteStore) -> Self {
        PersistedRecord {
            selected_dates: selection.day_keys(),
            selected_months: selection.month_keys(),
            notes: notes.notes().to_vec(),
        }
    }

    pub fn into_state(self) -> (SelectionState, NoteStore) {
        (
            SelectionState::from_keys(self.selected_dates, self.selected_months),
            NoteStore::from_notes(self.notes),
        )
    }
}

/// Finds the storage entry: a `.yeargrid/calendar.json` discovered by
/// walking up from `start`, falling back to the per-user data directory.
pub fn locate_store(start: &Path) -> Result<StoreLocation> {
    if let Some(path) = find_project_store(start) {
        return Ok(StoreLocation {
            path,
            scope: StoreScope::Project,
        });
    }
    Ok(StoreLocation {
        path: global_store_path()?,
        scope: StoreScope::Global,
    })
}

pub fn locate_store_from_cwd() -> Result<StoreLocation> {
    let cwd = env::current_dir()?;
    locate_store(&cwd)
}

/// Creates a project-scoped store in the current directory so subsequent
/// runs from anywhere beneath it pick it up.
pub fn init_project_store() -> Result<StoreLocation> {
    let cwd = env::current_dir()?;
    let dir = cwd.join(".yeargrid");
    fs::create_dir_all(&dir).context("failed to create .yeargrid directory")?;
    let location = StoreLocation {
        path: dir.join(STORE_FILE),
        scope: StoreScope::Project,
    };
    if !location.path.exists() {
        save_record(&location, &PersistedRecord::default())?;
    }
    Ok(location)
}

/// Reads the storage entry. `Ok(None)` means the entry does not exist
/// (first run); a parse or shape mismatch is an `Err` the caller is
/// expected to treat as absent data after reporting it.
pub fn load_record(location: &StoreLocation) -> Result<Option<PersistedRecord>, StorageError> {
    if !location.path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(&location.path).map_err(|source| StorageError::Io {
        path: location.path.clone(),
        source,
    })?;
    let record: PersistedRecord = serde_json::from_str(&data)?;
    Ok(Some(record))
}

/// Overwrites the storage entry with the full snapshot. No partial
/// writes, no versioning.
pub fn save_record(location: &StoreLocation, record: &PersistedRecord) -> Result<()> {
    if let Some(parent) = location.path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_json::to_string_pretty(record).context("serializing calendar data")?;
    fs::write(&location.path, serialized)
        .with_context(|| format!("writing {:?}", location.path))?;
    Ok(())
}

fn find_project_store(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(".yeargrid").join(STORE_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn global_store_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "yeargrid").context("locating data directory")?;
    Ok(dirs.data_dir().join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOTE_COLORS;
    use tempfile::TempDir;

    fn temp_location(dir: &TempDir) -> StoreLocation {
        StoreLocation {
            path: dir.path().join(STORE_FILE),
            scope: StoreScope::Project,
        }
    }

    #[test]
    fn missing_entry_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);
        assert_eq!(load_record(&location).unwrap(), None);
    }

    #[test]
    fn record_round_trips() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);

        let mut selection = SelectionState::new();
        selection.toggle_day(2024, 2, 15);
        selection.toggle_month(2024, 6);
        let mut notes = NoteStore::new();
        notes
            .create_note("trip", vec!["2024-02-15".into()])
            .unwrap();

        let record = PersistedRecord::from_state(&selection, &notes);
        save_record(&location, &record).unwrap();
        let loaded = load_record(&location).unwrap().unwrap();
        let (sel2, notes2) = loaded.into_state();

        assert_eq!(sel2, selection);
        assert_eq!(notes2.len(), 1);
        let original = &notes.notes()[0];
        let restored = &notes2.notes()[0];
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.content, original.content);
        assert_eq!(restored.dates, original.dates);
        assert_eq!(restored.color, original.color);
        // RFC 3339 keeps sub-second precision, so the timestamp survives.
        assert_eq!(restored.created_at, original.created_at);
    }

    #[test]
    fn malformed_entry_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);
        fs::write(&location.path, "this is not json").unwrap();
        assert!(matches!(
            load_record(&location),
            Err(StorageError::Parse(_))
        ));
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);
        fs::write(&location.path, r#"{"selectedDates": 42}"#).unwrap();
        assert!(load_record(&location).is_err());
    }

    #[test]
    fn record_json_shape() {
        let mut notes = NoteStore::new();
        notes.create_note("hi", vec!["2024-00-01".into()]).unwrap();
        let record = PersistedRecord {
            selected_dates: vec!["2024-00-01".into()],
            selected_months: vec!["2024-00".into()],
            notes: notes.notes().to_vec(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert!(json["selectedDates"].is_array());
        assert!(json["selectedMonths"].is_array());
        let note = &json["notes"][0];
        assert!(note["id"].is_string());
        assert!(note["createdAt"].is_string());
        assert_eq!(note["color"], NOTE_COLORS[0]);
        assert_eq!(note["content"], "hi");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);
        fs::write(&location.path, r#"{"selectedDates": ["2024-00-01"]}"#).unwrap();
        let record = load_record(&location).unwrap().unwrap();
        assert_eq!(record.selected_dates.len(), 1);
        assert!(record.selected_months.is_empty());
        assert!(record.notes.is_empty());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let location = temp_location(&dir);
        let mut selection = SelectionState::new();
        selection.toggle_day(2024, 0, 1);
        save_record(
            &location,
            &PersistedRecord::from_state(&selection, &NoteStore::new()),
        )
        .unwrap();
        selection.clear();
        save_record(
            &location,
            &PersistedRecord::from_state(&selection, &NoteStore::new()),
        )
        .unwrap();
        let loaded = load_record(&location).unwrap().unwrap();
        assert!(loaded.selected_dates.is_empty());
    }
}
