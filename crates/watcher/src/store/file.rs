use std::path::PathBuf;

use tracing::{debug, warn};

use crate::model::TrackedAlert;
use crate::store::StateStore;

/// JSON state file, overwritten wholesale at the end of every cycle.
///
/// The wire format is a flat array of `{id, chat_id, Description}`
/// objects (see [`TrackedAlert`]'s serde renames).
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Vec<TrackedAlert> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No prior state at {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Corrupt state file {}, treating as empty: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    fn save(&self, state: &[TrackedAlert]) {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                warn!("State serialization failed: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("State save to {} failed: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(id: &str) -> TrackedAlert {
        TrackedAlert {
            id: id.to_string(),
            destination: "-100123".to_string(),
            description: "windy".to_string(),
        }
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStateStore::new(dir.path().join("state.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").expect("write");
        let store = FileStateStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStateStore::new(dir.path().join("state.json"));
        let state = vec![tracked("a"), tracked("b")];
        store.save(&state);
        assert_eq!(store.load(), state);
    }

    #[test]
    fn save_replaces_previous_state_wholesale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStateStore::new(dir.path().join("state.json"));
        store.save(&[tracked("a"), tracked("b")]);
        store.save(&[tracked("c")]);
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[test]
    fn save_empty_clears_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStateStore::new(dir.path().join("state.json"));
        store.save(&[tracked("a")]);
        store.save(&[]);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_to_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStateStore::new(dir.path().join("missing").join("state.json"));
        store.save(&[tracked("a")]);
        assert!(store.load().is_empty());
    }

    #[test]
    fn reads_legacy_wire_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"[{"id":"x","chat_id":"-1","Description":"old text"}]"#,
        )
        .expect("write");
        let store = FileStateStore::new(path);
        let loaded = store.load();
        assert_eq!(loaded[0].id, "x");
        assert_eq!(loaded[0].destination, "-1");
        assert_eq!(loaded[0].description, "old text");
    }
}
