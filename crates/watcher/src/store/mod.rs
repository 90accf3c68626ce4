mod file;

pub use file::FileStateStore;

use crate::model::TrackedAlert;

/// Persists the last-seen alert set across polling cycles.
///
/// Both operations are deliberately infallible at the trait boundary:
/// missing or corrupt state reads as empty (the next cycle simply
/// re-notifies), and a failed write is logged and dropped because the
/// following cycle re-fetches and re-diffs anyway.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Vec<TrackedAlert>;
    fn save(&self, state: &[TrackedAlert]);
}
