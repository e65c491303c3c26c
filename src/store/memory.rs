//! In-memory schedule store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{check_drive, ScheduleStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{SlotAssignment, StoredSchedule};

/// Process-local store.
///
/// Each drive's schedule sits behind an `Arc`. A replace builds the new
/// schedule before taking the write lock. Under the lock it only stamps
/// the next generation and swaps the `Arc` into the map. Copies handed
/// back to callers are made after the lock is released.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    schedules: Arc<RwLock<HashMap<String, Arc<StoredSchedule>>>>,
}

impl MemoryScheduleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drives with a stored schedule.
    pub fn drive_count(&self) -> StoreResult<usize> {
        Ok(self
            .schedules
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .len())
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn replace(
        &self,
        drive_id: &str,
        assignments: Vec<SlotAssignment>,
    ) -> StoreResult<StoredSchedule> {
        check_drive(drive_id, &assignments)?;

        let mut next = StoredSchedule::new(drive_id, 0, assignments);
        let key = drive_id.to_string();

        let shared = {
            let mut schedules = self.schedules.write().map_err(|_| StoreError::Poisoned)?;
            next.generation = schedules
                .get(drive_id)
                .map_or(1, |previous| previous.generation + 1);
            let shared = Arc::new(next);
            schedules.insert(key, Arc::clone(&shared));
            shared
        };

        debug!(
            %drive_id,
            generation = shared.generation,
            count = shared.assignment_count(),
            "schedule replaced"
        );
        Ok(shared.as_ref().clone())
    }

    fn get(&self, drive_id: &str) -> StoreResult<Option<StoredSchedule>> {
        let current = self
            .schedules
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .get(drive_id)
            .cloned();
        Ok(current.map(|schedule| schedule.as_ref().clone()))
    }

    fn clear(&self, drive_id: &str) -> StoreResult<bool> {
        let existed = self
            .schedules
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(drive_id)
            .is_some();
        debug!(%drive_id, existed, "schedule cleared");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::schedule;
    use std::thread;

    #[test]
    fn test_replace_and_get() {
        let store = MemoryScheduleStore::new();
        let stored = store.replace("d1", schedule("d1", &["a", "b"])).unwrap();
        assert_eq!(stored.generation, 1);

        let loaded = store.get("d1").unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(store.list("d1").unwrap().len(), 2);
    }

    #[test]
    fn test_replace_discards_previous_set() {
        let store = MemoryScheduleStore::new();
        store.replace("d1", schedule("d1", &["a", "b", "c"])).unwrap();
        let second = store.replace("d1", schedule("d1", &["x"])).unwrap();

        assert_eq!(second.generation, 2);
        let ids: Vec<String> = store
            .list("d1")
            .unwrap()
            .into_iter()
            .map(|a| a.candidate_id)
            .collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let store = MemoryScheduleStore::new();
        store.replace("d1", schedule("d1", &["a", "b"])).unwrap();
        let first = store.list("d1").unwrap();
        store.replace("d1", schedule("d1", &["a", "b"])).unwrap();
        assert_eq!(store.list("d1").unwrap(), first);
    }

    #[test]
    fn test_drives_are_isolated() {
        let store = MemoryScheduleStore::new();
        store.replace("d1", schedule("d1", &["a"])).unwrap();
        store.replace("d2", schedule("d2", &["b", "c"])).unwrap();
        store.replace("d1", Vec::new()).unwrap();

        assert!(store.list("d1").unwrap().is_empty());
        assert_eq!(store.list("d2").unwrap().len(), 2);
        assert_eq!(store.drive_count().unwrap(), 2);
    }

    #[test]
    fn test_unknown_drive() {
        let store = MemoryScheduleStore::new();
        assert!(store.get("nope").unwrap().is_none());
        assert!(store.list("nope").unwrap().is_empty());
        assert!(!store.clear("nope").unwrap());
    }

    #[test]
    fn test_clear() {
        let store = MemoryScheduleStore::new();
        store.replace("d1", schedule("d1", &["a"])).unwrap();
        assert!(store.clear("d1").unwrap());
        assert!(store.get("d1").unwrap().is_none());
    }

    #[test]
    fn test_rejects_foreign_assignments() {
        let store = MemoryScheduleStore::new();
        store.replace("d1", schedule("d1", &["a"])).unwrap();

        let err = store.replace("d1", schedule("d2", &["b"])).unwrap_err();
        assert!(matches!(err, StoreError::DriveMismatch { .. }));
        // Previous schedule untouched
        assert_eq!(store.list("d1").unwrap()[0].candidate_id, "a");
    }

    #[test]
    fn test_returned_copy_is_independent_of_store() {
        let store = MemoryScheduleStore::new();
        let mut returned = store.replace("d1", schedule("d1", &["a", "b"])).unwrap();
        returned.assignments.clear();
        returned.generation = 99;

        let stored = store.get("d1").unwrap().unwrap();
        assert_eq!(stored.generation, 1);
        assert_eq!(stored.assignment_count(), 2);
        assert_eq!(store.replace("d1", Vec::new()).unwrap().generation, 2);
    }

    #[test]
    fn test_concurrent_replaces_never_interleave() {
        let store = MemoryScheduleStore::new();
        let sets: Vec<Vec<&str>> = vec![vec!["a", "b", "c"], vec!["x", "y"], vec!["m"]];

        let handles: Vec<_> = sets
            .iter()
            .cloned()
            .map(|set| {
                let store = store.clone();
                let set: Vec<String> = set.into_iter().map(String::from).collect();
                thread::spawn(move || {
                    let refs: Vec<&str> = set.iter().map(String::as_str).collect();
                    for _ in 0..50 {
                        store.replace("d1", schedule("d1", &refs)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stored = store.get("d1").unwrap().unwrap();
        assert_eq!(stored.generation, 150);
        let ids: Vec<&str> = stored
            .assignments
            .iter()
            .map(|a| a.candidate_id.as_str())
            .collect();
        assert!(sets.iter().any(|set| *set == ids));
    }
}
