//! redb-backed schedule store.
//!
//! Each drive's whole schedule is one JSON value under the drive ID
//! key. A replace reads the previous generation and writes the new
//! value inside a single write transaction, so a failed replace leaves
//! the previous schedule in place and redb's single-writer rule makes
//! replaces for the same drive exclusive.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

use super::{check_drive, ScheduleStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{SlotAssignment, StoredSchedule};

/// Schedules keyed by `{drive_id}`.
const SCHEDULES: TableDefinition<&str, &[u8]> = TableDefinition::new("schedules");

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Thread-safe schedule store backed by redb.
#[derive(Clone)]
pub struct DurableScheduleStore {
    db: Arc<Database>,
}

impl DurableScheduleStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "schedule store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory schedule store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(SCHEDULES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// IDs of all drives with a stored schedule.
    pub fn drive_ids(&self) -> StoreResult<Vec<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SCHEDULES).map_err(map_err!(Table))?;
        let mut ids = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            ids.push(key.value().to_string());
        }
        Ok(ids)
    }
}

impl ScheduleStore for DurableScheduleStore {
    fn replace(
        &self,
        drive_id: &str,
        assignments: Vec<SlotAssignment>,
    ) -> StoreResult<StoredSchedule> {
        check_drive(drive_id, &assignments)?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let stored;
        {
            let mut table = txn.open_table(SCHEDULES).map_err(map_err!(Table))?;
            let previous = match table.get(drive_id).map_err(map_err!(Read))? {
                Some(guard) => {
                    let previous: StoredSchedule =
                        serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                    previous.generation
                }
                None => 0,
            };

            stored = StoredSchedule::new(drive_id, previous + 1, assignments);
            let value = serde_json::to_vec(&stored).map_err(map_err!(Serialize))?;
            table
                .insert(drive_id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;

        debug!(
            %drive_id,
            generation = stored.generation,
            count = stored.assignment_count(),
            "schedule replaced"
        );
        Ok(stored)
    }

    fn get(&self, drive_id: &str) -> StoreResult<Option<StoredSchedule>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SCHEDULES).map_err(map_err!(Table))?;
        match table.get(drive_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let schedule: StoredSchedule =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(schedule))
            }
            None => Ok(None),
        }
    }

    fn clear(&self, drive_id: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SCHEDULES).map_err(map_err!(Table))?;
            existed = table.remove(drive_id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%drive_id, existed, "schedule cleared");
        Ok(existed)
    }
}
