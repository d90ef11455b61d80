//! In-memory geometry store for the command line and tests.
//!
//! All state sits behind one `RwLock`, so a batch insert is applied under a
//! single write guard and is never observed half done. A poisoned lock is
//! reported as a storage error.

use landplot_core::error::{LandplotError, Result};
use landplot_core::models::{GeometryRecord, OwnerToken, RecordId, RecordPatch};
use landplot_core::ports::GeometryStore;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct StoredRecord {
    owner: OwnerToken,
    record: GeometryRecord,
}

#[derive(Debug)]
struct StoreState {
    records: BTreeMap<RecordId, StoredRecord>,
    next_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self { records: BTreeMap::new(), next_id: 1 }
    }
}

impl StoreState {
    fn insert(&mut self, owner: &OwnerToken, mut record: GeometryRecord) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        record.id = Some(id);
        self.records.insert(id, StoredRecord { owner: owner.clone(), record });
        id
    }

    fn owned_mut(&mut self, id: RecordId, owner: &OwnerToken) -> Result<&mut StoredRecord> {
        self.records
            .get_mut(&id)
            .filter(|stored| &stored.owner == owner)
            .ok_or(LandplotError::RecordNotFound { id: id.0 })
    }
}

/// In-memory implementation of GeometryStore
#[derive(Debug, Clone, Default)]
pub struct MemoryGeometryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryGeometryStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all owners
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| LandplotError::Storage("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| LandplotError::Storage("store lock poisoned".to_string()))
    }
}

fn check_storable(record: &GeometryRecord) -> Result<()> {
    if record.feature.trim().is_empty() {
        return Err(LandplotError::Storage(format!(
            "record '{}' has no feature to store",
            record.name
        )));
    }
    Ok(())
}

impl GeometryStore for MemoryGeometryStore {
    fn create(&self, owner: &OwnerToken, record: GeometryRecord) -> Result<RecordId> {
        check_storable(&record)?;
        let id = self.write()?.insert(owner, record);
        tracing::debug!(id = %id, "Stored record");
        Ok(id)
    }

    fn create_many(
        &self,
        owner: &OwnerToken,
        records: Vec<GeometryRecord>,
    ) -> Result<Vec<RecordId>> {
        records.iter().try_for_each(check_storable)?;

        let mut state = self.write()?;
        let ids: Vec<RecordId> =
            records.into_iter().map(|record| state.insert(owner, record)).collect();
        tracing::debug!(count = ids.len(), "Stored record batch");
        Ok(ids)
    }

    fn list(&self, owner: &OwnerToken) -> Result<Vec<GeometryRecord>> {
        Ok(self
            .read()?
            .records
            .values()
            .filter(|stored| &stored.owner == owner)
            .map(|stored| stored.record.clone())
            .collect())
    }

    fn get(&self, id: RecordId, owner: &OwnerToken) -> Result<Option<GeometryRecord>> {
        Ok(self
            .read()?
            .records
            .get(&id)
            .filter(|stored| &stored.owner == owner)
            .map(|stored| stored.record.clone()))
    }

    fn update(&self, id: RecordId, owner: &OwnerToken, patch: RecordPatch) -> Result<()> {
        if let Some((feature, _)) = &patch.feature {
            if feature.trim().is_empty() {
                return Err(LandplotError::Storage(format!("record {} would lose its feature", id)));
            }
        }
        let mut state = self.write()?;
        patch.apply(&mut state.owned_mut(id, owner)?.record);
        Ok(())
    }

    fn delete(&self, id: RecordId, owner: &OwnerToken) -> Result<()> {
        let mut state = self.write()?;
        state.owned_mut(id, owner)?;
        state.records.remove(&id);
        tracing::debug!(id = %id, "Deleted record");
        Ok(())
    }
}
