use crate::error::Result;
use crate::models::{GeometryRecord, OwnerToken, RecordId, RecordPatch};

/// Port for the storage collaborator that owns geometry records
///
/// Every operation is scoped by an owner token. A record that belongs to a
/// different owner behaves as if it did not exist.
pub trait GeometryStore {
    /// Store a single record and return its new id
    fn create(&self, owner: &OwnerToken, record: GeometryRecord) -> Result<RecordId>;

    /// Store a batch of records atomically: either every record is stored or none is
    fn create_many(&self, owner: &OwnerToken, records: Vec<GeometryRecord>)
        -> Result<Vec<RecordId>>;

    /// List the owner's records in insertion order
    fn list(&self, owner: &OwnerToken) -> Result<Vec<GeometryRecord>>;

    /// Retrieve one of the owner's records
    fn get(&self, id: RecordId, owner: &OwnerToken) -> Result<Option<GeometryRecord>>;

    /// Apply a partial update to one of the owner's records
    fn update(&self, id: RecordId, owner: &OwnerToken, patch: RecordPatch) -> Result<()>;

    /// Delete one of the owner's records
    fn delete(&self, id: RecordId, owner: &OwnerToken) -> Result<()>;
}
