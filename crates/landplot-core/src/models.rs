pub mod geometry;
pub mod record;

pub use geometry::{CanonicalGeometry, GeometryKind};
pub use record::{
    GeometryMetrics, GeometryRecord, OwnerToken, RecordId, RecordPatch, DEFAULT_COLOR,
    DEFAULT_NAME, IMPORT_COLOR,
};
