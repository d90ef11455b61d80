pub mod storage;

pub use storage::GeometryStore;
