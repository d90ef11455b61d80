//! Landplot Store - Storage adapters
//!
//! Implementations of `landplot_core::ports::GeometryStore`.

pub mod memory;

pub use memory::MemoryGeometryStore;
