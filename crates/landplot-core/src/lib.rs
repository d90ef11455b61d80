//! Landplot Core - Domain models, canonical codec, and configuration
//!
//! This crate contains the canonical geometry model, the record types handed
//! to the storage collaborator, and the layered configuration shared by every
//! other landplot crate.

pub mod canonical;
pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{LandplotError, Result};
