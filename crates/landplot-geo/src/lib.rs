//! Landplot Geo - Projections, metrics, and angular notation
//!
//! This crate handles every numeric operation on canonical geometries:
//! equal-area and UTM reprojection, area/length metrics, and
//! degrees/minutes/seconds conversion.

pub mod dms;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod validation;
