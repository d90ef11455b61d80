use landplot_core::error::{LandplotError, Result};
use landplot_core::models::CanonicalGeometry;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Turn the first error into an `InvalidGeometry` error
    pub fn into_result(self, geometry_type: &str) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(LandplotError::InvalidGeometry {
                geometry_type: geometry_type.to_string(),
                reason: format!("{}: {}", error.location, error.reason),
            }),
        }
    }
}

/// Validate a canonical geometry for measurement
///
/// Rings are not required to be closed; an open ring is closed implicitly
/// when measured.
pub fn validate_geometry(geometry: &CanonicalGeometry) -> ValidationResult {
    match geometry {
        CanonicalGeometry::Point { coordinates } => validate_coords("Point", &[*coordinates], 1),
        CanonicalGeometry::LineString { coordinates } => {
            validate_coords("LineString", coordinates, 2)
        }
        CanonicalGeometry::Polygon { coordinates } => validate_coords("Polygon ring", coordinates, 3),
    }
}

fn validate_coords(location: &str, coords: &[[f64; 2]], min_points: usize) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if coords.len() < min_points {
        result.add_error(
            location.to_string(),
            format!("must have at least {} points, found {}", min_points, coords.len()),
        );
        return result;
    }

    for (i, coord) in coords.iter().enumerate() {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            result.add_error(format!("{}[{}]", location, i), "Coordinates must be finite".to_string());
        }
    }

    result
}
