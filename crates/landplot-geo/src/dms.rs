//! Decimal degrees to degrees/minutes/seconds notation.

use std::fmt;

/// Which axis a decimal degree value belongs to; picks the cardinal letters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// An angle split into degrees, minutes and seconds with a cardinal direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    pub direction: char,
}

impl Dms {
    /// Reconstruct the signed decimal degree value
    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0;
        match self.direction {
            'S' | 'W' => -magnitude,
            _ => magnitude,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}° {}' {:.4}\" {}", self.degrees, self.minutes, self.seconds, self.direction)
    }
}

/// Split a decimal degree value into DMS
///
/// Degrees and minutes are truncated, seconds keep the remainder. Zero counts
/// as positive (N / E).
pub fn decimal_to_dms(value: f64, axis: Axis) -> Dms {
    let positive = value >= 0.0;
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let minutes_full = (magnitude - degrees) * 60.0;
    let minutes = minutes_full.trunc();
    let seconds = (minutes_full - minutes) * 60.0;

    let direction = match (axis, positive) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    };

    Dms { degrees: degrees as u32, minutes: minutes as u32, seconds, direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_latitude() {
        let dms = decimal_to_dms(-15.7801, Axis::Latitude);
        assert_eq!(dms.degrees, 15);
        assert_eq!(dms.minutes, 46);
        assert!((dms.seconds - 48.36).abs() < 1e-6);
        assert_eq!(dms.direction, 'S');
        assert_eq!(dms.to_string(), "15° 46' 48.3600\" S");
    }

    #[test]
    fn test_known_longitude() {
        let dms = decimal_to_dms(-47.9292, Axis::Longitude);
        assert_eq!(dms.degrees, 47);
        assert_eq!(dms.minutes, 55);
        assert_eq!(dms.direction, 'W');

        let east = decimal_to_dms(2.5, Axis::Longitude);
        assert_eq!(east.to_string(), "2° 30' 0.0000\" E");
    }

    #[test]
    fn test_zero_is_positive() {
        assert_eq!(decimal_to_dms(0.0, Axis::Latitude).direction, 'N');
        assert_eq!(decimal_to_dms(0.0, Axis::Longitude).direction, 'E');
    }

    proptest! {
        #[test]
        fn prop_latitude_round_trip(value in -90.0f64..=90.0) {
            let dms = decimal_to_dms(value, Axis::Latitude);
            prop_assert!((dms.to_decimal() - value).abs() < 1e-9);
            prop_assert!(dms.minutes < 60);
            prop_assert!(dms.seconds >= 0.0 && dms.seconds < 60.0 + 1e-9);
            let expected = if value >= 0.0 { 'N' } else { 'S' };
            prop_assert_eq!(dms.direction, expected);
        }

        #[test]
        fn prop_longitude_round_trip(value in -180.0f64..=180.0) {
            let dms = decimal_to_dms(value, Axis::Longitude);
            prop_assert!((dms.to_decimal() - value).abs() < 1e-9);
            let expected = if value >= 0.0 { 'E' } else { 'W' };
            prop_assert_eq!(dms.direction, expected);
        }
    }
}
