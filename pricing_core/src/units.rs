//! # Unit Types
//!
//! Type-safe wrappers for the measurements customers enter on the timber
//! configurators. Dimensions are entered in centimeters and priced per cubic
//! meter (beams) or square meter (flooring).
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::units::{Centimeters, Meters};
//!
//! let length = Centimeters(250.0);
//! let meters: Meters = length.into();
//! assert_eq!(meters.0, 2.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl Centimeters {
    /// A usable dimension is finite and strictly positive
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

// ============================================================================
// Area and Volume Units
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl Mul for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

impl Mul<Meters> for SquareMeters {
    type Output = CubicMeters;
    fn mul(self, rhs: Meters) -> CubicMeters {
        CubicMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(CubicMeters);

// ============================================================================
// Lenient Parsing
// ============================================================================

/// Parse a measurement typed into a form field.
///
/// Reads the longest leading numeric prefix ("12.5cm" -> 12.5) and returns
/// `0.0` for empty, non-numeric or non-finite text. Form fields are priced at
/// the floor rather than rejected.
///
/// ```rust
/// use pricing_core::units::parse_measure;
///
/// assert_eq!(parse_measure(" 200 "), 200.0);
/// assert_eq!(parse_measure("15cm"), 15.0);
/// assert_eq!(parse_measure(""), 0.0);
/// assert_eq!(parse_measure("abc"), 0.0);
/// ```
pub fn parse_measure(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let candidate: &str = {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    // Shrink until the prefix parses ("1.5e" -> "1.5")
    let mut end = candidate.len();
    while end > 0 {
        if let Ok(value) = candidate[..end].parse::<f64>() {
            return if value.is_finite() { value } else { 0.0 };
        }
        end -= 1;
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let cm = Centimeters(15.0);
        let m: Meters = cm.into();
        assert!((m.0 - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_volume_from_meters() {
        let volume = Meters(2.0) * Meters(0.15) * Meters(0.15);
        assert!((volume.0 - 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Centimeters(10.0);
        let b = Centimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_is_positive() {
        assert!(Centimeters(0.1).is_positive());
        assert!(!Centimeters(0.0).is_positive());
        assert!(!Centimeters(-3.0).is_positive());
        assert!(!Centimeters(f64::NAN).is_positive());
        assert!(!Centimeters(f64::INFINITY).is_positive());
    }

    #[test]
    fn test_parse_measure() {
        assert_eq!(parse_measure("200"), 200.0);
        assert_eq!(parse_measure("  7.5 "), 7.5);
        assert_eq!(parse_measure("12.5cm"), 12.5);
        assert_eq!(parse_measure("1.5e"), 1.5);
        assert_eq!(parse_measure("-4"), -4.0);
        assert_eq!(parse_measure(""), 0.0);
        assert_eq!(parse_measure("cm"), 0.0);
        assert_eq!(parse_measure("NaN"), 0.0);
        assert_eq!(parse_measure("1e999"), 0.0);
    }

    #[test]
    fn test_serialization() {
        let cm = Centimeters(12.5);
        let json = serde_json::to_string(&cm).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Centimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(cm, roundtrip);
    }
}
