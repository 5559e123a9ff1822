//! Fixed-point geographic envelopes
//!
//! Query envelopes are converted from floating degrees to scaled integers once,
//! at the system boundary, so repeated queries compare bit-for-bit identical
//! values instead of re-deriving floating coordinates.

use crate::{GridError, Result};
use geo::{Coord, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scale between degrees and fixed-point units (1e-7 degree resolution)
pub const FIXED_FACTOR: f64 = 1e7;

/// Largest magnitude in degrees representable in fixed-point units
pub const MAX_FIXED_DEGREES: f64 = i32::MAX as f64 / FIXED_FACTOR;

/// Convert degrees to fixed-point units, rounding to the nearest unit
///
/// # Errors
/// [`GridError::InvalidEnvelope`] for NaN, infinite, or out-of-range degrees
/// (beyond ±[`MAX_FIXED_DEGREES`]).
#[inline(always)]
pub fn floating_to_fixed(degrees: f64) -> Result<i32> {
    let scaled = (degrees * FIXED_FACTOR).round();
    if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(GridError::InvalidEnvelope(format!(
            "coordinate {degrees} cannot be represented in fixed-point degrees"
        )));
    }
    Ok(scaled as i32)
}

/// Convert fixed-point units back to degrees
#[inline(always)]
pub fn fixed_to_floating(fixed: i32) -> f64 {
    fixed as f64 / FIXED_FACTOR
}

/// A WGS84 bounding box in fixed-point degrees (see [`FIXED_FACTOR`])
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedPointEnvelope {
    min_lon: i32,
    max_lon: i32,
    min_lat: i32,
    max_lat: i32,
}

impl FixedPointEnvelope {
    /// Create an envelope from raw fixed-point values
    ///
    /// Fails if a minimum exceeds its maximum on either axis.
    pub fn new(min_lon: i32, max_lon: i32, min_lat: i32, max_lat: i32) -> Result<Self> {
        let envelope = Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// Build without validation, standing in for a deserialized value
    #[cfg(test)]
    pub(crate) fn new_unchecked(min_lon: i32, max_lon: i32, min_lat: i32, max_lat: i32) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Convert a floating envelope (x = longitude, y = latitude)
    ///
    /// # Errors
    /// [`GridError::InvalidEnvelope`] if any coordinate is not finite or falls
    /// outside the fixed-point range.
    pub fn from_floating(envelope: Rect<f64>) -> Result<Self> {
        let min = envelope.min();
        let max = envelope.max();
        Self::new(
            floating_to_fixed(min.x)?,
            floating_to_fixed(max.x)?,
            floating_to_fixed(min.y)?,
            floating_to_fixed(max.y)?,
        )
    }

    /// Check that the envelope is not inverted on either axis
    ///
    /// Deserialized envelopes skip [`FixedPointEnvelope::new`], which is why
    /// queries re-check this.
    pub fn validate(&self) -> Result<()> {
        if self.min_lon > self.max_lon {
            return Err(GridError::InvalidEnvelope(format!(
                "min longitude {} exceeds max longitude {}",
                fixed_to_floating(self.min_lon),
                fixed_to_floating(self.max_lon)
            )));
        }
        if self.min_lat > self.max_lat {
            return Err(GridError::InvalidEnvelope(format!(
                "min latitude {} exceeds max latitude {}",
                fixed_to_floating(self.min_lat),
                fixed_to_floating(self.max_lat)
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn min_lon(&self) -> i32 {
        self.min_lon
    }

    #[inline]
    pub fn max_lon(&self) -> i32 {
        self.max_lon
    }

    #[inline]
    pub fn min_lat(&self) -> i32 {
        self.min_lat
    }

    #[inline]
    pub fn max_lat(&self) -> i32 {
        self.max_lat
    }

    /// The envelope in floating degrees (x = longitude, y = latitude)
    pub fn to_floating(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: fixed_to_floating(self.min_lon),
                y: fixed_to_floating(self.min_lat),
            },
            Coord {
                x: fixed_to_floating(self.max_lon),
                y: fixed_to_floating(self.max_lat),
            },
        )
    }

    /// Whether the two envelopes share any point (touching edges count)
    pub fn intersects(&self, other: &FixedPointEnvelope) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// Whether `other` lies entirely within this envelope
    pub fn contains(&self, other: &FixedPointEnvelope) -> bool {
        self.min_lon <= other.min_lon
            && other.max_lon <= self.max_lon
            && self.min_lat <= other.min_lat
            && other.max_lat <= self.max_lat
    }
}

impl TryFrom<Rect<f64>> for FixedPointEnvelope {
    type Error = GridError;

    fn try_from(envelope: Rect<f64>) -> Result<Self> {
        Self::from_floating(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Rect<f64> {
        Rect::new(
            Coord {
                x: min_lon,
                y: min_lat,
            },
            Coord {
                x: max_lon,
                y: max_lat,
            },
        )
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(floating_to_fixed(12.5), Ok(125_000_000));
        assert_eq!(floating_to_fixed(-44.1), Ok(-441_000_000));
        assert_eq!(floating_to_fixed(180.0), Ok(1_800_000_000));
        assert_eq!(fixed_to_floating(-441_000_000), -44.1);
    }

    #[test]
    fn test_from_floating() {
        let env = FixedPointEnvelope::try_from(rect(10.0, 15.0, -45.0, -44.0)).unwrap();
        assert_eq!(env.min_lon(), 100_000_000);
        assert_eq!(env.max_lon(), 150_000_000);
        assert_eq!(env.min_lat(), -450_000_000);
        assert_eq!(env.max_lat(), -440_000_000);
    }

    #[test]
    fn test_swapped_corners_are_normalized() {
        // Rect orders its corners, so a "max" given first is still a max
        let env = FixedPointEnvelope::try_from(rect(11.0, 12.0, -44.4, -44.6)).unwrap();
        assert!(env.validate().is_ok());
        assert!(env.min_lat() < env.max_lat());
    }

    #[test]
    fn test_monotonic_for_close_values() {
        let env = FixedPointEnvelope::try_from(rect(1.000_000_01, 1.000_000_09, 0.0, 0.0)).unwrap();
        assert!(env.min_lon() <= env.max_lon());
    }

    #[test]
    fn test_scalar_conversion_rejects_non_finite() {
        for degrees in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 215.0, -215.0] {
            assert!(
                matches!(floating_to_fixed(degrees), Err(GridError::InvalidEnvelope(_))),
                "{degrees} was accepted"
            );
        }
        assert!(floating_to_fixed(MAX_FIXED_DEGREES).is_ok());
        assert!(floating_to_fixed(-MAX_FIXED_DEGREES).is_ok());
    }

    #[test]
    fn test_from_floating_rejects_non_finite() {
        let cases = [
            rect(f64::NAN, 1.0, -44.6, -44.4),
            rect(f64::NAN, 1.0, f64::NAN, 1.0),
            rect(f64::INFINITY, f64::INFINITY, -44.6, -44.4),
            rect(0.0, 1.0, f64::NEG_INFINITY, 0.0),
            rect(0.0, 1e12, 0.0, 1.0),
        ];
        for envelope in cases {
            assert!(matches!(
                FixedPointEnvelope::try_from(envelope),
                Err(GridError::InvalidEnvelope(_))
            ));
        }
    }

    #[test]
    fn test_new_rejects_inverted() {
        assert!(matches!(
            FixedPointEnvelope::new(10, 5, 0, 1),
            Err(GridError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            FixedPointEnvelope::new(0, 1, 10, 5),
            Err(GridError::InvalidEnvelope(_))
        ));
        assert!(FixedPointEnvelope::new(5, 5, 1, 1).is_ok());
    }

    #[test]
    fn test_to_floating() {
        let original = rect(-0.2, -0.1, 51.5, 51.6);
        let back = FixedPointEnvelope::try_from(original).unwrap().to_floating();
        assert!((back.min().x - original.min().x).abs() < 1e-7);
        assert!((back.max().y - original.max().y).abs() < 1e-7);
    }

    #[test]
    fn test_predicates() {
        let grid = FixedPointEnvelope::try_from(rect(10.0, 15.0, -45.0, -44.0)).unwrap();
        let inside = FixedPointEnvelope::try_from(rect(11.0, 12.0, -44.6, -44.4)).unwrap();
        let edge = FixedPointEnvelope::try_from(rect(14.9, 15.1, -44.6, -44.4)).unwrap();
        let outside = FixedPointEnvelope::try_from(rect(15.9, 16.0, -45.0, -44.0)).unwrap();
        let touching = FixedPointEnvelope::try_from(rect(15.0, 16.0, -45.0, -44.0)).unwrap();

        assert!(grid.contains(&inside) && grid.intersects(&inside));
        assert!(!grid.contains(&edge) && grid.intersects(&edge));
        assert!(!grid.intersects(&outside));
        assert!(grid.intersects(&touching));
    }
}
