//! Grid Point Library - Web Mercator Grid Point Sets
//!
//! This library overlays a rectangular region of the Web Mercator pixel plane
//! with a uniform raster of points (one per pixel) at a fixed zoom level, and
//! answers range queries: given a geographic envelope, return the indices of
//! every grid point whose pixel touches it.
//!
//! # Architecture
//!
//! - **[`projection`]**: Stateless degrees ↔ pixel conversions at a given zoom
//! - **[`FixedPointEnvelope`]**: Envelope in scaled-integer degrees, the canonical query input
//! - **[`WebMercatorExtents`]**: Validated grid placement (zoom, west, north, width, height)
//! - **[`GridPointSet`]**: Immutable grid with feature count and range queries
//!
//! # Example
//!
//! ```ignore
//! use geo::{Coord, Rect};
//! use grid_point_lib::{Config, FixedPointEnvelope, GridPointSet};
//!
//! let area = Rect::new(Coord { x: 10.0, y: -45.0 }, Coord { x: 15.0, y: -44.0 });
//! let grid = GridPointSet::from_wgs_envelope(area, &Config::default())?;
//!
//! let query = Rect::new(Coord { x: 11.0, y: -44.6 }, Coord { x: 12.0, y: -44.4 });
//! let indices = grid.points_in_envelope(&FixedPointEnvelope::try_from(query)?)?;
//! ```
//!
//! # Performance Characteristics
//!
//! - **Build Time**: O(1), plus O(N) to validate an opportunity sidecar
//! - **Query Time**: O(K) where K = points in the intersection
//! - **Memory**: O(1) per grid, O(N) with a sidecar

mod extents;
mod fixed;
mod grid;
pub mod projection;

// Public API exports
pub use extents::{MAX_FEATURE_COUNT, WebMercatorExtents};
pub use fixed::{
    FIXED_FACTOR, FixedPointEnvelope, MAX_FIXED_DEGREES, fixed_to_floating, floating_to_fixed,
};
pub use grid::{Config, DEFAULT_ZOOM, GridPointSet};

/// Error types for grid construction and queries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Invalid zoom level {zoom}: must be between 0 and {max}")]
    InvalidZoom { zoom: i32, max: u32 },

    #[error("Invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Grid does not fit in the pixel plane: {reason}")]
    PixelOverflow { reason: String },

    #[error("Grid has {count} points, more than the limit of {max}")]
    TooManyPoints { count: u64, max: usize },

    #[error("Opportunity counts have {actual} values but the grid has {expected} points")]
    SidecarLength { expected: usize, actual: usize },

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),
}

impl GridError {
    /// Whether this error comes from an invalid grid configuration
    /// (as opposed to an invalid query argument)
    pub fn is_configuration(&self) -> bool {
        !matches!(self, GridError::InvalidEnvelope(_))
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(WebMercatorExtents) -> GridPointSet = GridPointSet::new;
        let _: fn() -> Config = Config::default;
        let _: fn(i32, i32, i32, i32) -> Result<FixedPointEnvelope> = FixedPointEnvelope::new;
    }

    #[test]
    fn test_error_classification() {
        assert!(GridError::InvalidZoom { zoom: -1, max: 22 }.is_configuration());
        assert!(
            GridError::InvalidDimensions {
                width: 0,
                height: 3
            }
            .is_configuration()
        );
        assert!(
            GridError::TooManyPoints {
                count: 1 << 40,
                max: MAX_FEATURE_COUNT
            }
            .is_configuration()
        );
        assert!(!GridError::InvalidEnvelope("inverted".to_string()).is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = GridError::SidecarLength {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Opportunity counts have 3 values but the grid has 4 points"
        );
    }
}
