//! Placement of a grid in the Web Mercator pixel plane

use crate::{GridError, Result, projection};
use geo::{Coord, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of points a grid may hold
///
/// Point indices stay within `i32`, and a query that selects the whole grid
/// can still be allocated.
pub const MAX_FEATURE_COUNT: usize = i32::MAX as usize;

/// Validated grid placement: zoom level, top-left pixel and size in pixels
///
/// Two grids with equal extents contain the same points under the same indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WebMercatorExtents {
    zoom: u32,
    /// Global pixel column of the westernmost points
    west: i32,
    /// Global pixel row of the northernmost points
    north: i32,
    width: i32,
    height: i32,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl WebMercatorExtents {
    /// Create extents from explicit pixel bounds
    ///
    /// # Errors
    /// A configuration error if `zoom` is outside `0..=MAX_ZOOM`, if `width` or
    /// `height` is not positive, if the grid's far edge overflows `i32`, or if
    /// the grid holds more than [`MAX_FEATURE_COUNT`] points.
    pub fn new(zoom: i32, west: i32, north: i32, width: i32, height: i32) -> Result<Self> {
        let zoom = Self::validate_zoom(zoom)?;

        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        if west.checked_add(width).is_none() || north.checked_add(height).is_none() {
            return Err(GridError::PixelOverflow {
                reason: format!("{width}x{height} grid at ({west}, {north})"),
            });
        }
        let count = width as u64 * height as u64;
        if count > MAX_FEATURE_COUNT as u64 {
            return Err(GridError::TooManyPoints {
                count,
                max: MAX_FEATURE_COUNT,
            });
        }

        Ok(Self {
            zoom,
            west,
            north,
            width,
            height,
        })
    }

    /// Smallest extents at `zoom` whose pixels cover a WGS84 envelope
    ///
    /// Every pixel touched by the envelope is part of the grid: the edges are
    /// the pixels containing the envelope's corners, included on both sides.
    /// Edges are clamped to the world plane, so longitudes outside ±180 and the
    /// 180° meridian itself land on the outermost pixel column.
    pub fn from_wgs_envelope(envelope: Rect<f64>, zoom: i32) -> Result<Self> {
        let zoom_u = Self::validate_zoom(zoom)?;

        let min = envelope.min();
        let max = envelope.max();
        if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
            return Err(GridError::InvalidEnvelope(format!(
                "non-finite coordinates in {envelope:?}"
            )));
        }

        // Edges on the far side of the world (lon 180, the southern latitude
        // limit) floor to `world`, one past the last pixel
        let last = projection::world_size_pixels(zoom_u) as i64 - 1;
        let clamp = |pixel: i32| (pixel as i64).clamp(0, last);

        let west = clamp(projection::lon_to_pixel(min.x, zoom_u));
        let east = clamp(projection::lon_to_pixel(max.x, zoom_u));
        // Pixel rows grow southward
        let north = clamp(projection::lat_to_pixel(max.y, zoom_u));
        let south = clamp(projection::lat_to_pixel(min.y, zoom_u));

        let width = east - west + 1;
        let height = south - north + 1;
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let width = i32::try_from(width).map_err(|_| GridError::PixelOverflow {
            reason: format!("width {width} at zoom {zoom}"),
        })?;
        let height = i32::try_from(height).map_err(|_| GridError::PixelOverflow {
            reason: format!("height {height} at zoom {zoom}"),
        })?;

        Self::new(zoom, west as i32, north as i32, width, height)
    }

    fn validate_zoom(zoom: i32) -> Result<u32> {
        u32::try_from(zoom)
            .ok()
            .filter(|z| *z <= projection::MAX_ZOOM)
            .ok_or(GridError::InvalidZoom {
                zoom,
                max: projection::MAX_ZOOM,
            })
    }

    #[inline]
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    #[inline]
    pub fn west(&self) -> i32 {
        self.west
    }

    #[inline]
    pub fn north(&self) -> i32 {
        self.north
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of points covered, `width * height`
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Grid-local (column, row) of a point index
    #[inline]
    pub fn cell_of(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.feature_count() {
            return None;
        }
        let width = self.width as usize;
        Some(((index % width) as i32, (index / width) as i32))
    }

    /// Point index of a global pixel, if it lies within the grid
    #[inline]
    pub fn index_of_pixel(&self, x: i32, y: i32) -> Option<usize> {
        let col = x as i64 - self.west as i64;
        let row = y as i64 - self.north as i64;
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// WGS84 envelope of the outer pixel edges
    pub fn wgs_envelope(&self) -> Rect<f64> {
        let east = self.west as i64 + self.width as i64;
        let south = self.north as i64 + self.height as i64;
        Rect::new(
            Coord {
                x: projection::pixel_to_lon_f64(self.west as f64, self.zoom),
                y: projection::pixel_to_lat_f64(south as f64, self.zoom),
            },
            Coord {
                x: projection::pixel_to_lon_f64(east as f64, self.zoom),
                y: projection::pixel_to_lat_f64(self.north as f64, self.zoom),
            },
        )
    }
}
