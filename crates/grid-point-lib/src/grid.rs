//! GridPointSet - A raster of points covering a Web Mercator pixel rectangle
//!
//! Each pixel of the grid's rectangle at its zoom level is one point. Points are
//! numbered row-major from the north-west corner, which makes range queries a
//! matter of projecting the query envelope and clipping it to the rectangle.

use crate::{FixedPointEnvelope, GridError, Result, WebMercatorExtents, projection};

use geo::Rect;
use rayon::prelude::*;
use std::sync::Arc;

/// Zoom level used when deriving a grid from a geographic envelope.
/// At zoom 9 a point is roughly 300 meters apart at mid latitudes.
pub const DEFAULT_ZOOM: i32 = 9;

/// Configuration for grids derived from geographic envelopes
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Zoom level of derived grids.
    /// Default: [`DEFAULT_ZOOM`]
    pub zoom: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

/// An immutable grid of points at a fixed Web Mercator zoom level
///
/// The grid is `Send + Sync`; once built it can be shared between threads and
/// queried concurrently without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPointSet {
    /// Placement of the grid in the pixel plane
    extents: WebMercatorExtents,
    /// Optional per-point values supplied by the caller, indexed like the points
    opportunity_counts: Option<Arc<[f64]>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GridPointSet {
    /// Create a grid from explicit extents
    pub fn new(extents: WebMercatorExtents) -> Self {
        tracing::debug!(
            "Created {}x{} grid at zoom {} with origin pixel ({}, {})",
            extents.width(),
            extents.height(),
            extents.zoom(),
            extents.west(),
            extents.north()
        );
        Self {
            extents,
            opportunity_counts: None,
        }
    }

    /// Create the smallest grid at `config.zoom` covering a WGS84 envelope
    ///
    /// The envelope's x axis is longitude and its y axis latitude, in degrees.
    pub fn from_wgs_envelope(envelope: Rect<f64>, config: &Config) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grid::from_wgs_envelope");

        if !projection::is_valid_latitude(envelope.min().y)
            || !projection::is_valid_latitude(envelope.max().y)
        {
            tracing::warn!(
                "Envelope latitudes ({}, {}) exceed the Web Mercator range and will be clamped",
                envelope.min().y,
                envelope.max().y
            );
        }

        let extents = WebMercatorExtents::from_wgs_envelope(envelope, config.zoom)?;
        Ok(Self::new(extents))
    }

    /// Attach per-point opportunity counts
    ///
    /// There must be exactly one value per point, in point index order.
    pub fn with_opportunity_counts(mut self, counts: Vec<f64>) -> Result<Self> {
        let expected = self.feature_count();
        if counts.len() != expected {
            return Err(GridError::SidecarLength {
                expected,
                actual: counts.len(),
            });
        }
        self.opportunity_counts = Some(counts.into());
        Ok(self)
    }

    #[inline]
    pub fn extents(&self) -> &WebMercatorExtents {
        &self.extents
    }

    #[inline]
    pub fn zoom(&self) -> u32 {
        self.extents.zoom()
    }

    #[inline]
    pub fn west(&self) -> i32 {
        self.extents.west()
    }

    #[inline]
    pub fn north(&self) -> i32 {
        self.extents.north()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.extents.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.extents.height()
    }

    /// Total number of points in the grid
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.extents.feature_count()
    }

    /// Indices of every point whose pixel touches the envelope
    ///
    /// Indices are returned in increasing (row-major) order. An envelope that
    /// does not overlap the grid yields an empty list.
    ///
    /// # Errors
    /// [`GridError::InvalidEnvelope`] if the envelope is inverted on either axis.
    pub fn points_in_envelope(&self, envelope: &FixedPointEnvelope) -> Result<Vec<usize>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grid::points_in_envelope");

        envelope.validate()?;

        let bounds = envelope.to_floating();
        let zoom = self.zoom();

        // Query pixel rectangle relative to the grid origin, inclusive on all sides
        let west = projection::lon_to_pixel(bounds.min().x, zoom) as i64 - self.west() as i64;
        let east = projection::lon_to_pixel(bounds.max().x, zoom) as i64 - self.west() as i64;
        let north = projection::lat_to_pixel(bounds.max().y, zoom) as i64 - self.north() as i64;
        let south = projection::lat_to_pixel(bounds.min().y, zoom) as i64 - self.north() as i64;

        let min_col = west.max(0);
        let max_col = east.min(self.width() as i64 - 1);
        let min_row = north.max(0);
        let max_row = south.min(self.height() as i64 - 1);

        if min_col > max_col || min_row > max_row {
            tracing::trace!("Envelope {:?} does not overlap the grid", envelope);
            return Ok(Vec::new());
        }

        let width = self.width() as usize;
        let cols = (min_col as usize)..=(max_col as usize);
        let count = cols.clone().count() * (max_row - min_row + 1) as usize;

        let mut indices = Vec::with_capacity(count);
        for row in (min_row as usize)..=(max_row as usize) {
            let row_start = row * width;
            indices.extend(cols.clone().map(|col| row_start + col));
        }

        tracing::trace!("Envelope {:?} matched {} points", envelope, indices.len());
        Ok(indices)
    }

    /// Run several range queries in parallel
    ///
    /// Results are in the same order as `envelopes`. Fails if any envelope is
    /// invalid.
    pub fn points_in_envelopes(&self, envelopes: &[FixedPointEnvelope]) -> Result<Vec<Vec<usize>>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("grid::points_in_envelopes");

        envelopes
            .par_iter()
            .map(|envelope| self.points_in_envelope(envelope))
            .collect()
    }

    /// Latitude of the center of a point's pixel
    pub fn lat(&self, index: usize) -> Option<f64> {
        let (_, row) = self.extents.cell_of(index)?;
        Some(projection::pixel_to_center_lat(self.north() + row, self.zoom()))
    }

    /// Longitude of the center of a point's pixel
    pub fn lon(&self, index: usize) -> Option<f64> {
        let (col, _) = self.extents.cell_of(index)?;
        Some(projection::pixel_to_center_lon(self.west() + col, self.zoom()))
    }

    /// Index of the point whose pixel contains the given location
    pub fn point_index_containing(&self, lon: f64, lat: f64) -> Option<usize> {
        let x = self.lon_to_pixel(lon);
        let y = self.lat_to_pixel(lat);
        self.extents.index_of_pixel(x, y)
    }

    /// WGS84 envelope covered by the grid's pixels
    pub fn wgs_envelope(&self) -> Rect<f64> {
        self.extents.wgs_envelope()
    }

    /// Global pixel column containing a longitude, at this grid's zoom
    #[inline]
    pub fn lon_to_pixel(&self, lon: f64) -> i32 {
        projection::lon_to_pixel(lon, self.zoom())
    }

    /// Global pixel row containing a latitude, at this grid's zoom
    #[inline]
    pub fn lat_to_pixel(&self, lat: f64) -> i32 {
        projection::lat_to_pixel(lat, self.zoom())
    }

    /// Longitude of the west edge of a global pixel column, at this grid's zoom
    #[inline]
    pub fn pixel_to_lon(&self, x: i32) -> f64 {
        projection::pixel_to_lon(x, self.zoom())
    }

    /// Latitude of the north edge of a global pixel row, at this grid's zoom
    #[inline]
    pub fn pixel_to_lat(&self, y: i32) -> f64 {
        projection::pixel_to_lat(y, self.zoom())
    }

    /// Whether per-point opportunity counts are attached
    #[inline]
    pub fn has_opportunity_counts(&self) -> bool {
        self.opportunity_counts.is_some()
    }

    /// Opportunity count at a point, zero when no counts are attached
    ///
    /// Returns `None` for indices outside the grid.
    pub fn opportunity_count(&self, index: usize) -> Option<f64> {
        if index >= self.feature_count() {
            return None;
        }
        Some(
            self.opportunity_counts
                .as_ref()
                .map_or(0.0, |counts| counts[index]),
        )
    }

    /// Sum of all opportunity counts in the grid
    pub fn sum_total_opportunities(&self) -> f64 {
        self.opportunity_counts
            .as_ref()
            .map_or(0.0, |counts| counts.iter().sum())
    }
}
