//! Web Mercator pixel projection
//!
//! Stateless conversions between WGS84 degrees and global pixel coordinates
//! of the standard 256-pixel tile scheme. At zoom `z` the whole world spans
//! `2^z * 256` pixels on each axis, with pixel (0, 0) at the north-west corner.
//!
//! Integer pixels are always the pixel *containing* a coordinate (the floor of
//! the continuous pixel position). Converting a pixel back to degrees yields
//! its north-west corner; use the `*_center_*` variants for the cell center.

use std::f64::consts::PI;

/// Pixels along one side of a tile
pub const TILE_SIZE: u32 = 256;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Deepest zoom whose pixel plane still fits in an `i32`
pub const MAX_ZOOM: u32 = 22;

/// Width (and height) of the pixel plane at the given zoom
#[inline(always)]
pub fn world_size_pixels(zoom: u32) -> f64 {
    TILE_SIZE as f64 * (1u64 << zoom) as f64
}

/// Check if a latitude can be projected without clamping
#[inline(always)]
pub fn is_valid_latitude(lat: f64) -> bool {
    (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
}

/// Continuous pixel x for a longitude in degrees
#[inline(always)]
pub fn lon_to_pixel_f64(lon: f64, zoom: u32) -> f64 {
    (lon + 180.0) / 360.0 * world_size_pixels(zoom)
}

/// Continuous pixel y for a latitude in degrees
///
/// Latitudes beyond ±[`MAX_LATITUDE`] are clamped first so the result stays
/// finite, and the result never leaves `[0, world_size_pixels(zoom)]`.
#[inline(always)]
pub fn lat_to_pixel_f64(lat: f64, zoom: u32) -> f64 {
    let world = world_size_pixels(zoom);
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let merc = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();
    // MAX_LATITUDE is rounded up from the exact limit
    ((1.0 - merc / PI) / 2.0 * world).clamp(0.0, world)
}

/// Pixel column containing the given longitude
///
/// # Arguments
/// * `lon` - Longitude in degrees (-180 to 180)
/// * `zoom` - Zoom level
#[inline(always)]
pub fn lon_to_pixel(lon: f64, zoom: u32) -> i32 {
    lon_to_pixel_f64(lon, zoom).floor() as i32
}

/// Pixel row containing the given latitude
///
/// # Arguments
/// * `lat` - Latitude in degrees (-85.05 to 85.05)
/// * `zoom` - Zoom level
#[inline(always)]
pub fn lat_to_pixel(lat: f64, zoom: u32) -> i32 {
    lat_to_pixel_f64(lat, zoom).floor() as i32
}

/// Longitude of a continuous pixel x
#[inline(always)]
pub fn pixel_to_lon_f64(x: f64, zoom: u32) -> f64 {
    x / world_size_pixels(zoom) * 360.0 - 180.0
}

/// Latitude of a continuous pixel y
#[inline(always)]
pub fn pixel_to_lat_f64(y: f64, zoom: u32) -> f64 {
    let n = PI - 2.0 * PI * y / world_size_pixels(zoom);
    n.sinh().atan().to_degrees()
}

/// Longitude of the west edge of a pixel column
#[inline(always)]
pub fn pixel_to_lon(x: i32, zoom: u32) -> f64 {
    pixel_to_lon_f64(x as f64, zoom)
}

/// Latitude of the north edge of a pixel row
#[inline(always)]
pub fn pixel_to_lat(y: i32, zoom: u32) -> f64 {
    pixel_to_lat_f64(y as f64, zoom)
}

/// Longitude of the center of a pixel column
#[inline(always)]
pub fn pixel_to_center_lon(x: i32, zoom: u32) -> f64 {
    pixel_to_lon_f64(x as f64 + 0.5, zoom)
}

/// Latitude of the center of a pixel row
#[inline(always)]
pub fn pixel_to_center_lat(y: i32, zoom: u32) -> f64 {
    pixel_to_lat_f64(y as f64 + 0.5, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOOM: u32 = 9;

    #[test]
    fn test_world_size() {
        assert_eq!(world_size_pixels(0), 256.0);
        assert_eq!(world_size_pixels(9), 131_072.0);
        assert_eq!(world_size_pixels(MAX_ZOOM), (1u64 << 30) as f64);
    }

    #[test]
    fn test_origin_is_plane_center() {
        let half = (world_size_pixels(ZOOM) / 2.0) as i32;
        assert_eq!(lon_to_pixel(0.0, ZOOM), half);
        assert_eq!(lat_to_pixel(0.0, ZOOM), half);
    }

    #[test]
    fn test_plane_edges() {
        assert_eq!(lon_to_pixel(-180.0, ZOOM), 0);
        assert_eq!(lat_to_pixel(MAX_LATITUDE, ZOOM), 0);
        assert!((pixel_to_lon(0, ZOOM) + 180.0).abs() < 1e-9);
        assert!((pixel_to_lat(0, ZOOM) - MAX_LATITUDE).abs() < 1e-6);
    }

    #[test]
    fn test_lat_roundtrip() {
        for lat in [-75.0, -25.0, 0.0, 25.0, 75.0] {
            let back = pixel_to_lat(lat_to_pixel(lat, ZOOM), ZOOM);
            assert!((lat - back).abs() < 1e-2, "lat {lat} came back as {back}");
        }
    }

    #[test]
    fn test_lon_roundtrip() {
        for lon in [-180.0, -175.0, -90.0, 0.0, 90.0, 175.0] {
            let back = pixel_to_lon(lon_to_pixel(lon, ZOOM), ZOOM);
            assert!((lon - back).abs() < 1e-2, "lon {lon} came back as {back}");
        }
    }

    #[test]
    fn test_rows_grow_southward() {
        assert!(lat_to_pixel(-45.0, ZOOM) > lat_to_pixel(-44.0, ZOOM));
        assert!(lon_to_pixel(15.0, ZOOM) > lon_to_pixel(10.0, ZOOM));
    }

    #[test]
    fn test_center_lies_inside_pixel() {
        let x = lon_to_pixel(12.3, ZOOM);
        let y = lat_to_pixel(-44.3, ZOOM);
        assert_eq!(lon_to_pixel(pixel_to_center_lon(x, ZOOM), ZOOM), x);
        assert_eq!(lat_to_pixel(pixel_to_center_lat(y, ZOOM), ZOOM), y);
    }

    #[test]
    fn test_polar_latitude_is_clamped() {
        assert!(!is_valid_latitude(89.0));
        assert!(is_valid_latitude(-85.0));
        assert_eq!(lat_to_pixel(89.0, ZOOM), lat_to_pixel(MAX_LATITUDE, ZOOM));
        assert!(lat_to_pixel_f64(-90.0, ZOOM).is_finite());
    }
}
