//! Web Mercator projection helpers.
//!
//! Coordinates are projected into the normalized unit square used by slippy-map
//! tiling: `x` grows eastwards from 0 at 180°W to 1 at 180°E and `y` grows
//! southwards from 0 at the northern Mercator limit to 1 at the southern one. A
//! tile-pixel distance `d` at zoom `z` with tile extent `e` spans `d / (e * 2^z)`
//! in this space.

use std::f64::consts::PI;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.051129;

/// Size of the whole world in pixels at zoom 0 for camera math
pub const WORLD_SIZE_PX: f64 = 512.0;

/// Longitude in degrees to normalized x.
#[inline]
pub fn lon_to_x(lon: f64) -> f64 {
    lon / 360.0 + 0.5
}

/// Latitude in degrees to normalized y, clamped to `[0, 1]`.
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Normalized x back to longitude in degrees.
#[inline]
pub fn x_to_lon(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Normalized y back to latitude in degrees.
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// A tile-pixel radius expressed in normalized units at `zoom`.
#[inline]
pub fn radius_at_zoom(radius: f64, extent: f64, zoom: u8) -> f64 {
    radius / (extent * 2f64.powi(zoom as i32))
}

/// Project longitude/latitude to world pixels at zoom 0.
///
/// Latitude is clamped to the Mercator limit first, so poles project onto the
/// top and bottom edges of the world square.
#[inline]
pub fn to_world_pixels(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    (lon_to_x(lon) * WORLD_SIZE_PX, lat_to_y(lat) * WORLD_SIZE_PX)
}
