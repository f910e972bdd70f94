//! Spherical (Web) Mercator projection to world pixels.
//!
//! World pixel space at zoom `z` is a `256 * 2^z` square with the origin in
//! the north-west corner, matching slippy-map tile conventions.

use super::{LatLng, MERCATOR_MAX_LAT};

pub const TILE_SIZE_PX: f64 = 256.0;

pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE_PX * 2_f64.powf(zoom)
}

/// Projects `p` to world pixels at `zoom`.
pub fn project_px(p: LatLng, zoom: f64) -> [f64; 2] {
    let size = world_size_px(zoom);
    let lat = p.lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let sin_lat = lat.to_radians().sin();

    let x = (p.lng + 180.0) / 360.0;
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * std::f64::consts::PI);
    [x * size, y * size]
}

pub fn px_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
