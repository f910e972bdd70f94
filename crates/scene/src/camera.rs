use foundation::bounds::GeoBounds;
use foundation::math::LatLng;
use serde::Serialize;

use crate::resolver::RenderPoint;

pub const DEFAULT_ZOOM: u8 = 2;
pub const SINGLE_POINT_ZOOM: u8 = 8;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Map camera: center and integer zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraFrame {
    pub center: LatLng,
    pub zoom: u8,
}

impl CameraFrame {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// Zoom levels used when framing a point set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameLimits {
    /// Zoom for an empty set, centered on (0, 0).
    pub default_zoom: u8,
    /// Zoom when every point coincides.
    pub single_point_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            single_point_zoom: SINGLE_POINT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Frames `points` with the default limits.
pub fn compute_frame(points: &[RenderPoint]) -> CameraFrame {
    compute_frame_with(points, &FrameLimits::default())
}

/// Frames `points`: bounding-box center, zoom from the widest span.
///
/// zoom = clamp(floor(log2(360 / max_span)), min, max); a zero span (one
/// point, or all points identical) uses `single_point_zoom`.
pub fn compute_frame_with(points: &[RenderPoint], limits: &FrameLimits) -> CameraFrame {
    let Some(bounds) = GeoBounds::from_points(points.iter().map(RenderPoint::position)) else {
        return CameraFrame::new(LatLng::ORIGIN, limits.default_zoom);
    };

    let span = bounds.max_span();
    let zoom = if span > 0.0 {
        zoom_for_span(span, limits)
    } else {
        limits.single_point_zoom
    };

    CameraFrame::new(bounds.center(), zoom)
}

fn zoom_for_span(span: f64, limits: &FrameLimits) -> u8 {
    let z = (360.0 / span).log2().floor();
    let lo = f64::from(limits.min_zoom);
    let hi = f64::from(limits.max_zoom);
    // Bounded by u8 limits, so the cast cannot truncate. `max` then `min`
    // rather than `clamp`: inverted limits resolve to `max_zoom`.
    z.max(lo).min(hi) as u8
}
