use std::collections::HashMap;
use std::sync::Arc;

use foundation::math::LatLng;
use parking_lot::Mutex;
use scene::camera::{CameraFrame, FrameLimits, compute_frame_with};
use scene::hover::HoverEvent;
use scene::resolver::ResolvedPoints;
use scene::supplier::SupplierId;

#[derive(Debug)]
struct CameraState {
    frame: CameraFrame,
    limits: FrameLimits,
    follow_min_zoom: u8,
    /// Set once the viewer (or a hover) moved the camera away from the
    /// computed frame; cleared by `fit_to_points`.
    manual_override: bool,
    points: HashMap<SupplierId, LatLng>,
    fitted: CameraFrame,
}

/// Camera of one map instance, shared with its hover handler.
#[derive(Debug, Clone)]
pub struct SharedCamera {
    state: Arc<Mutex<CameraState>>,
}

impl SharedCamera {
    pub fn new(limits: FrameLimits, follow_min_zoom: u8) -> Self {
        let frame = compute_frame_with(&[], &limits);
        Self {
            state: Arc::new(Mutex::new(CameraState {
                frame,
                limits,
                follow_min_zoom,
                manual_override: false,
                points: HashMap::new(),
                fitted: frame,
            })),
        }
    }

    pub fn frame(&self) -> CameraFrame {
        self.state.lock().frame
    }

    pub fn has_override(&self) -> bool {
        self.state.lock().manual_override
    }

    /// Replaces the known points and reframes unless overridden.
    pub fn set_points(&self, resolved: &ResolvedPoints) {
        let mut s = self.state.lock();
        s.points = resolved
            .points
            .iter()
            .map(|p| (p.supplier_id.clone(), p.position()))
            .collect();
        s.fitted = compute_frame_with(&resolved.points, &s.limits);
        if !s.manual_override {
            s.frame = s.fitted;
        }
    }

    /// Drops any override and returns to the computed frame.
    pub fn fit_to_points(&self) -> CameraFrame {
        let mut s = self.state.lock();
        s.manual_override = false;
        s.frame = s.fitted;
        s.frame
    }

    pub fn pan_to(&self, center: LatLng) {
        let mut s = self.state.lock();
        s.frame.center = center;
        s.manual_override = true;
    }

    pub fn set_zoom(&self, zoom: u8) {
        let mut s = self.state.lock();
        s.frame.zoom = zoom.max(s.limits.min_zoom).min(s.limits.max_zoom);
        s.manual_override = true;
    }

    /// Centers on `center` at `zoom` (clamped).
    pub fn focus(&self, center: LatLng, zoom: u8) {
        let mut s = self.state.lock();
        let zoom = zoom.max(s.limits.min_zoom).min(s.limits.max_zoom);
        s.frame = CameraFrame::new(center, zoom);
        s.manual_override = true;
    }

    /// Hover follow: entering a known supplier pans to it, zooming in to at
    /// least the follow zoom but never zooming out. Leaving does nothing.
    ///
    /// Returns `true` if the camera moved.
    pub fn follow(&self, event: &HoverEvent) -> bool {
        if !event.entering {
            return false;
        }
        let mut s = self.state.lock();
        let Some(target) = s.points.get(&event.supplier_id).copied() else {
            return false;
        };
        let zoom = s
            .frame
            .zoom
            .max(s.follow_min_zoom)
            .min(s.limits.max_zoom);
        s.frame = CameraFrame::new(target, zoom);
        s.manual_override = true;
        true
    }
}
