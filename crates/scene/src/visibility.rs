/// Screen-space rectangle in CSS pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Overlap test; rectangles that only share an edge count as touching.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Lookahead visibility test for deferred work.
///
/// Convention:
/// - A region is "near" when it intersects the viewport grown by
///   `margin_px` on every side, so work can start before the region
///   scrolls fully into view.
/// - Non-finite geometry is never near.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibilityProbe {
    pub margin_px: f64,
}

impl VisibilityProbe {
    pub fn new(margin_px: f64) -> Self {
        Self {
            margin_px: margin_px.max(0.0),
        }
    }

    pub fn is_near(&self, region: &ScreenRect, viewport: &ScreenRect) -> bool {
        if !rect_is_finite(region) || !rect_is_finite(viewport) {
            return false;
        }
        viewport.inflate(self.margin_px).intersects(region)
    }
}

fn rect_is_finite(r: &ScreenRect) -> bool {
    r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()
}

#[cfg(test)]
mod tests {
    use super::{ScreenRect, VisibilityProbe};

    fn viewport() -> ScreenRect {
        ScreenRect::new(0.0, 0.0, 1024.0, 768.0)
    }

    #[test]
    fn region_inside_viewport_is_near() {
        let probe = VisibilityProbe::new(0.0);
        assert!(probe.is_near(&ScreenRect::new(100.0, 100.0, 400.0, 300.0), &viewport()));
    }

    #[test]
    fn margin_starts_work_before_region_enters() {
        let below_fold = ScreenRect::new(0.0, 868.0, 1024.0, 400.0);
        assert!(!VisibilityProbe::new(50.0).is_near(&below_fold, &viewport()));
        assert!(VisibilityProbe::new(100.0).is_near(&below_fold, &viewport()));
    }

    #[test]
    fn far_region_is_not_near() {
        let probe = VisibilityProbe::new(200.0);
        assert!(!probe.is_near(&ScreenRect::new(0.0, 5_000.0, 1024.0, 400.0), &viewport()));
        assert!(!probe.is_near(&ScreenRect::new(0.0, -2_000.0, 1024.0, 400.0), &viewport()));
    }

    #[test]
    fn non_finite_geometry_is_ignored() {
        let probe = VisibilityProbe::new(200.0);
        assert!(!probe.is_near(&ScreenRect::new(f64::NAN, 0.0, 10.0, 10.0), &viewport()));
    }

    #[test]
    fn negative_margin_is_treated_as_zero() {
        assert_eq!(VisibilityProbe::new(-5.0).margin_px, 0.0);
    }
}
