//! Screen-space projection used by the pickup/drop-off picker.
//!
//! The picker shows `360 / 2^zoom` degrees across both axes of the view and
//! centres on [`Viewport::center`]. It is a flat approximation, good enough
//! for placing pins by hand at city zoom levels.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Initial picker centre (Mumbai Central).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(19.076, 72.8777);

pub const DEFAULT_ZOOM: u8 = 12;
pub const MIN_ZOOM: u8 = 8;
pub const MAX_ZOOM: u8 = 18;

/// Zoom the picker jumps to after a pin is placed.
pub const FOCUS_ZOOM: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM }
    }
}

impl Viewport {
    /// A view on `center`, with `zoom` clamped to the picker's range.
    #[must_use]
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM) }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Recentre on a freshly placed pin.
    pub const fn focus(&mut self, point: GeoPoint) {
        self.center = point;
        self.zoom = FOCUS_ZOOM;
    }

    /// Degrees spanned by the view along either axis.
    #[must_use]
    pub fn span_deg(&self) -> f64 {
        360.0 / 2f64.powi(i32::from(self.zoom))
    }

    /// The point under pixel (`x`, `y`) of a `width` x `height` view. `None`
    /// when the view has no area or the pixel is not a finite position.
    #[must_use]
    pub fn point_at(&self, x: f64, y: f64, width: f64, height: f64) -> Option<GeoPoint> {
        let sized = |side: f64| side.is_finite() && side > 0.0;
        if !sized(width) || !sized(height) || !x.is_finite() || !y.is_finite() {
            return None;
        }

        let span = self.span_deg();
        Some(GeoPoint {
            lat: (0.5 - y / height).mul_add(span, self.center.lat),
            lng: (x / width - 0.5).mul_add(span, self.center.lng),
        })
    }

    /// Marker placement for `point` as (left, top) percentages of the view.
    #[must_use]
    pub fn offset_of(&self, point: &GeoPoint) -> (f64, f64) {
        let span = self.span_deg();
        let left = 50.0 + (point.lng - self.center.lng) / span * 100.0;
        let top = 50.0 - (point.lat - self.center.lat) / span * 100.0;
        (left, top)
    }
}
