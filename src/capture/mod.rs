//! Interactive polygon capture: taps on a map become a terrain boundary.
//!
//! [`PolygonCapture`] is the plain state and has no knowledge of rendering.
//! [`CaptureSession`] attaches it to a [`MapSurface`] and drives the
//! tap/undo/clear/confirm loop.

pub mod session;
pub mod terminal;

pub use session::{CaptureSession, LocationProvider, MapSurface, StaticLocation, SurfaceEvent};
pub use terminal::TerminalSurface;

use crate::domain::{GeoPoint, MapSelection, Polygon};
use crate::error::CaptureError;
use crate::geometry::mean_center;

/// Viewport center used until a device location is known (Quito).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(-0.1807, -78.4678);

/// Points drawn so far plus the current viewport center.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCapture {
    polygon: Polygon,
    viewport_center: GeoPoint,
}

impl Default for PolygonCapture {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl PolygonCapture {
    pub fn new(viewport_center: GeoPoint) -> Self {
        Self {
            polygon: Polygon::default(),
            viewport_center,
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        self.polygon.points()
    }

    pub fn len(&self) -> usize {
        self.polygon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty()
    }

    pub fn viewport_center(&self) -> GeoPoint {
        self.viewport_center
    }

    pub fn set_viewport_center(&mut self, center: GeoPoint) {
        self.viewport_center = center;
    }

    /// Append a vertex. Duplicates and self-intersections are accepted.
    pub fn add_point(&mut self, point: GeoPoint) {
        self.polygon.push(point);
    }

    /// Remove the last vertex, if any.
    pub fn undo(&mut self) {
        self.polygon.pop();
    }

    pub fn clear(&mut self) {
        self.polygon.clear();
    }

    /// Center and boundary to hand to the terrain form.
    ///
    /// With no points drawn the center is the viewport center; otherwise it
    /// is the mean of all vertices, recomputed from scratch on every call.
    pub fn compute_selection(&self) -> MapSelection {
        let center = mean_center(self.polygon.points()).unwrap_or(self.viewport_center);
        MapSelection {
            center,
            polygon: self.polygon.clone(),
        }
    }

    /// An empty drawing (center only) or a closed shape of 3+ points.
    /// One or two points means drawing was started but not finished.
    pub fn is_valid_for_submission(&self) -> bool {
        self.polygon.is_empty() || self.polygon.is_complete()
    }

    pub fn confirm(&self) -> Result<MapSelection, CaptureError> {
        if !self.is_valid_for_submission() {
            return Err(CaptureError::IncompletePolygon {
                points: self.polygon.len(),
            });
        }
        Ok(self.compute_selection())
    }

    pub fn prompt(&self) -> &'static str {
        if self.polygon.is_complete() {
            "Polygon ready"
        } else {
            "Tap the map to draw the terrain boundary (min 3 points)"
        }
    }
}
