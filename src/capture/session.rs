use log::{debug, warn};

use super::PolygonCapture;
use crate::domain::{GeoPoint, MapSelection};
use crate::error::{CaptureError, LocationError};

/// User actions delivered by a map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Tap(GeoPoint),
    Undo,
    Clear,
    Confirm,
    Dismiss,
}

/// Rendering backend for the capture workflow.
///
/// Whatever draws the map (a terminal, a native map view, a web tile
/// layer) implements this; the workflow never depends on which one.
/// Taps come back from [`next_event`](MapSurface::next_event) as
/// [`SurfaceEvent::Tap`] and are applied by [`CaptureSession::on_map_tap`].
pub trait MapSurface {
    /// Wait for the next user action. `None` means the surface was closed.
    fn next_event(&mut self) -> Option<SurfaceEvent>;

    fn render_markers(&mut self, points: &[GeoPoint]);

    /// Called with every point drawn so far, including fewer than three.
    fn render_polygon(&mut self, points: &[GeoPoint], status: &str);

    fn recenter(&mut self, _center: GeoPoint) {}

    /// Show a blocking validation message; the surface stays open.
    fn reject(&mut self, _error: &CaptureError) {}
}

/// One-shot device location lookup.
pub trait LocationProvider {
    fn current_position(&mut self) -> Result<GeoPoint, LocationError>;
}

/// A location known up front, or none at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocation(pub Option<GeoPoint>);

impl LocationProvider for StaticLocation {
    fn current_position(&mut self) -> Result<GeoPoint, LocationError> {
        self.0
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}

/// A [`PolygonCapture`] bound to a surface for as long as it is visible.
pub struct CaptureSession<S: MapSurface> {
    capture: PolygonCapture,
    surface: S,
    visible: bool,
}

impl<S: MapSurface> CaptureSession<S> {
    pub fn new(capture: PolygonCapture, surface: S) -> Self {
        Self {
            capture,
            surface,
            visible: false,
        }
    }

    pub fn capture(&self) -> &PolygonCapture {
        &self.capture
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Make the surface visible and resolve the device location once.
    pub fn show(&mut self, location: &mut dyn LocationProvider) {
        self.visible = true;
        let position = location.current_position();
        self.apply_location(position);
        self.render();
    }

    /// Move the viewport to a resolved device location.
    ///
    /// Failures keep the current center. Results that arrive after the
    /// surface was dismissed are dropped. Returns whether the viewport moved.
    pub fn apply_location(&mut self, position: Result<GeoPoint, LocationError>) -> bool {
        if !self.visible {
            debug!("ignoring location result for a dismissed map");
            return false;
        }
        match position {
            Ok(center) => {
                self.capture.set_viewport_center(center);
                self.surface.recenter(center);
                true
            }
            Err(e) => {
                warn!(
                    "Error getting location, keeping {}: {}",
                    self.capture.viewport_center(),
                    e
                );
                false
            }
        }
    }

    pub fn on_map_tap(&mut self, point: GeoPoint) {
        self.capture.add_point(point);
        self.render();
    }

    pub fn undo(&mut self) {
        self.capture.undo();
        self.render();
    }

    pub fn clear(&mut self) {
        self.capture.clear();
        self.render();
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Try to finish drawing. Rejections are reported to the surface.
    pub fn confirm(&mut self) -> Result<MapSelection, CaptureError> {
        match self.capture.confirm() {
            Ok(selection) => {
                self.dismiss();
                Ok(selection)
            }
            Err(e) => {
                self.surface.reject(&e);
                Err(e)
            }
        }
    }

    /// Feed surface events into the workflow until the user confirms a
    /// valid drawing (`Some`) or dismisses the map (`None`).
    pub fn run(&mut self) -> Option<MapSelection> {
        while let Some(event) = self.surface.next_event() {
            match event {
                SurfaceEvent::Tap(point) => self.on_map_tap(point),
                SurfaceEvent::Undo => self.undo(),
                SurfaceEvent::Clear => self.clear(),
                SurfaceEvent::Confirm => {
                    if let Ok(selection) = self.confirm() {
                        return Some(selection);
                    }
                }
                SurfaceEvent::Dismiss => break,
            }
        }
        self.dismiss();
        None
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn render(&mut self) {
        let points = self.capture.points();
        self.surface.render_markers(points);
        self.surface.render_polygon(points, self.capture.prompt());
    }
}
