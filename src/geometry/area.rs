use geo::orient::{Direction, Orient};
use geo::{GeodesicArea, LineString};

use crate::domain::Polygon;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Area enclosed by the drawn boundary on the WGS84 ellipsoid, in hectares.
///
/// Taps may go either way round; the ring is reoriented counter-clockwise
/// first, otherwise a clockwise ring measures the rest of the globe.
/// Returns `None` for an incomplete polygon. Self-intersecting boundaries
/// are not rejected; the result is then only an approximation.
pub fn geodesic_area_hectares(polygon: &Polygon) -> Option<f64> {
    if !polygon.is_complete() {
        return None;
    }

    let exterior: LineString<f64> = polygon
        .points()
        .iter()
        .map(|p| geo::coord! { x: p.longitude, y: p.latitude })
        .collect();
    let shape = geo::Polygon::new(exterior, vec![]).orient(Direction::Default);

    Some(shape.geodesic_area_unsigned() / SQUARE_METERS_PER_HECTARE)
}
