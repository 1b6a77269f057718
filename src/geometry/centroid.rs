use geo::{Centroid, MultiPoint, Point};

use crate::domain::GeoPoint;

/// Arithmetic mean of the points' latitudes and longitudes.
///
/// This is the centroid of the vertex set, not the area centroid of the
/// enclosed surface. Returns `None` for an empty slice.
pub fn mean_center(points: &[GeoPoint]) -> Option<GeoPoint> {
    let vertices: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect();

    vertices.centroid().map(|c| GeoPoint::new(c.y(), c.x()))
}
