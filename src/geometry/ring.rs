use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, Polygon};
use crate::error::GeometryError;

/// Serialize a polygon as a closed GeoJSON ring.
///
/// Each vertex becomes `[longitude, latitude]` and the first vertex is
/// repeated at the end, so an `n`-point polygon yields `n + 1` pairs.
pub fn to_closed_ring(polygon: &Polygon) -> Result<Vec<[f64; 2]>, GeometryError> {
    if !polygon.is_complete() {
        return Err(GeometryError::TooFewPoints(polygon.len()));
    }

    let mut ring: Vec<[f64; 2]> = polygon
        .points()
        .iter()
        .map(|p| p.to_lng_lat())
        .collect();
    ring.push(ring[0]);

    Ok(ring)
}

/// Inverse of [`to_closed_ring`]: drops the closing vertex if present.
pub fn from_ring(ring: &[[f64; 2]]) -> Polygon {
    let open = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    open.iter().copied().map(GeoPoint::from_lng_lat).collect::<Vec<_>>().into()
}

/// GeoJSON `Polygon` geometry with a single outer ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub type_: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeoJsonPolygon {
    pub fn from_polygon(polygon: &Polygon) -> Result<Self, GeometryError> {
        Ok(Self {
            type_: "Polygon".to_string(),
            coordinates: vec![to_closed_ring(polygon)?],
        })
    }

    /// The outer ring as an open polygon.
    pub fn outer(&self) -> Polygon {
        self.coordinates
            .first()
            .map(|ring| from_ring(ring))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_ring_swaps_axes_and_closes() {
        let polygon = Polygon::new(vec![
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(11.0, 21.0),
            GeoPoint::new(12.0, 22.0),
        ]);

        let ring = to_closed_ring(&polygon).unwrap();
        assert_eq!(
            ring,
            vec![[20.0, 10.0], [21.0, 11.0], [22.0, 12.0], [20.0, 10.0]]
        );
    }

    #[test]
    fn test_square_ring_has_five_entries() {
        let polygon = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
        ]);

        let ring = to_closed_ring(&polygon).unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_ring_does_not_close_the_polygon_in_place() {
        let polygon = Polygon::new(vec![
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(2.0, 2.0),
        ]);
        to_closed_ring(&polygon).unwrap();
        assert_eq!(polygon.len(), 3);
    }

    #[test]
    fn test_short_polygon_is_rejected() {
        let polygon = Polygon::new(vec![GeoPoint::new(1.0, 1.0), GeoPoint::new(1.0, 2.0)]);
        assert_eq!(
            to_closed_ring(&polygon),
            Err(GeometryError::TooFewPoints(2))
        );
    }

    #[test]
    fn test_geojson_outer_reopens_ring() {
        let polygon = Polygon::new(vec![
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(11.0, 21.0),
            GeoPoint::new(12.0, 22.0),
        ]);
        let geojson = GeoJsonPolygon::from_polygon(&polygon).unwrap();
        assert_eq!(geojson.type_, "Polygon");
        assert_eq!(geojson.outer(), polygon);
    }
}
