use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `[longitude, latitude]`, the GeoJSON axis order.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {:.4}, Lng: {:.4}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = String;

    /// Parses `"lat,lng"`. Both must be finite, latitude in [-90, 90]
    /// and longitude in [-180, 180].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", s))?;
        let lat = parse_degrees(lat, "latitude", 90.0)?;
        let lng = parse_degrees(lng, "longitude", 180.0)?;
        Ok(Self::new(lat, lng))
    }
}

fn parse_degrees(text: &str, axis: &str, limit: f64) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|e| format!("invalid {} {:?}: {}", axis, text.trim(), e))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!(
            "{} {:?} is outside [-{}, {}]",
            axis,
            text.trim(),
            limit,
            limit
        ));
    }
    Ok(value)
}

/// The boundary of a terrain as drawn, in tap order.
///
/// The ring is kept open: the first point is not repeated at the end.
/// Closing happens only when serializing, see
/// [`to_closed_ring`](crate::geometry::to_closed_ring).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A polygon needs at least three vertices to enclose an area.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= 3
    }

    pub(crate) fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    pub(crate) fn pop(&mut self) -> Option<GeoPoint> {
        self.points.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.points.clear();
    }
}

impl From<Vec<GeoPoint>> for Polygon {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

/// What the capture surface hands back to the terrain form.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSelection {
    pub center: GeoPoint,
    pub polygon: Polygon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let p: GeoPoint = "-0.1807, -78.4678".parse().unwrap();
        assert_eq!(p, GeoPoint::new(-0.1807, -78.4678));
    }

    #[test]
    fn test_parse_point_rejects_garbage() {
        assert!("12.5".parse::<GeoPoint>().is_err());
        assert!("north,12".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn test_parse_point_rejects_non_finite() {
        assert!("nan,inf".parse::<GeoPoint>().is_err());
        assert!("NaN,1".parse::<GeoPoint>().is_err());
        assert!("1,-inf".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn test_parse_point_rejects_out_of_range() {
        assert!("95,40".parse::<GeoPoint>().is_err());
        assert!("45,400".parse::<GeoPoint>().is_err());
        assert!("-90.0001,0".parse::<GeoPoint>().is_err());
        assert_eq!(
            "-90,180".parse::<GeoPoint>(),
            Ok(GeoPoint::new(-90.0, 180.0))
        );
        assert_eq!(
            "90,-180".parse::<GeoPoint>(),
            Ok(GeoPoint::new(90.0, -180.0))
        );
    }

    #[test]
    fn test_lng_lat_order() {
        let p = GeoPoint::new(10.0, 20.0);
        assert_eq!(p.to_lng_lat(), [20.0, 10.0]);
        assert_eq!(GeoPoint::from_lng_lat([20.0, 10.0]), p);
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let p = GeoPoint::new(-0.180712, -78.467833);
        assert_eq!(p.to_string(), "Lat: -0.1807, Lng: -78.4678");
    }

    #[test]
    fn test_polygon_completeness() {
        let mut poly = Polygon::default();
        assert!(!poly.is_complete());
        poly.push(GeoPoint::new(0.0, 0.0));
        poly.push(GeoPoint::new(0.0, 1.0));
        assert!(!poly.is_complete());
        poly.push(GeoPoint::new(1.0, 1.0));
        assert!(poly.is_complete());
    }
}
