pub mod area;
pub mod centroid;
pub mod ring;

pub use area::geodesic_area_hectares;
pub use centroid::mean_center;
pub use ring::{GeoJsonPolygon, from_ring, to_closed_ring};
