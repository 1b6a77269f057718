pub(crate) mod lenient;

pub mod dashboard;
pub mod point;
pub mod terrain;
pub mod user;

pub use dashboard::DashboardStats;
pub use point::{GeoPoint, MapSelection, Polygon};
pub use terrain::{Consultation, CreatedTerrain, Estimate, GeoJsonPoint, Terrain, TerrainDraft};
pub use user::{Role, SignedInUser, User};
