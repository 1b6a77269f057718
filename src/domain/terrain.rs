use serde::{Deserialize, Serialize, Serializer};

use super::lenient;
use super::point::GeoPoint;
use crate::geometry::GeoJsonPolygon;

/// Body of `POST /terrain`.
///
/// Field names follow the backend's schema. Built by
/// [`TerrainForm::to_draft`](crate::form::TerrainForm::to_draft) and only
/// borrowed by the API client, so it is never changed after submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainDraft {
    #[serde(rename = "ubicacion_nombre")]
    pub location_name: String,
    #[serde(rename = "area_hectareas")]
    pub area_hectares: f64,
    /// Lowercased before submission.
    #[serde(rename = "tipo_suelo")]
    pub soil_type: String,
    #[serde(rename = "acceso_riego", serialize_with = "flag_as_int")]
    pub irrigation: bool,
    #[serde(rename = "proximidad_vias_km")]
    pub road_distance_km: f64,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "poligono")]
    pub polygon: GeoJsonPolygon,
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// GeoJSON point as stored by PostGIS, `coordinates` is `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonPoint {
    pub coordinates: [f64; 2],
}

/// A terrain owned by the signed-in user, from `GET /terrain/my-list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Terrain {
    pub id: u64,
    #[serde(rename = "ubicacion_nombre", default)]
    pub location_name: Option<String>,
    #[serde(rename = "area_hectareas", default, deserialize_with = "lenient::opt_number")]
    pub area_hectares: Option<f64>,
    #[serde(rename = "tipo_suelo", default)]
    pub soil_type: Option<String>,
    #[serde(rename = "acceso_riego", default, deserialize_with = "lenient::opt_flag")]
    pub irrigation: Option<bool>,
    #[serde(
        rename = "proximidad_vias_km",
        default,
        deserialize_with = "lenient::opt_number"
    )]
    pub road_distance_km: Option<f64>,
    #[serde(rename = "coordenadas", default)]
    pub coordinates: Option<GeoJsonPoint>,
    #[serde(rename = "mis_consultas", alias = "Consultas", default)]
    pub consultations: Option<Vec<Consultation>>,
}

impl Terrain {
    pub fn center(&self) -> Option<GeoPoint> {
        self.coordinates
            .as_ref()
            .map(|c| GeoPoint::from_lng_lat(c.coordinates))
    }

    /// Most recent estimation; the backend lists newest first.
    pub fn latest_consultation(&self) -> Option<&Consultation> {
        self.consultations.as_deref().and_then(<[_]>::first)
    }

    pub fn display_name(&self) -> String {
        match self.location_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Terrain #{}", self.id),
        }
    }
}

/// One past price estimation stored with a terrain.
#[derive(Debug, Clone, Deserialize)]
pub struct Consultation {
    #[serde(
        rename = "valor_estimado_hectarea",
        default,
        deserialize_with = "lenient::opt_number"
    )]
    pub price_per_hectare: Option<f64>,
    #[serde(rename = "fecha", default)]
    pub date: Option<String>,
}

/// Response of `POST /ml/estimate`.
#[derive(Debug, Clone, Deserialize)]
pub struct Estimate {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "terreno_id", default)]
    pub terrain_id: Option<u64>,
    #[serde(rename = "valor_estimado_hectarea", deserialize_with = "lenient::number")]
    pub price_per_hectare: f64,
}

impl Estimate {
    pub fn label(&self) -> String {
        format!("${:.2} / ha", self.price_per_hectare)
    }
}

/// Response of `POST /terrain`; only the id is needed to request an estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTerrain {
    pub id: u64,
}
