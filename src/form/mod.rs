//! The terrain registration form that owns a map selection.
//!
//! Tracks the field values, validates them, assembles the
//! [`TerrainDraft`], and remembers which backend terrain the current values
//! were saved as so that an estimate can be requested for it.

use std::collections::BTreeMap;
use std::fmt;

use log::info;

use crate::api::ApiClient;
use crate::domain::{Estimate, GeoPoint, MapSelection, Polygon, Terrain, TerrainDraft};
use crate::error::FormError;
use crate::geometry::{GeoJsonPolygon, geodesic_area_hectares};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    LocationName,
    Coordinates,
    Area,
    SoilType,
    RoadDistance,
}

/// Validation messages keyed by field, in form order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in self.0.values() {
            writeln!(f, "  - {}", message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TerrainForm {
    location_name: String,
    area: String,
    soil_type: String,
    irrigation: bool,
    road_distance: String,
    coordinates: Option<GeoPoint>,
    polygon: Polygon,
    registered_id: Option<u64>,
}

impl TerrainForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        self.coordinates
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Id of the backend terrain matching the current values, if saved.
    pub fn registered_id(&self) -> Option<u64> {
        self.registered_id
    }

    // Any edit makes the saved terrain stale.

    pub fn set_location_name(&mut self, value: impl Into<String>) {
        self.location_name = value.into();
        self.registered_id = None;
    }

    pub fn set_area(&mut self, value: impl Into<String>) {
        self.area = value.into();
        self.registered_id = None;
    }

    pub fn set_soil_type(&mut self, value: impl Into<String>) {
        self.soil_type = value.into();
        self.registered_id = None;
    }

    pub fn set_irrigation(&mut self, value: bool) {
        self.irrigation = value;
        self.registered_id = None;
    }

    pub fn set_road_distance(&mut self, value: impl Into<String>) {
        self.road_distance = value.into();
        self.registered_id = None;
    }

    /// Take the center and boundary picked on the map.
    ///
    /// An empty location name is filled with the center's coordinates.
    pub fn apply_selection(&mut self, selection: MapSelection) {
        if self.location_name.is_empty() {
            self.location_name = selection.center.to_string();
        }
        self.coordinates = Some(selection.center);
        self.polygon = selection.polygon;
        self.registered_id = None;
    }

    /// Fill the area field from the drawn boundary when the user left it
    /// empty. Returns the suggested value in hectares.
    pub fn suggest_area(&mut self) -> Option<f64> {
        if !self.area.trim().is_empty() {
            return None;
        }
        let hectares = geodesic_area_hectares(&self.polygon)?;
        self.area = format!("{:.2}", hectares);
        Some(hectares)
    }

    /// Prefill from a terrain that already exists on the backend.
    ///
    /// Its stored boundary is not loaded back, so the local polygon is cleared.
    pub fn load_terrain(&mut self, terrain: &Terrain) {
        self.location_name = terrain.location_name.clone().unwrap_or_default();
        self.area = terrain
            .area_hectares
            .map(|a| a.to_string())
            .unwrap_or_default();
        self.soil_type = terrain.soil_type.clone().unwrap_or_default();
        self.irrigation = terrain.irrigation.unwrap_or(false);
        self.road_distance = terrain
            .road_distance_km
            .map(|d| d.to_string())
            .unwrap_or_default();
        if let Some(center) = terrain.center() {
            self.coordinates = Some(center);
        }
        self.polygon = Polygon::default();
        self.registered_id = Some(terrain.id);
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.checked().map(|_| ())
    }

    /// Validated center, area and road distance.
    fn checked(&self) -> Result<(GeoPoint, f64, f64), FieldErrors> {
        let mut errors = BTreeMap::new();

        if self.location_name.trim().is_empty() {
            errors.insert(Field::LocationName, "Location name is required");
        }
        if self.coordinates.is_none() {
            errors.insert(Field::Coordinates, "Select a location on the map");
        }
        let area = parse_number(&self.area).filter(|a| *a > 0.0);
        if area.is_none() {
            errors.insert(Field::Area, "Enter a valid area in hectares");
        }
        if self.soil_type.trim().is_empty() {
            errors.insert(Field::SoilType, "Soil type is required");
        }
        let road_distance = parse_number(&self.road_distance).filter(|d| *d >= 0.0);
        if road_distance.is_none() {
            errors.insert(Field::RoadDistance, "Enter a valid distance to roads (km)");
        }

        match (self.coordinates, area, road_distance) {
            (Some(center), Some(area), Some(road_distance)) if errors.is_empty() => {
                Ok((center, area, road_distance))
            }
            _ => Err(FieldErrors(errors)),
        }
    }

    /// Build the creation payload. Registration needs a drawn boundary
    /// of at least three points, not just a center.
    pub fn to_draft(&self) -> Result<TerrainDraft, FormError> {
        let (center, area, road_distance) = self.checked().map_err(FormError::Invalid)?;
        if !self.polygon.is_complete() {
            return Err(FormError::PolygonRequired);
        }

        Ok(TerrainDraft {
            location_name: self.location_name.trim().to_string(),
            area_hectares: area,
            soil_type: self.soil_type.trim().to_lowercase(),
            irrigation: self.irrigation,
            road_distance_km: road_distance,
            lat: center.latitude,
            lng: center.longitude,
            polygon: GeoJsonPolygon::from_polygon(&self.polygon)?,
        })
    }

    /// Save the terrain and remember its id.
    pub fn register(&mut self, api: &ApiClient) -> Result<u64, FormError> {
        let draft = self.to_draft()?;
        let id = api.create_terrain(&draft)?;
        info!("registered terrain {} ({})", id, draft.location_name);
        self.registered_id = Some(id);
        Ok(id)
    }

    /// Estimate the saved terrain. Fails with [`FormError::NotRegistered`]
    /// when the current values have not been saved.
    pub fn estimate(&self, api: &ApiClient, model_id: u64) -> Result<Estimate, FormError> {
        let id = self.registered_id.ok_or(FormError::NotRegistered)?;
        Ok(api.estimate(id, model_id)?)
    }

    /// Save first if needed, then estimate.
    pub fn register_and_estimate(
        &mut self,
        api: &ApiClient,
        model_id: u64,
    ) -> Result<Estimate, FormError> {
        if self.registered_id.is_none() {
            self.register(api)?;
        }
        self.estimate(api, model_id)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
