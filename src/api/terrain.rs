use super::ApiClient;
use crate::domain::{CreatedTerrain, Terrain, TerrainDraft};
use crate::error::ApiError;

impl ApiClient {
    /// `POST /terrain`, returning the new terrain's id.
    pub fn create_terrain(&self, draft: &TerrainDraft) -> Result<u64, ApiError> {
        let created: CreatedTerrain = self.post("/terrain", draft)?;
        Ok(created.id)
    }

    /// `GET /terrain/my-list`: terrains owned by the signed-in user.
    pub fn my_terrains(&self) -> Result<Vec<Terrain>, ApiError> {
        if !self.has_token() {
            return Err(ApiError::Unauthenticated);
        }
        self.get("/terrain/my-list")
    }
}
