use serde::Serialize;

use super::ApiClient;
use crate::domain::Estimate;
use crate::error::ApiError;

/// Model the backend uses unless told otherwise.
pub const DEFAULT_MODEL_ID: u64 = 32;

#[derive(Debug, Serialize)]
pub struct EstimateRequest {
    pub terreno_id: u64,
    pub modelo_id: u64,
}

impl ApiClient {
    /// `POST /ml/estimate` for a terrain that is already registered.
    pub fn estimate(&self, terrain_id: u64, model_id: u64) -> Result<Estimate, ApiError> {
        self.post(
            "/ml/estimate",
            &EstimateRequest {
                terreno_id: terrain_id,
                modelo_id: model_id,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_body() {
        let body = EstimateRequest {
            terreno_id: 17,
            modelo_id: DEFAULT_MODEL_ID,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"terreno_id":17,"modelo_id":32}"#
        );
    }
}
