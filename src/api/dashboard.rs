use super::ApiClient;
use crate::domain::DashboardStats;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /dashboard/estadisticas`.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/dashboard/estadisticas")
    }
}
