use serde::Deserialize;

use super::lenient;

/// Aggregated statistics from `GET /dashboard/estadisticas`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub kpis: Kpis,
    #[serde(default)]
    pub precision_mensual: Vec<MonthlyPrecision>,
    #[serde(default)]
    pub zonas_mas_activas: Vec<ZoneCount>,
    #[serde(default)]
    pub terrenos_recientes: Vec<RecentTerrain>,
    #[serde(default)]
    pub distribucion_suelo: Vec<SoilCount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub terrenos_registrados: u64,
    pub usuarios_nuevos: u64,
    pub zonas_cubiertas: u64,
    /// Already formatted by the backend, e.g. `"92%"`.
    #[serde(rename = "precisionIA")]
    pub precision_ia: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyPrecision {
    pub mes: String,
    #[serde(deserialize_with = "lenient::number")]
    pub promedio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneCount {
    pub zona: String,
    pub cantidad: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTerrain {
    pub zona: String,
    #[serde(deserialize_with = "lenient::number")]
    pub area: f64,
    pub suelo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoilCount {
    pub tipo: String,
    pub cantidad: u64,
}

impl DashboardStats {
    /// Share of each soil type in percent, in the order the backend sent them.
    pub fn soil_shares(&self) -> Vec<(&str, f64)> {
        let total: u64 = self.distribucion_suelo.iter().map(|s| s.cantidad).sum();
        if total == 0 {
            return Vec::new();
        }
        self.distribucion_suelo
            .iter()
            .map(|s| (s.tipo.as_str(), s.cantidad as f64 * 100.0 / total as f64))
            .collect()
    }
}
