use serde::Deserialize;

use crate::error::{StudioError, StudioResult};

/// Root application configuration. Loaded from environment variables with
/// the prefix `CAMPAIGN_STUDIO__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

/// Coverage-estimation parameters. The defaults mirror the planning model's
/// assumptions; none of them is a calibrated real-world truth, which is why
/// they are configuration rather than constants.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    /// Average population density assumed inside the covered area, people/km².
    #[serde(default = "default_density_per_km2")]
    pub density_per_km2: f64,
    /// Ad impressions assumed per reached person.
    #[serde(default = "default_impressions_per_person")]
    pub impressions_per_person: f64,
    /// Planar degrees-to-kilometres conversion factor.
    #[serde(default = "default_km_per_degree")]
    pub km_per_degree: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveConfig {
    /// Quiescence window before a changed draft is persisted.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    /// Lowest implied CPM (budget / target impressions × 1000) accepted as a
    /// plausible KPI target.
    #[serde(default = "default_kpi_cpm_floor")]
    pub kpi_cpm_floor: f64,
}

fn default_density_per_km2() -> f64 {
    5000.0
}
fn default_impressions_per_person() -> f64 {
    3.0
}
fn default_km_per_degree() -> f64 {
    111.0
}
fn default_debounce_ms() -> u64 {
    2000
}
fn default_kpi_cpm_floor() -> f64 {
    0.5
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            density_per_km2: default_density_per_km2(),
            impressions_per_person: default_impressions_per_person(),
            km_per_degree: default_km_per_degree(),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            kpi_cpm_floor: default_kpi_cpm_floor(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> StudioResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_STUDIO")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder
            .build()
            .map_err(|e| StudioError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| StudioError::Config(e.to_string()))
    }
}
