//! One validation schema per wizard step.
//!
//! Schemas are pure and stateless: identical step data always yields the
//! same result, and nothing here depends on wizard position. The only
//! cross-step input (the budget used for KPI plausibility in the objectives
//! step) is passed in explicitly.

use serde::{Deserialize, Serialize};
use url::Url;

use studio_core::config::WizardConfig;
use studio_core::types::{
    AudienceSpec, BasicInfo, CampaignDraft, CreativeAssets, LocationSpec, NicheSpec,
    ObjectiveSpec, MIN_TITLE_LEN,
};

/// The wizard's discrete steps, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    BasicInfo,
    Location,
    Audience,
    Niche,
    Objectives,
    Creative,
}

/// Step order. Index `STEP_ORDER.len()` is the review/finish position.
pub const STEP_ORDER: [StepId; 6] = [
    StepId::BasicInfo,
    StepId::Location,
    StepId::Audience,
    StepId::Niche,
    StepId::Objectives,
    StepId::Creative,
];

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one step: valid iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepValidation {
    pub step: StepId,
    pub errors: Vec<FieldError>,
}

impl StepValidation {
    fn ok(step: StepId) -> Self {
        Self {
            step,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates one step of the draft.
pub fn validate_step(step: StepId, draft: &CampaignDraft, cfg: &WizardConfig) -> StepValidation {
    match step {
        StepId::BasicInfo => validate_basic_info(&draft.basic),
        StepId::Location => validate_location(draft.location.as_ref()),
        StepId::Audience => validate_audience(&draft.audience),
        StepId::Niche => validate_niche(&draft.niche),
        // The budget dependency is explicit: objectives are judged against
        // the figure entered in the basic-info step.
        StepId::Objectives => validate_objectives(&draft.objectives, draft.basic.budget, cfg),
        StepId::Creative => validate_creative(&draft.creative),
    }
}

pub fn validate_basic_info(basic: &BasicInfo) -> StepValidation {
    let mut v = StepValidation::ok(StepId::BasicInfo);

    if basic.title.trim().chars().count() < MIN_TITLE_LEN {
        v.push("title", format!("title must be at least {MIN_TITLE_LEN} characters"));
    }

    match basic.budget {
        None => v.push("budget", "budget is required"),
        Some(b) if b <= 0.0 => v.push("budget", "budget must be positive"),
        _ => {}
    }

    match (basic.start_date, basic.end_date) {
        (None, _) => v.push("start_date", "start date is required"),
        (_, None) => v.push("end_date", "end date is required"),
        (Some(start), Some(end)) if start > end => {
            v.push("end_date", "end date must not precede start date");
        }
        _ => {}
    }

    if let Some(window) = basic.display_window {
        if window.start_hour > 23 || window.end_hour > 23 {
            v.push("display_window", "display hours must be within 0-23");
        } else if window.start_hour >= window.end_hour {
            v.push("display_window", "display window must start before it ends");
        }
    }

    v
}

pub fn validate_location(location: Option<&LocationSpec>) -> StepValidation {
    let mut v = StepValidation::ok(StepId::Location);

    let Some(spec) = location else {
        v.push("location", "a coverage area is required");
        return v;
    };

    match spec {
        LocationSpec::Radius { center, radius_km } => {
            if *radius_km <= 0.0 {
                v.push("radius_km", "radius must be positive");
            }
            if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lon) {
                v.push("center", "center coordinates out of range");
            }
        }
        LocationSpec::Polygon { vertices } => {
            if vertices.len() < 3 {
                v.push("vertices", "a polygon needs at least 3 vertices");
            }
            if vertices
                .iter()
                .any(|p| !(-90.0..=90.0).contains(&p.lat) || !(-180.0..=180.0).contains(&p.lon))
            {
                v.push("vertices", "polygon coordinates out of range");
            }
        }
        LocationSpec::Cities { cities } => {
            if cities.is_empty() {
                v.push("cities", "select at least one city");
            } else if cities.iter().any(|c| c.trim().is_empty()) {
                v.push("cities", "city names must not be blank");
            }
        }
        LocationSpec::States { states } => {
            if states.is_empty() {
                v.push("states", "select at least one state");
            } else if states.iter().any(|s| s.trim().is_empty()) {
                v.push("states", "state names must not be blank");
            }
        }
    }

    v
}

pub fn validate_audience(audience: &AudienceSpec) -> StepValidation {
    let mut v = StepValidation::ok(StepId::Audience);

    if let Some(min) = audience.age_min {
        if min > 120 {
            v.push("age_min", "minimum age out of range");
        }
    }
    if let Some(max) = audience.age_max {
        if max > 120 {
            v.push("age_max", "maximum age out of range");
        }
    }
    if let (Some(min), Some(max)) = (audience.age_min, audience.age_max) {
        if min > max {
            v.push("age_min", "minimum age must not exceed maximum age");
        }
    }

    v
}

pub fn validate_niche(niche: &NicheSpec) -> StepValidation {
    let mut v = StepValidation::ok(StepId::Niche);
    if niche.categories.is_empty() {
        v.push("categories", "select at least one category");
    }
    v
}

/// Objectives are validated against the budget entered earlier; the figure
/// is an explicit argument, never read from shared state.
pub fn validate_objectives(
    objectives: &ObjectiveSpec,
    budget: Option<f64>,
    cfg: &WizardConfig,
) -> StepValidation {
    let mut v = StepValidation::ok(StepId::Objectives);

    if objectives
        .objective
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
    {
        v.push("objective", "an objective is required");
    }

    if let (Some(budget), Some(target)) = (budget, objectives.target_impressions) {
        if target > 0 {
            let implied_cpm = budget / target as f64 * 1000.0;
            if implied_cpm < cfg.kpi_cpm_floor {
                v.push(
                    "target_impressions",
                    "impression target is implausible for this budget",
                );
            }
        }
    }

    v
}

pub fn validate_creative(creative: &CreativeAssets) -> StepValidation {
    let mut v = StepValidation::ok(StepId::Creative);

    for (i, raw) in creative.media_urls.iter().enumerate() {
        if !is_http_url(raw) {
            v.push(&format!("media_urls[{i}]"), "not a valid http(s) URL");
        }
    }

    match creative.destination_url.as_deref() {
        None => v.push("destination_url", "a destination link is required"),
        Some(raw) if !is_http_url(raw) => {
            v.push("destination_url", "not a valid http(s) URL");
        }
        _ => {}
    }

    v
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use studio_core::types::{DisplayWindow, GeoPoint};

    #[test]
    fn test_basic_info_requires_title_budget_and_dates() {
        let v = validate_basic_info(&BasicInfo::default());
        assert!(!v.is_valid());
        let fields: Vec<&str> = v.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"budget"));
        assert!(fields.contains(&"start_date"));

        let now = Utc::now();
        let good = BasicInfo {
            title: "Campaign X".to_string(),
            description: None,
            budget: Some(500.0),
            start_date: Some(now),
            end_date: Some(now + Duration::days(14)),
            display_window: Some(DisplayWindow { start_hour: 8, end_hour: 22 }),
        };
        assert!(validate_basic_info(&good).is_valid());
    }

    #[test]
    fn test_basic_info_rejects_inverted_dates_and_window() {
        let now = Utc::now();
        let basic = BasicInfo {
            title: "Campaign X".to_string(),
            description: None,
            budget: Some(500.0),
            start_date: Some(now),
            end_date: Some(now - Duration::days(1)),
            display_window: Some(DisplayWindow { start_hour: 22, end_hour: 8 }),
        };
        let v = validate_basic_info(&basic);
        assert_eq!(v.errors.len(), 2);
    }

    #[test]
    fn test_location_variants() {
        assert!(!validate_location(None).is_valid());

        let radius = LocationSpec::Radius {
            center: GeoPoint { lat: -8.05, lon: -34.9 },
            radius_km: 2.0,
        };
        assert!(validate_location(Some(&radius)).is_valid());

        let flat = LocationSpec::Radius {
            center: GeoPoint { lat: -8.05, lon: -34.9 },
            radius_km: 0.0,
        };
        assert!(!validate_location(Some(&flat)).is_valid());

        let degenerate = LocationSpec::Polygon {
            vertices: vec![
                GeoPoint { lat: 0.0, lon: 0.0 },
                GeoPoint { lat: 1.0, lon: 1.0 },
            ],
        };
        assert!(!validate_location(Some(&degenerate)).is_valid());

        let empty_cities = LocationSpec::Cities { cities: vec![] };
        assert!(!validate_location(Some(&empty_cities)).is_valid());

        let states = LocationSpec::States { states: vec!["PE".to_string()] };
        assert!(validate_location(Some(&states)).is_valid());
    }

    #[test]
    fn test_audience_cross_field_age_bounds() {
        let empty = AudienceSpec::default();
        assert!(validate_audience(&empty).is_valid());

        let inverted = AudienceSpec {
            age_min: Some(70),
            age_max: Some(30),
            ..AudienceSpec::default()
        };
        let v = validate_audience(&inverted);
        assert!(!v.is_valid());
        assert_eq!(v.errors[0].field, "age_min");

        let out_of_range = AudienceSpec {
            age_min: Some(130),
            age_max: None,
            ..AudienceSpec::default()
        };
        assert!(!validate_audience(&out_of_range).is_valid());
    }

    #[test]
    fn test_objectives_kpi_plausibility_uses_explicit_budget() {
        let cfg = WizardConfig::default();
        let objectives = ObjectiveSpec {
            objective: Some("awareness".to_string()),
            // 10 of budget for 1M impressions implies a 0.01 CPM.
            target_impressions: Some(1_000_000),
            target_clicks: None,
            strategy: None,
        };
        assert!(!validate_objectives(&objectives, Some(10.0), &cfg).is_valid());
        assert!(validate_objectives(&objectives, Some(5_000.0), &cfg).is_valid());
        // Without a budget there is nothing to judge against.
        assert!(validate_objectives(&objectives, None, &cfg).is_valid());
    }

    #[test]
    fn test_creative_urls() {
        let missing = CreativeAssets::default();
        assert!(!validate_creative(&missing).is_valid());

        let good = CreativeAssets {
            media_urls: vec!["https://cdn.example.com/banner.png".to_string()],
            destination_url: Some("https://example.com/landing".to_string()),
        };
        assert!(validate_creative(&good).is_valid());

        let bad = CreativeAssets {
            media_urls: vec!["ftp://example.com/banner.png".to_string()],
            destination_url: Some("not-a-url".to_string()),
        };
        let v = validate_creative(&bad);
        assert_eq!(v.errors.len(), 2);
    }

    #[test]
    fn test_schema_is_deterministic() {
        let audience = AudienceSpec {
            age_min: Some(70),
            age_max: Some(30),
            ..AudienceSpec::default()
        };
        assert_eq!(validate_audience(&audience), validate_audience(&audience));
    }
}
