use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum title length for a draft to be persistable at all.
pub const MIN_TITLE_LEN: usize = 3;

/// Lifecycle status of a campaign configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Draft,
    Finalized,
}

/// A partially-filled campaign configuration, owned by a single wizard
/// session until it is finalized into a live campaign.
///
/// The `id` is absent until the first successful persist; every other field
/// besides a ≥3-character title may stay empty until finish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub id: Option<Uuid>,
    pub owner_id: Uuid,
    pub status: DraftStatus,
    pub basic: BasicInfo,
    pub location: Option<LocationSpec>,
    pub audience: AudienceSpec,
    pub niche: NicheSpec,
    pub objectives: ObjectiveSpec,
    pub creative: CreativeAssets,
}

impl CampaignDraft {
    /// Creates a fresh, unpersisted draft for the given owner.
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: None,
            owner_id,
            status: DraftStatus::Draft,
            basic: BasicInfo {
                title: title.into(),
                ..BasicInfo::default()
            },
            location: None,
            audience: AudienceSpec::default(),
            niche: NicheSpec::default(),
            objectives: ObjectiveSpec::default(),
            creative: CreativeAssets::default(),
        }
    }

    /// The minimal draft-persistence precondition: a trimmed title of at
    /// least [`MIN_TITLE_LEN`] characters. Nothing else is required to save.
    pub fn persistable(&self) -> bool {
        self.basic.title.trim().chars().count() >= MIN_TITLE_LEN
    }
}

/// Basic campaign info: title, description, budget and schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub title: String,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_window: Option<DisplayWindow>,
}

/// Daily time window (hours, 0-23) during which ads are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Geographic coverage specification. Exactly one variant is populated at a
/// time; stale values from other variants cannot exist by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationSpec {
    Radius { center: GeoPoint, radius_km: f64 },
    Polygon { vertices: Vec<GeoPoint> },
    Cities { cities: Vec<String> },
    States { states: Vec<String> },
}

/// Audience segmentation for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudienceSpec {
    pub age_min: Option<u8>,
    pub age_max: Option<u8>,
    pub genders: Vec<String>,
    pub interests: Vec<String>,
}

/// Niche/category selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NicheSpec {
    pub categories: Vec<String>,
}

/// Campaign objective, KPI targets and delivery strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub objective: Option<String>,
    pub target_impressions: Option<u64>,
    pub target_clicks: Option<u64>,
    pub strategy: Option<String>,
}

/// Creative assets: uploaded media URLs and the click destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreativeAssets {
    pub media_urls: Vec<String>,
    pub destination_url: Option<String>,
}

/// A file handed to the media-upload collaborator.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Derived coverage/budget estimate. Never persisted with the draft;
/// recomputed from the location spec (plus budget) on every relevant change.
/// `None` fields mean "no estimate available".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageEstimate {
    pub area_km2: Option<f64>,
    pub estimated_reach: Option<u64>,
    pub estimated_impressions: Option<u64>,
    pub estimated_cpm: Option<f64>,
}

impl CoverageEstimate {
    /// The "no estimate available" sentinel, used for qualitative coverage
    /// (city/state lists) and degenerate inputs.
    pub fn none() -> Self {
        Self {
            area_km2: None,
            estimated_reach: None,
            estimated_impressions: None,
            estimated_cpm: None,
        }
    }
}

/// Derived balance decision, computed only at finish time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub available_balance: f64,
    pub requested_budget: f64,
    pub sufficient: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_unpersisted() {
        let draft = CampaignDraft::new(Uuid::new_v4(), "Spring Launch");
        assert!(draft.id.is_none());
        assert_eq!(draft.status, DraftStatus::Draft);
        assert!(draft.persistable());
    }

    #[test]
    fn test_persistable_requires_three_chars() {
        let mut draft = CampaignDraft::new(Uuid::new_v4(), "Ab");
        assert!(!draft.persistable());
        draft.basic.title = "  Ab  ".to_string();
        assert!(!draft.persistable());
        draft.basic.title = "Abc".to_string();
        assert!(draft.persistable());
    }

    #[test]
    fn test_location_spec_tagged_serialization() {
        let spec = LocationSpec::Radius {
            center: GeoPoint { lat: 10.0, lon: -20.0 },
            radius_km: 2.5,
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"type\":\"radius\""));

        let back: LocationSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);

        let cities: LocationSpec =
            serde_json::from_str(r#"{"type":"cities","cities":["Lisbon"]}"#).unwrap();
        assert_eq!(
            cities,
            LocationSpec::Cities { cities: vec!["Lisbon".to_string()] }
        );
    }
}
