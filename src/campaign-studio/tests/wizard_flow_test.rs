//! End-to-end wizard scenarios over the in-memory draft store: autosave
//! preconditions, the finish-time balance gate, coverage figures, and
//! resume-step inference after reload.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use studio_autosave::{AutosaveController, InMemoryDraftStore};
use studio_core::collab::{noop_observer, DraftStore, LocalFinalizeSink, StaticBalances};
use studio_core::config::{AppConfig, AutosaveConfig};
use studio_core::types::{CampaignDraft, DraftStatus, GeoPoint, LocationSpec};
use studio_estimation::coverage;
use studio_wizard::{
    resume, FinishOutcome, NavigationMode, StepId, WizardController, STEP_ORDER,
};

fn complete_draft(title: &str, budget: f64) -> CampaignDraft {
    let now = Utc::now();
    let mut draft = CampaignDraft::new(Uuid::new_v4(), title);
    draft.basic.budget = Some(budget);
    draft.basic.start_date = Some(now);
    draft.basic.end_date = Some(now + Duration::days(30));
    draft.location = Some(LocationSpec::Radius {
        center: GeoPoint { lat: -8.05, lon: -34.9 },
        radius_km: 2.0,
    });
    draft.audience.age_min = Some(18);
    draft.audience.age_max = Some(65);
    draft.niche.categories = vec!["retail".to_string()];
    draft.objectives.objective = Some("awareness".to_string());
    draft.creative.media_urls = vec!["https://cdn.example.com/ad.png".to_string()];
    draft.creative.destination_url = Some("https://example.com/landing".to_string());
    draft
}

/// Scenario A: a 2-character title never produces a draft, even after the
/// debounce window has long elapsed.
#[tokio::test(start_paused = true)]
async fn two_char_title_never_creates_a_draft() {
    let store = Arc::new(InMemoryDraftStore::new());
    let autosave = AutosaveController::spawn(
        store.clone(),
        noop_observer(),
        &AutosaveConfig::default(),
    );

    let mut wizard = WizardController::new(
        CampaignDraft::new(Uuid::new_v4(), "Ab"),
        NavigationMode::Linear,
        AppConfig::default().wizard,
    );
    let snapshot = wizard.edit(|draft| draft.basic.budget = Some(100.0)).unwrap();
    autosave.note_change(snapshot);

    tokio::time::sleep(std::time::Duration::from_secs(10)).await;
    assert!(store.is_empty());

    autosave.shutdown().await;
    assert!(store.is_empty());
}

/// Scenario B: budget 500 against a 300 balance blocks finish, but saving
/// the same state as a draft succeeds with a real id.
#[tokio::test]
async fn insufficient_balance_blocks_finish_but_not_saving() {
    let store = Arc::new(InMemoryDraftStore::new());
    let autosave = AutosaveController::spawn(
        store.clone(),
        noop_observer(),
        &AutosaveConfig::default(),
    );

    let mut wizard = WizardController::new(
        complete_draft("Campaign X", 500.0),
        NavigationMode::Linear,
        AppConfig::default().wizard,
    );

    let outcome = wizard
        .finish(&StaticBalances { amount: 300.0 }, &LocalFinalizeSink)
        .await
        .unwrap();
    match outcome {
        FinishOutcome::InsufficientBalance { check } => {
            assert_eq!(check.requested_budget, 500.0);
            assert_eq!(check.available_balance, 300.0);
            assert!(!check.sufficient);
        }
        other => panic!("expected balance block, got {other:?}"),
    }
    assert_eq!(wizard.draft().status, DraftStatus::Draft);

    let id = wizard.save_draft(&autosave).await.unwrap();
    assert_eq!(store.fetch_by_id(id).await.unwrap().unwrap().id, Some(id));

    autosave.shutdown().await;
}

/// Scenario C: 2 km radius with a 1000 budget yields the documented figures.
#[test]
fn radius_two_km_coverage_figures() {
    let spec = LocationSpec::Radius {
        center: GeoPoint { lat: -8.05, lon: -34.9 },
        radius_km: 2.0,
    };
    let estimate = coverage::estimate(&spec, Some(1000.0), &AppConfig::default().estimator);

    assert!((estimate.area_km2.unwrap() - 12.566).abs() < 0.001);
    assert_eq!(estimate.estimated_reach, Some(62_832));
    assert_eq!(estimate.estimated_impressions, Some(188_496));
    assert!((estimate.estimated_cpm.unwrap() - 5.31).abs() < 0.01);
}

/// Scenario D: a stored draft whose audience step is invalid cross-field
/// resumes at the audience step index, regardless of where the user was.
#[tokio::test]
async fn reloaded_draft_resumes_at_first_invalid_step() {
    let store = InMemoryDraftStore::new();

    let mut draft = complete_draft("Template Campaign", 800.0);
    draft.audience.age_min = Some(70);
    draft.audience.age_max = Some(30);
    let id = store.upsert(None, &draft).await.unwrap();

    let cfg = AppConfig::default().wizard;
    let (loaded, index) = resume::load_and_resolve(&store, id, &cfg).await.unwrap();
    assert_eq!(index, 2);
    assert_eq!(STEP_ORDER[index], StepId::Audience);

    let wizard = WizardController::resume(loaded, NavigationMode::Free, cfg);
    assert_eq!(wizard.current_step(), Some(StepId::Audience));
}

/// An all-valid stored draft resumes at the review position.
#[tokio::test]
async fn all_valid_draft_resumes_at_review() {
    let store = InMemoryDraftStore::new();
    let id = store
        .upsert(None, &complete_draft("Template Campaign", 800.0))
        .await
        .unwrap();

    let cfg = AppConfig::default().wizard;
    let (_, index) = resume::load_and_resolve(&store, id, &cfg).await.unwrap();
    assert_eq!(index, STEP_ORDER.len());
}

/// Full happy path: edits autosave under debounce, every step validates,
/// the balance gate passes, and the draft finalizes into a campaign.
#[tokio::test(start_paused = true)]
async fn complete_session_finalizes() {
    let store = Arc::new(InMemoryDraftStore::new());
    let autosave = AutosaveController::spawn(
        store.clone(),
        noop_observer(),
        &AutosaveConfig::default(),
    );

    let mut wizard = WizardController::new(
        complete_draft("Launch Week", 1_000.0),
        NavigationMode::Linear,
        AppConfig::default().wizard,
    );

    // A couple of edits land as one autosave tick.
    let snapshot = wizard
        .edit(|d| d.basic.description = Some("Spring launch".to_string()))
        .unwrap();
    autosave.note_change(snapshot);
    let snapshot = wizard
        .edit(|d| d.audience.interests = vec!["sports".to_string()])
        .unwrap();
    autosave.note_change(snapshot);
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(store.len(), 1);

    let outcome = wizard
        .finish(&StaticBalances { amount: 5_000.0 }, &LocalFinalizeSink)
        .await
        .unwrap();
    assert!(matches!(outcome, FinishOutcome::Finalized { .. }));
    assert_eq!(wizard.draft().status, DraftStatus::Finalized);

    // Finalize is one-way; a repeat attempt cannot mint a second campaign.
    assert!(wizard
        .finish(&StaticBalances { amount: 5_000.0 }, &LocalFinalizeSink)
        .await
        .is_err());

    autosave.shutdown().await;
}
