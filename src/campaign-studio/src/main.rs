//! Campaign Studio — campaign configuration wizard with resumable drafts
//! and coverage/budget estimation.
//!
//! Runs a scripted wizard session against the in-memory draft store: builds
//! a draft from the CLI arguments, autosaves it, estimates coverage, and
//! attempts the finish transition.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use uuid::Uuid;

use studio_autosave::{AutosaveController, InMemoryDraftStore};
use studio_core::collab::{noop_observer, LocalFinalizeSink, StaticBalances};
use studio_core::config::AppConfig;
use studio_core::types::{CampaignDraft, GeoPoint, LocationSpec};
use studio_estimation::coverage;
use studio_wizard::{resume, FinishOutcome, NavigationMode, WizardController};

#[derive(Parser, Debug)]
#[command(name = "campaign-studio")]
#[command(about = "Campaign configuration wizard with resumable drafts")]
#[command(version)]
struct Cli {
    /// Campaign title (min 3 characters to be savable)
    #[arg(long, env = "CAMPAIGN_STUDIO__TITLE", default_value = "Demo Campaign")]
    title: String,

    /// Campaign budget
    #[arg(long, env = "CAMPAIGN_STUDIO__BUDGET", default_value_t = 1000.0)]
    budget: f64,

    /// Available account balance fed to the balance gate
    #[arg(long, env = "CAMPAIGN_STUDIO__BALANCE", default_value_t = 5000.0)]
    balance: f64,

    /// Coverage center latitude
    #[arg(long, default_value_t = -8.05)]
    lat: f64,

    /// Coverage center longitude
    #[arg(long, default_value_t = -34.9)]
    lon: f64,

    /// Coverage radius in kilometres
    #[arg(long, default_value_t = 2.0)]
    radius_km: f64,

    /// Allow free navigation between steps instead of linear gating
    #[arg(long, default_value_t = false)]
    free_navigation: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_studio=info,studio_wizard=info,studio_autosave=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        debounce_ms = config.autosave.debounce_ms,
        density = config.estimator.density_per_km2,
        "Campaign Studio starting up"
    );

    let store = Arc::new(InMemoryDraftStore::new());
    let autosave = AutosaveController::spawn(store.clone(), noop_observer(), &config.autosave);

    let mode = if cli.free_navigation {
        NavigationMode::Free
    } else {
        NavigationMode::Linear
    };

    let owner_id = Uuid::new_v4();
    let mut wizard = WizardController::new(
        CampaignDraft::new(owner_id, cli.title.clone()),
        mode,
        config.wizard.clone(),
    );

    // Fill the steps the way a user session would, autosaving each edit.
    let now = chrono::Utc::now();
    let snapshot = wizard.edit(|draft| {
        draft.basic.budget = Some(cli.budget);
        draft.basic.start_date = Some(now);
        draft.basic.end_date = Some(now + chrono::Duration::days(30));
        draft.location = Some(LocationSpec::Radius {
            center: GeoPoint { lat: cli.lat, lon: cli.lon },
            radius_km: cli.radius_km,
        });
        draft.audience.age_min = Some(18);
        draft.audience.age_max = Some(65);
        draft.niche.categories = vec!["general".to_string()];
        draft.objectives.objective = Some("awareness".to_string());
        draft.creative.destination_url = Some("https://example.com".to_string());
    })?;
    autosave.note_change(snapshot);

    // Derived coverage estimate for display.
    if let Some(location) = wizard.draft().location.as_ref() {
        let estimate = coverage::estimate(location, Some(cli.budget), &config.estimator);
        info!(
            area_km2 = ?estimate.area_km2,
            reach = ?estimate.estimated_reach,
            impressions = ?estimate.estimated_impressions,
            cpm = ?estimate.estimated_cpm,
            "Coverage estimate"
        );
    }

    let draft_id = wizard.save_draft(&autosave).await?;
    info!(%draft_id, "Draft saved");

    // Show where a reload of this draft would resume.
    let (_, resume_at) =
        resume::load_and_resolve(store.as_ref(), draft_id, &config.wizard).await?;
    info!(resume_at, "Resume-step inference for the stored draft");

    let balances = StaticBalances { amount: cli.balance };
    match wizard.finish(&balances, &LocalFinalizeSink).await? {
        FinishOutcome::Finalized { campaign_id } => {
            info!(%campaign_id, "Campaign is live");
        }
        FinishOutcome::StepInvalid { step_index, validation } => {
            warn!(
                step_index,
                step = ?validation.step,
                errors = validation.errors.len(),
                "Finish blocked: step is invalid"
            );
            for error in &validation.errors {
                warn!(field = %error.field, "  {}", error.message);
            }
        }
        FinishOutcome::InsufficientBalance { check } => {
            warn!(
                requested = check.requested_budget,
                available = check.available_balance,
                "Finish blocked: insufficient balance; the draft remains saved"
            );
        }
        FinishOutcome::FinalizeFailed { message } => {
            warn!(%message, "Finalize failed; the session may retry");
        }
    }

    autosave.shutdown().await;
    Ok(())
}
