//! Collaborator seams consumed by the wizard core.
//!
//! Everything behind these traits — the draft store, account balances, media
//! uploads, campaign finalization — lives outside this workspace. In-memory
//! and no-op implementations are provided for development and tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::info;
use uuid::Uuid;

use crate::error::StudioResult;
use crate::types::{CampaignDraft, MediaFile};

// ─── Persistence ──────────────────────────────────────────────────────

/// Logical persistence boundary for campaign drafts. Exactly two operations:
/// create-or-update and fetch-by-id.
pub trait DraftStore: Send + Sync {
    /// Persists the snapshot. With `id == None` a new draft record is
    /// created and its id returned; otherwise the existing record is
    /// replaced and the same id echoed back.
    fn upsert(
        &self,
        id: Option<Uuid>,
        draft: &CampaignDraft,
    ) -> impl Future<Output = StudioResult<Uuid>> + Send;

    /// Fetches a previously persisted draft, or `None` when no record with
    /// that id exists.
    fn fetch_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StudioResult<Option<CampaignDraft>>> + Send;
}

// ─── Balances ─────────────────────────────────────────────────────────

/// Supplies the owner's available balance for the finish-time balance gate.
pub trait BalancesProvider: Send + Sync {
    fn available_balance(&self, owner_id: Uuid) -> impl Future<Output = StudioResult<f64>> + Send;
}

/// Development provider that reports the same balance for every owner.
#[derive(Debug, Clone, Copy)]
pub struct StaticBalances {
    pub amount: f64,
}

impl BalancesProvider for StaticBalances {
    async fn available_balance(&self, _owner_id: Uuid) -> StudioResult<f64> {
        Ok(self.amount)
    }
}

// ─── Finalization ─────────────────────────────────────────────────────

/// Commits a fully validated draft as a live campaign and returns its id.
pub trait FinalizeSink: Send + Sync {
    fn finalize(&self, draft: &CampaignDraft) -> impl Future<Output = StudioResult<Uuid>> + Send;
}

/// Development sink that mints a campaign id without any downstream call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFinalizeSink;

impl FinalizeSink for LocalFinalizeSink {
    async fn finalize(&self, draft: &CampaignDraft) -> StudioResult<Uuid> {
        let campaign_id = Uuid::new_v4();
        info!(%campaign_id, title = %draft.basic.title, "Draft finalized locally");
        Ok(campaign_id)
    }
}

// ─── Media upload ─────────────────────────────────────────────────────

/// Uploads a creative asset and returns an opaque URL. Upload failures are
/// local, non-fatal errors for the wizard session.
pub trait MediaUploader: Send + Sync {
    fn upload(&self, file: &MediaFile) -> impl Future<Output = StudioResult<String>> + Send;
}

/// Development uploader that fabricates a CDN-style URL per file.
#[derive(Debug, Clone)]
pub struct LocalMediaUploader {
    pub base_url: String,
}

impl MediaUploader for LocalMediaUploader {
    async fn upload(&self, file: &MediaFile) -> StudioResult<String> {
        Ok(format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            Uuid::new_v4(),
            file.file_name
        ))
    }
}

// ─── Error observation ────────────────────────────────────────────────

/// Sink for non-blocking failures (autosave errors, estimation edge cases).
/// Reporting must never interrupt the user's editing session.
pub trait ErrorObserver: Send + Sync {
    fn report(&self, context: &str, message: &str);
}

/// No-op observer for modules that don't need error observation.
pub struct NoOpObserver;

impl ErrorObserver for NoOpObserver {
    fn report(&self, _context: &str, _message: &str) {}
}

/// In-memory observer that captures reports for testing.
#[derive(Default)]
pub struct CaptureObserver {
    reports: Mutex<Vec<(String, String)>>,
}

impl CaptureObserver {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().expect("observer mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().expect("observer mutex poisoned").len()
    }

    pub fn count_context(&self, context: &str) -> usize {
        self.reports
            .lock()
            .expect("observer mutex poisoned")
            .iter()
            .filter(|(c, _)| c == context)
            .count()
    }
}

impl ErrorObserver for CaptureObserver {
    fn report(&self, context: &str, message: &str) {
        self.reports
            .lock()
            .expect("observer mutex poisoned")
            .push((context.to_string(), message.to_string()));
    }
}

/// Convenience: create a no-op observer for modules that don't need one.
pub fn noop_observer() -> Arc<dyn ErrorObserver> {
    Arc::new(NoOpObserver)
}

/// Convenience: create a capture observer for tests.
pub fn capture_observer() -> Arc<CaptureObserver> {
    Arc::new(CaptureObserver::new())
}
