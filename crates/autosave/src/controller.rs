//! Debounced autosave controller.
//!
//! Watches the combined wizard snapshot and persists it after a quiescence
//! window. The whole lifecycle runs on a single spawned task that owns the
//! debounce timer, so the two hard invariants hold by construction: at most
//! one upsert is ever in flight, and upserts are totally ordered by
//! debounce tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use studio_core::collab::{DraftStore, ErrorObserver};
use studio_core::config::AutosaveConfig;
use studio_core::error::{StudioError, StudioResult};
use studio_core::types::CampaignDraft;

/// Observable save state, exposed for presentation purposes only.
#[derive(Debug, Clone, Default)]
pub struct SaveStatus {
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Id assigned by the first successful persist; reused for every
    /// subsequent save of this session.
    pub draft_id: Option<Uuid>,
}

enum Command {
    Changed(CampaignDraft),
    Flush(oneshot::Sender<StudioResult<Option<Uuid>>>),
}

/// Handle to the autosave task. Dropping the handle (or calling
/// [`shutdown`](AutosaveController::shutdown)) never cancels an in-flight
/// save; a pending, not-yet-fired timer is replaced by an immediate final
/// save instead.
pub struct AutosaveController {
    tx: mpsc::UnboundedSender<Command>,
    status: Arc<RwLock<SaveStatus>>,
    task: JoinHandle<()>,
}

impl AutosaveController {
    /// Spawns the autosave task over the given store.
    pub fn spawn<S>(store: Arc<S>, observer: Arc<dyn ErrorObserver>, cfg: &AutosaveConfig) -> Self
    where
        S: DraftStore + 'static,
    {
        let status = Arc::new(RwLock::new(SaveStatus::default()));
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = Worker {
            store,
            observer,
            status: status.clone(),
            current_id: None,
            debounce: Duration::from_millis(cfg.debounce_ms),
        };
        let task = tokio::spawn(worker.run(rx));

        Self { tx, status, task }
    }

    /// Records a changed snapshot and (re)starts the debounce window.
    pub fn note_change(&self, snapshot: CampaignDraft) {
        if self.tx.send(Command::Changed(snapshot)).is_err() {
            warn!("Autosave task is gone; change dropped");
        }
    }

    /// Persists any pending snapshot immediately, bypassing the debounce
    /// window. Returns the draft id, or `None` when nothing was ever
    /// eligible for persistence.
    pub async fn flush(&self) -> StudioResult<Option<Uuid>> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(ack))
            .map_err(|_| StudioError::Persistence("autosave task stopped".to_string()))?;
        rx.await
            .map_err(|_| StudioError::Persistence("autosave task stopped".to_string()))?
    }

    /// Snapshot of the observable save status.
    pub fn status(&self) -> SaveStatus {
        self.status.read().clone()
    }

    /// Draft id assigned by the first successful save, if any yet.
    pub fn draft_id(&self) -> Option<Uuid> {
        self.status.read().draft_id
    }

    /// Stops the task after a final save of any pending eligible snapshot.
    pub async fn shutdown(self) {
        let Self { tx, task, .. } = self;
        drop(tx);
        let _ = task.await;
    }
}

struct Worker<S> {
    store: Arc<S>,
    observer: Arc<dyn ErrorObserver>,
    status: Arc<RwLock<SaveStatus>>,
    current_id: Option<Uuid>,
    debounce: Duration,
}

impl<S: DraftStore> Worker<S> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut pending: Option<CampaignDraft> = None;
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(Command::Changed(snapshot)) => {
                        pending = Some(snapshot);
                        deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(Command::Flush(ack)) => {
                        deadline = None;
                        let result = match pending.take() {
                            Some(snapshot) => match self.persist(&snapshot).await {
                                Ok(id) => Ok(id),
                                Err(e) => {
                                    // Keep the unsaved delta for the next tick.
                                    pending = Some(snapshot);
                                    deadline = Some(Instant::now() + self.debounce);
                                    Err(e)
                                }
                            },
                            None => Ok(self.current_id),
                        };
                        let _ = ack.send(result);
                    }
                    // Handle dropped: substitute an immediate final save for
                    // the cancelled timer, then exit.
                    None => {
                        if let Some(snapshot) = pending.take() {
                            let _ = self.persist(&snapshot).await;
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    if let Some(snapshot) = pending.take() {
                        if self.persist(&snapshot).await.is_err() {
                            // The unsaved delta rides along into the next
                            // debounce tick.
                            pending = Some(snapshot);
                            deadline = Some(Instant::now() + self.debounce);
                        }
                    }
                }
            }
        }
    }

    /// Runs one upsert. Skips entirely when the snapshot fails the minimal
    /// draft-persistence precondition, so no partial/garbage drafts are
    /// ever created.
    async fn persist(&mut self, snapshot: &CampaignDraft) -> StudioResult<Option<Uuid>> {
        if !snapshot.persistable() {
            debug!("Skipping autosave: draft title below minimum length");
            return Ok(None);
        }

        self.status.write().is_saving = true;
        let result = self.store.upsert(self.current_id, snapshot).await;

        let mut status = self.status.write();
        status.is_saving = false;
        match result {
            Ok(id) => {
                self.current_id = Some(id);
                status.draft_id = Some(id);
                status.last_saved_at = Some(Utc::now());
                status.last_error = None;
                debug!(draft_id = %id, "Draft autosaved");
                Ok(Some(id))
            }
            Err(e) => {
                warn!(error = %e, "Autosave failed; will retry on next tick");
                status.last_error = Some(e.to_string());
                self.observer.report("autosave", &e.to_string());
                Err(e)
            }
        }
    }
}
