//! Wizard orchestration: step order, the current-step pointer, per-step
//! validation gating, navigation policy, and the terminal finish transition.

use tracing::{info, warn};
use uuid::Uuid;

use studio_autosave::AutosaveController;
use studio_core::collab::{BalancesProvider, ErrorObserver, FinalizeSink, MediaUploader};
use studio_core::config::WizardConfig;
use studio_core::error::{StudioError, StudioResult};
use studio_core::types::{BalanceCheck, CampaignDraft, DraftStatus, MediaFile};
use studio_estimation::balance;

use crate::resume::resume_index;
use crate::steps::{validate_step, StepId, StepValidation, STEP_ORDER};

/// Index of the review/finish position, one past the last step.
pub const REVIEW_INDEX: usize = STEP_ORDER.len();

/// Forward-navigation policy. `Linear` gates each step on the validity of
/// everything before it; `Free` keeps drafts with partial, out-of-order
/// progress navigable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    Linear,
    Free,
}

/// Wizard session state. `Editing` carries the current step index (which may
/// be [`REVIEW_INDEX`]); `Finalized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Editing(usize),
    Finishing,
    Finalized,
}

/// Result of a `next()` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    Advanced(usize),
    /// The current step rejected its data; the pointer did not move.
    Rejected(StepValidation),
    /// The session is finishing or finalized; there is no pointer to move.
    NotEditing,
}

/// Result of a `finish()` attempt. Only `Finalized` is terminal; every other
/// variant leaves the session usable.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    Finalized { campaign_id: Uuid },
    /// The first failing step, by index. Later failures are not collected.
    StepInvalid {
        step_index: usize,
        validation: StepValidation,
    },
    /// Blocking, but the caller must still offer "save as draft" as a
    /// non-failing alternative path.
    InsufficientBalance { check: BalanceCheck },
    /// The finalize collaborator rejected the campaign; the wizard stays in
    /// `Finishing` and the call may be retried.
    FinalizeFailed { message: String },
}

/// Orchestrates one editing session over a single draft snapshot.
pub struct WizardController {
    draft: CampaignDraft,
    mode: NavigationMode,
    state: WizardState,
    config: WizardConfig,
}

impl WizardController {
    /// Starts a fresh session at the first step.
    pub fn new(draft: CampaignDraft, mode: NavigationMode, config: WizardConfig) -> Self {
        Self {
            draft,
            mode,
            state: WizardState::Editing(0),
            config,
        }
    }

    /// Starts a session over a reloaded draft, positioned by resume-step
    /// inference rather than any stored pointer.
    pub fn resume(draft: CampaignDraft, mode: NavigationMode, config: WizardConfig) -> Self {
        let index = resume_index(&draft, &config);
        info!(index, "Resuming wizard session");
        Self {
            draft,
            mode,
            state: WizardState::Editing(index),
            config,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    /// The step under the pointer, or `None` at the review position or once
    /// the session left the editing states.
    pub fn current_step(&self) -> Option<StepId> {
        match self.state {
            WizardState::Editing(i) => STEP_ORDER.get(i).copied(),
            _ => None,
        }
    }

    /// Finalized sessions are read-only; a finalized draft is a live
    /// campaign, not an editable draft.
    fn ensure_not_finalized(&self) -> StudioResult<()> {
        if self.state == WizardState::Finalized {
            return Err(StudioError::Finalize(
                "campaign is already finalized".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies a field edit and returns the new combined snapshot, ready to
    /// hand to the autosave controller. Fails once the session is finalized.
    pub fn edit(&mut self, f: impl FnOnce(&mut CampaignDraft)) -> StudioResult<CampaignDraft> {
        self.ensure_not_finalized()?;
        f(&mut self.draft);
        Ok(self.draft.clone())
    }

    /// Validation of the step currently under the pointer.
    pub fn validate_current(&self) -> Option<StepValidation> {
        self.current_step()
            .map(|step| validate_step(step, &self.draft, &self.config))
    }

    /// Moves the pointer to `index`. In linear mode the move is allowed only
    /// when every lower-indexed step is currently valid; a denied move is
    /// silent and leaves the pointer unchanged. Returns whether the move
    /// happened.
    pub fn go_to(&mut self, index: usize) -> bool {
        let WizardState::Editing(_) = self.state else {
            return false;
        };
        if index > REVIEW_INDEX {
            return false;
        }

        if self.mode == NavigationMode::Linear {
            let gated = STEP_ORDER[..index.min(STEP_ORDER.len())]
                .iter()
                .any(|step| !validate_step(*step, &self.draft, &self.config).is_valid());
            if gated {
                return false;
            }
        }

        self.state = WizardState::Editing(index);
        true
    }

    /// Validates the current step; advances on success, stays in place and
    /// surfaces field-level reasons on failure.
    pub fn next(&mut self) -> NextOutcome {
        let WizardState::Editing(index) = self.state else {
            return NextOutcome::NotEditing;
        };
        if index >= REVIEW_INDEX {
            return NextOutcome::Advanced(REVIEW_INDEX);
        }

        let validation = validate_step(STEP_ORDER[index], &self.draft, &self.config);
        if !validation.is_valid() {
            return NextOutcome::Rejected(validation);
        }

        let next = index + 1;
        self.state = WizardState::Editing(next);
        NextOutcome::Advanced(next)
    }

    /// Moves one step back, never below the first step.
    pub fn back(&mut self) -> usize {
        if let WizardState::Editing(index) = self.state {
            let prev = index.saturating_sub(1);
            self.state = WizardState::Editing(prev);
            prev
        } else {
            0
        }
    }

    /// The terminal transition: re-validates every step in order, consults
    /// the balance gate, and either finalizes the draft or reports a
    /// blocking outcome.
    pub async fn finish<B, F>(&mut self, balances: &B, finalizer: &F) -> StudioResult<FinishOutcome>
    where
        B: BalancesProvider,
        F: FinalizeSink,
    {
        self.ensure_not_finalized()?;
        self.state = WizardState::Finishing;

        for (step_index, step) in STEP_ORDER.iter().enumerate() {
            let validation = validate_step(*step, &self.draft, &self.config);
            if !validation.is_valid() {
                self.state = WizardState::Editing(step_index);
                return Ok(FinishOutcome::StepInvalid {
                    step_index,
                    validation,
                });
            }
        }

        // All steps valid, so a budget is guaranteed present.
        let requested = self.draft.basic.budget.unwrap_or_default();
        let available = balances.available_balance(self.draft.owner_id).await?;
        let check = balance::evaluate(requested, available);
        if !check.sufficient {
            info!(
                requested = check.requested_budget,
                available = check.available_balance,
                "Finish blocked by insufficient balance"
            );
            self.state = WizardState::Editing(REVIEW_INDEX);
            return Ok(FinishOutcome::InsufficientBalance { check });
        }

        match finalizer.finalize(&self.draft).await {
            Ok(campaign_id) => {
                self.draft.status = DraftStatus::Finalized;
                self.state = WizardState::Finalized;
                info!(%campaign_id, "Campaign finalized");
                Ok(FinishOutcome::Finalized { campaign_id })
            }
            Err(e) => {
                // Stay in `Finishing`; the caller may retry.
                warn!(error = %e, "Finalize collaborator failed");
                Ok(FinishOutcome::FinalizeFailed {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Saves the draft right now, bypassing all step validation except the
    /// minimal persistence precondition.
    pub async fn save_draft(&mut self, autosave: &AutosaveController) -> StudioResult<Uuid> {
        self.ensure_not_finalized()?;
        if !self.draft.persistable() {
            return Err(StudioError::Validation(
                "a title of at least 3 characters is required to save a draft".to_string(),
            ));
        }

        autosave.note_change(self.draft.clone());
        let id = autosave.flush().await?.ok_or_else(|| {
            StudioError::Persistence("draft was not persisted".to_string())
        })?;
        self.draft.id = Some(id);
        Ok(id)
    }

    /// Uploads a creative asset and appends the returned URL to the draft.
    /// Upload failures are local and non-fatal for the session: they are
    /// reported to the observer and surfaced as [`StudioError::Upload`]
    /// without touching the draft or the wizard state.
    pub async fn attach_media<U: MediaUploader>(
        &mut self,
        uploader: &U,
        observer: &dyn ErrorObserver,
        file: &MediaFile,
    ) -> StudioResult<String> {
        self.ensure_not_finalized()?;
        match uploader.upload(file).await {
            Ok(url) => {
                self.draft.creative.media_urls.push(url.clone());
                Ok(url)
            }
            Err(e) => {
                warn!(error = %e, file = %file.file_name, "Media upload failed");
                observer.report("media_upload", &e.to_string());
                Err(StudioError::Upload(e.to_string()))
            }
        }
    }
}
