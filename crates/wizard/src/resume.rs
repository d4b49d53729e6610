//! Resume-step inference for reloaded drafts.
//!
//! A draft may have been abandoned mid-step, or edited out of order via
//! template application, so a stored "last step" pointer cannot be trusted.
//! The resolver replays every step schema in strict order instead and stops
//! at the first failure; later steps' validity is only meaningful once the
//! earlier ones hold.

use tracing::debug;
use uuid::Uuid;

use studio_core::collab::DraftStore;
use studio_core::config::WizardConfig;
use studio_core::error::{StudioError, StudioResult};
use studio_core::types::CampaignDraft;

use crate::steps::{validate_step, STEP_ORDER};

/// Index of the first step whose schema rejects the draft, or
/// `STEP_ORDER.len()` (the review position) when every step passes.
pub fn resume_index(draft: &CampaignDraft, cfg: &WizardConfig) -> usize {
    for (index, step) in STEP_ORDER.iter().enumerate() {
        let validation = validate_step(*step, draft, cfg);
        if !validation.is_valid() {
            debug!(?step, index, "Resume replay stopped at invalid step");
            return index;
        }
    }
    STEP_ORDER.len()
}

/// Loads a draft and infers where the user should resume. Validations are
/// replayed sequentially, never in parallel.
pub async fn load_and_resolve<S: DraftStore>(
    store: &S,
    id: Uuid,
    cfg: &WizardConfig,
) -> StudioResult<(CampaignDraft, usize)> {
    let draft = store
        .fetch_by_id(id)
        .await?
        .ok_or(StudioError::DraftNotFound(id))?;
    let index = resume_index(&draft, cfg);
    Ok((draft, index))
}
