//! In-memory draft store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same logical contract for development and testing.

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use studio_core::collab::DraftStore;
use studio_core::error::StudioResult;
use studio_core::types::CampaignDraft;

/// Thread-safe in-memory store for campaign drafts.
#[derive(Default)]
pub struct InMemoryDraftStore {
    drafts: DashMap<Uuid, CampaignDraft>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    /// Number of stored drafts.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl DraftStore for InMemoryDraftStore {
    async fn upsert(&self, id: Option<Uuid>, draft: &CampaignDraft) -> StudioResult<Uuid> {
        let id = match id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                info!(draft_id = %id, title = %draft.basic.title, "Creating draft");
                id
            }
        };
        let mut record = draft.clone();
        record.id = Some(id);
        self.drafts.insert(id, record);
        Ok(id)
    }

    async fn fetch_by_id(&self, id: Uuid) -> StudioResult<Option<CampaignDraft>> {
        Ok(self.drafts.get(&id).map(|r| r.value().clone()))
    }
}
