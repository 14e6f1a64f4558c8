//! Activity management service
//!
//! Activities are catalogue entries; only administrators may change them.
//! Name uniqueness is enforced on create and on update (excluding the
//! activity itself).

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::application::guard::{require_admin, CallerContext};
use crate::domain::{
    Activity, ActivityDraft, ActivityRepository, DomainError, DomainResult, Page,
};

pub struct ActivityService<R: ActivityRepository> {
    repo: Arc<R>,
}

impl<R: ActivityRepository> ActivityService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, id: i32) -> DomainResult<Activity> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Activity", id))
    }

    pub async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Activity>> {
        self.repo.list(page, page_size).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn create(
        &self,
        draft: ActivityDraft,
        caller: &CallerContext,
    ) -> DomainResult<Activity> {
        require_admin(caller, "create activities")?;
        validate_draft(&draft)?;

        if self.repo.find_by_name(&draft.name).await?.is_some() {
            return Err(DomainError::Conflict("Activity name is already in use".into()));
        }

        let created = self.repo.insert(draft).await?;
        info!(activity_id = created.id, name = %created.name, "Activity created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        draft: ActivityDraft,
        caller: &CallerContext,
    ) -> DomainResult<Activity> {
        require_admin(caller, "update activities")?;
        validate_draft(&draft)?;

        let existing = self.get(id).await?;

        if let Some(other) = self.repo.find_by_name(&draft.name).await? {
            if other.id != id {
                return Err(DomainError::Conflict("Activity name is already in use".into()));
            }
        }

        let candidate = Activity {
            name: draft.name,
            duration: draft.duration,
            price: draft.price,
            updated_at: chrono::Utc::now(),
            ..existing
        };
        self.repo.update(&candidate).await
    }

    pub async fn delete(&self, id: i32, caller: &CallerContext) -> DomainResult<()> {
        require_admin(caller, "delete activities")?;
        self.get(id).await?;
        self.repo.delete(id).await?;
        info!(activity_id = id, "Activity deleted");
        Ok(())
    }
}

/// Positive duration and price; both are re-checked here even though the
/// HTTP layer validates the payload.
fn validate_draft(draft: &ActivityDraft) -> DomainResult<()> {
    if draft.duration <= chrono::Duration::zero() {
        return Err(DomainError::Validation("Duration must be positive".into()));
    }
    if draft.price <= Decimal::ZERO {
        return Err(DomainError::Validation("Price must be positive".into()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
