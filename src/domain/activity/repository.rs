//! Activity repository interface

use async_trait::async_trait;

use super::model::{Activity, ActivityDraft};
use crate::domain::page::Page;
use crate::domain::DomainResult;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Activity>>;

    /// Name lookup backing the uniqueness check.
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Activity>>;

    /// Resolve a set of ids in one round trip. Missing ids are simply absent
    /// from the result; callers decide whether that is an error.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Activity>>;

    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Activity>>;

    async fn insert(&self, draft: ActivityDraft) -> DomainResult<Activity>;

    async fn update(&self, activity: &Activity) -> DomainResult<Activity>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
