//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::page::Page;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Email lookup backing both login and the uniqueness check.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<User>>;

    async fn insert(&self, user: User) -> DomainResult<User>;

    async fn update(&self, user: &User) -> DomainResult<User>;

    /// Delete the user; their appointments (and those appointments' links)
    /// go with them.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
