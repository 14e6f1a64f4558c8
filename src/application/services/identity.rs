//! User and authentication service
//!
//! Registration, login (JWT issuance) and guarded profile mutations.

use std::sync::Arc;

use tracing::info;

use crate::application::guard::{authorize_owner, CallerContext};
use crate::domain::{DomainError, DomainResult, Page, User, UserRepository, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Registration payload, already syntax-validated by the HTTP layer.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Role name; defaults to `client` when absent.
    pub role: Option<String>,
}

/// Profile update payload.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication result returned after a successful login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    jwt_config: JwtConfig,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Incorrect email or password".into()))?;

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Incorrect email or password".into()));
        }

        let token = create_token(&user.id, &user.email, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {e}")))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, payload: RegisterUser) -> DomainResult<User> {
        let role = match payload.role.as_deref() {
            None => UserRole::Client,
            Some(name) => UserRole::parse(name).ok_or(DomainError::NotFound {
                entity: "Role",
                field: "name",
                value: name.to_string(),
            })?,
        };

        if self.repo.find_by_email(&payload.email).await?.is_some() {
            return Err(DomainError::Conflict("User email is already in use".into()));
        }

        let hash = hash_password(&payload.password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {e}")))?;
        let user = User::new(
            payload.first_name,
            payload.last_name,
            payload.email,
            hash,
            role,
        );
        let created = self.repo.insert(user).await?;

        info!(user_id = %created.id, email = %created.email, "New user registered");
        Ok(created)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, id: &str) -> DomainResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn get_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    pub async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<User>> {
        self.repo.list(page, page_size).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Update a user's profile; only the owner or an admin may do so.
    pub async fn update(
        &self,
        id: &str,
        payload: UpdateUser,
        caller: &CallerContext,
    ) -> DomainResult<User> {
        authorize_owner(caller, id, "update")?;
        let existing = self.get(id).await?;

        if let Some(other) = self.repo.find_by_email(&payload.email).await? {
            if other.id != id {
                return Err(DomainError::Conflict("Email is already in use".into()));
            }
        }

        let hash = hash_password(&payload.password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {e}")))?;
        let candidate = User {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash: hash,
            updated_at: chrono::Utc::now(),
            ..existing
        };
        self.repo.update(&candidate).await
    }

    /// Delete a user account; only the owner or an admin may do so.
    pub async fn delete(&self, id: &str, caller: &CallerContext) -> DomainResult<()> {
        let existing = self.get(id).await?;
        authorize_owner(caller, &existing.id, "delete")?;
        self.repo.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::InMemoryStore;

    fn service() -> UserService<InMemoryStore> {
        UserService::new(Arc::new(InMemoryStore::default()), JwtConfig::default())
    }

    fn register_payload(email: &str) -> RegisterUser {
        RegisterUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: email.into(),
            password: "hunter2hunter2".into(),
            role: None,
        }
    }

    fn caller_for(user: &User) -> CallerContext {
        CallerContext {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    #[tokio::test]
    async fn register_defaults_to_the_client_role() {
        let svc = service();
        let user = svc.register(register_payload("ann@example.com")).await.unwrap();
        assert_eq!(user.role, UserRole::Client);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let svc = service();
        svc.register(register_payload("ann@example.com")).await.unwrap();

        let err = svc
            .register(register_payload("ann@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_unknown_role_names() {
        let svc = service();
        let mut payload = register_payload("ann@example.com");
        payload.role = Some("superuser".into());

        let err = svc.register(payload).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Role", .. }));
    }

    #[tokio::test]
    async fn login_roundtrip_issues_a_token() {
        let svc = service();
        svc.register(register_payload("ann@example.com")).await.unwrap();

        let auth = svc.login("ann@example.com", "hunter2hunter2").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert!(!auth.token.is_empty());
        assert_eq!(auth.user.email, "ann@example.com");
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let svc = service();
        svc.register(register_payload("ann@example.com")).await.unwrap();

        assert!(matches!(
            svc.login("ann@example.com", "wrong-password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login("ghost@example.com", "hunter2hunter2").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn update_is_guarded_by_ownership() {
        let svc = service();
        let ann = svc.register(register_payload("ann@example.com")).await.unwrap();
        let bob = svc.register(register_payload("bob@example.com")).await.unwrap();

        let payload = UpdateUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann2@example.com".into(),
            password: "hunter2hunter2".into(),
        };
        let err = svc
            .update(&ann.id, payload.clone(), &caller_for(&bob))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let updated = svc.update(&ann.id, payload, &caller_for(&ann)).await.unwrap();
        assert_eq!(updated.email, "ann2@example.com");
    }

    #[tokio::test]
    async fn update_rejects_email_taken_by_another_user() {
        let svc = service();
        let ann = svc.register(register_payload("ann@example.com")).await.unwrap();
        svc.register(register_payload("bob@example.com")).await.unwrap();

        let payload = UpdateUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "bob@example.com".into(),
            password: "hunter2hunter2".into(),
        };
        let err = svc.update(&ann.id, payload, &caller_for(&ann)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_is_guarded_and_checks_existence() {
        let svc = service();
        let ann = svc.register(register_payload("ann@example.com")).await.unwrap();
        let bob = svc.register(register_payload("bob@example.com")).await.unwrap();

        assert!(matches!(
            svc.delete(&ann.id, &caller_for(&bob)).await,
            Err(DomainError::Unauthorized(_))
        ));

        svc.delete(&ann.id, &caller_for(&ann)).await.unwrap();
        assert!(matches!(
            svc.get(&ann.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
