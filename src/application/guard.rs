//! Caller authorization
//!
//! One reusable owner-or-admin rule for appointment and user mutations,
//! parameterized by resource owner and action name, plus the stricter
//! role-only policy used for activity mutations.

use crate::domain::{DomainError, DomainResult, UserRole};

/// Identity of the caller as resolved by the transport layer.
///
/// Passed explicitly into every service operation; services never read
/// ambient request state.
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl CallerContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Permit when the caller owns the resource or holds the admin role.
/// `action` names the attempted operation ("update"/"delete") in the error.
pub fn authorize_owner(
    caller: &CallerContext,
    owner_id: &str,
    action: &str,
) -> DomainResult<()> {
    if caller.user_id == owner_id || caller.is_admin() {
        return Ok(());
    }
    Err(DomainError::Unauthorized(format!(
        "You don't have permission to {action} a resource that isn't yours"
    )))
}

/// Permit only admins, regardless of ownership.
pub fn require_admin(caller: &CallerContext, action: &str) -> DomainResult<()> {
    if caller.is_admin() {
        return Ok(());
    }
    Err(DomainError::Forbidden(format!(
        "Only administrators may {action}"
    )))
}

// ── Tests ──────────────────────────────────────────────────────
