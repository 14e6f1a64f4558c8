//! User domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// Elevated role: may mutate activities and any user's resources.
    Admin,
    /// Standard role: may only mutate resources they own.
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// Strict parse; unknown role names are an error at the call site.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "client" => Some(Self::Client),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all users; doubles as the login name.
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new account with a fresh id. The password must already be
    /// hashed by the caller.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_unique_ids() {
        let a = User::new("Ann", "Lee", "ann@example.com", "hash", UserRole::Client);
        let b = User::new("Bob", "Kim", "bob@example.com", "hash", UserRole::Client);
        assert_ne!(a.id, b.id);
        assert!(!a.is_admin());
    }

    #[test]
    fn role_parse_roundtrip() {
        for role in [UserRole::Admin, UserRole::Client] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(UserRole::parse("superuser"), None);
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
    }
}
