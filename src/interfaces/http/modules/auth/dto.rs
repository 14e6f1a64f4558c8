//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Not a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(
        min = 2,
        max = 15,
        message = "Invalid firstName. Must be between 2 and 15 characters long"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 2,
        max = 15,
        message = "Invalid lastName. Must be between 2 and 15 characters long"
    ))]
    pub last_name: String,

    #[validate(email(message = "Not a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role name ("admin" / "client"); defaults to client.
    pub role: Option<String>,
}
