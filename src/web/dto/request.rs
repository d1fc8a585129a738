//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// User registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password (8 to 128 characters).
    #[validate(length(min = 8, max = 128, message = "Must be 8 to 128 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub password: String,
}
