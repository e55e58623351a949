use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::modules::identity::IdentitySession;
use crate::shared::validation::validate_phone_number;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,

    #[validate(custom(
        function = "validate_phone_number",
        message = "Phone number must be 10-15 digits, spaces, '+', '-' or parentheses"
    ))]
    pub phone_number: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for a password reset email
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Firebase ID token, sent back as `Authorization: Bearer <token>`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AuthUserDto,
}

/// User info included in auth response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub uid: String,
    pub email: Option<String>,
}

impl From<IdentitySession> for AuthResponseDto {
    fn from(session: IdentitySession) -> Self {
        Self {
            access_token: session.id_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user: AuthUserDto {
                uid: session.identity.uid,
                email: session.identity.email,
            },
        }
    }
}

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub uid: String,
    pub email: Option<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
        }
    }
}
