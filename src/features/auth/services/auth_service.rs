use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, PasswordResetRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::UserProfile;
use crate::features::users::services::UserProfileService;
use crate::modules::identity::IdentityProvider;
use std::sync::Arc;
use validator::Validate;

/// Service for account operations (register, login, password reset)
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<UserProfileService>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<UserProfileService>) -> Self {
        Self { identity, profiles }
    }

    /// Create an account and its `/users/{uid}` profile
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let email = dto.email.trim().to_string();
        let session = self.identity.create_account(&email, &dto.password).await?;

        let profile = UserProfile {
            username: dto.username.unwrap_or_default().trim().to_string(),
            phone_number: dto.phone_number.unwrap_or_default().trim().to_string(),
            email: email.clone(),
            ..Default::default()
        };
        self.profiles
            .seed_profile(&session.identity.uid, profile)
            .await?;

        tracing::info!("Account registered: uid={}", session.identity.uid);
        Ok(session.into())
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let session = self
            .identity
            .sign_in(dto.email.trim(), &dto.password)
            .await?;

        tracing::info!("User signed in: uid={}", session.identity.uid);
        Ok(session.into())
    }

    pub async fn send_password_reset(&self, dto: PasswordResetRequestDto) -> Result<()> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.identity.send_password_reset(dto.email.trim()).await?;
        tracing::info!("Password reset email requested");
        Ok(())
    }

    pub fn get_current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }
}
