use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{UpdateProfileDto, UserProfileResponseDto};
use crate::features::users::models::UserProfile;
use crate::modules::store::DocumentStore;
use crate::shared::constants::USERS_COLLECTION;

/// Service for the profiles kept under `/users/{uid}`
pub struct UserProfileService {
    store: Arc<dyn DocumentStore>,
}

impl UserProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_profile(&self, uid: &str) -> Result<UserProfileResponseDto> {
        let raw = self
            .store
            .get(USERS_COLLECTION, uid)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch profile {}: {}", uid, e);
                AppError::Store(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("No profile found for user '{}'", uid)))?;

        let profile: UserProfile = serde_json::from_value(raw).map_err(|e| {
            tracing::warn!("Profile record {} is unreadable: {}", uid, e);
            AppError::NotFound(format!("No profile found for user '{}'", uid))
        })?;

        Ok(UserProfileResponseDto::new(uid, profile))
    }

    /// Merge the supplied fields into the caller's profile
    pub async fn update_profile(
        &self,
        uid: &str,
        dto: UpdateProfileDto,
    ) -> Result<UserProfileResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let fields = dto.into_fields();
        self.store
            .update(USERS_COLLECTION, uid, fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile {}: {}", uid, e);
                AppError::Store(e)
            })?;

        tracing::info!("Profile updated: uid={}", uid);
        self.get_profile(uid).await
    }

    /// Write the first profile of a newly registered account
    pub async fn seed_profile(&self, uid: &str, profile: UserProfile) -> Result<()> {
        let document = serde_json::to_value(&profile)
            .map_err(|e| AppError::Internal(format!("Failed to encode profile: {}", e)))?;

        self.store
            .set(USERS_COLLECTION, uid, document)
            .await
            .map_err(|e| {
                tracing::error!("Failed to seed profile {}: {}", uid, e);
                AppError::Store(e)
            })?;

        tracing::info!("Profile created: uid={}", uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::MemoryStore;
    use fake::faker::internet::en::{FreeEmail, Username};
    use fake::Fake;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn setup() -> (Arc<MemoryStore>, UserProfileService) {
        let store = Arc::new(MemoryStore::new());
        let service = UserProfileService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_seed_then_get_profile() {
        let (_, service) = setup();
        let username: String = Username().fake();
        let email: String = FreeEmail().fake();

        let profile = UserProfile {
            username: username.clone(),
            phone_number: "6471234567".to_string(),
            email: email.clone(),
            ..Default::default()
        };
        assert_ok!(service.seed_profile("uid-1", profile).await);

        let fetched = assert_ok!(service.get_profile("uid-1").await);
        assert_eq!(fetched.uid, "uid-1");
        assert_eq!(fetched.username, username);
        assert_eq!(fetched.email, email);
        assert_eq!(fetched.profile_image_url, "");
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let (_, service) = setup();
        assert!(matches!(
            service.get_profile("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let (store, service) = setup();
        store
            .set(
                USERS_COLLECTION,
                "uid-2",
                json!({ "username": "ravi", "phoneNumber": "6471234567", "email": "ravi@example.com" }),
            )
            .await
            .unwrap();

        let dto = UpdateProfileDto {
            phone_number: Some("(416) 555-0199".to_string()),
            ..Default::default()
        };
        let updated = assert_ok!(service.update_profile("uid-2", dto).await);

        assert_eq!(updated.phone_number, "(416) 555-0199");
        assert_eq!(updated.username, "ravi");
        assert_eq!(updated.email, "ravi@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_phone() {
        let (store, service) = setup();
        let dto = UpdateProfileDto {
            phone_number: Some("12".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.update_profile("uid-3", dto).await,
            Err(AppError::Validation(_))
        ));
        assert!(store.get(USERS_COLLECTION, "uid-3").await.unwrap().is_none());
    }
}
