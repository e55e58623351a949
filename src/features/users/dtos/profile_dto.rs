use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::users::models::UserProfile;
use crate::shared::validation::{validate_not_blank, validate_phone_number};

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponseDto {
    pub uid: String,
    pub username: String,
    pub phone_number: String,
    pub email: String,
    pub profile_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserProfileResponseDto {
    pub fn new(uid: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            uid: uid.into(),
            username: profile.username,
            phone_number: profile.phone_number,
            email: profile.email,
            profile_image_url: profile.profile_image_url,
            gender: profile.gender,
            role: profile.role,
        }
    }
}

/// Request DTO for editing the caller's profile
///
/// The email address belongs to the account and cannot be changed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_profile_update"))]
pub struct UpdateProfileDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Username must not be blank"),
        length(max = 50, message = "Username must be 1-50 characters")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[validate(custom(
        function = "validate_phone_number",
        message = "Phone number must be 10-15 digits, spaces, '+', '-' or parentheses"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[validate(url(message = "Profile image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    #[validate(length(max = 32, message = "Gender must not exceed 32 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

fn validate_profile_update(dto: &UpdateProfileDto) -> Result<(), ValidationError> {
    if dto.username.is_none()
        && dto.phone_number.is_none()
        && dto.profile_image_url.is_none()
        && dto.gender.is_none()
    {
        let mut error = ValidationError::new("empty_update");
        error.message = Some("At least one field must be provided".into());
        return Err(error);
    }
    Ok(())
}

impl UpdateProfileDto {
    pub fn into_fields(self) -> Map<String, Value> {
        [
            ("username", self.username),
            ("phoneNumber", self.phone_number),
            ("profileImageUrl", self.profile_image_url),
            ("gender", self.gender),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), Value::String(v.trim().to_string()))))
        .collect()
    }
}
