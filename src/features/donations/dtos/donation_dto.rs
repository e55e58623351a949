use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::core::error::AppError;
use crate::features::donations::models::{
    Donation, DonationRecord, Location, MealType, QuantityType,
};
use crate::features::donations::status::{derive_status, DonationStatus};
use crate::shared::constants::{LOCATION_PLACEHOLDER, MIN_QUANTITY};
use crate::shared::validation::{validate_not_blank, validate_phone_number};

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request DTO for submitting a donation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationDto {
    /// Short title shown in the donation list
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Donation name is required"),
        length(max = 120, message = "Donation name must not exceed 120 characters")
    )]
    pub donation_name: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(required(message = "Meal type is required"))]
    pub meal_type: Option<MealType>,

    /// Number of portions (1-10, default 1)
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10, message = "Quantity must be between 1 and 10"))]
    pub quantity: i64,

    #[validate(required(message = "Quantity type is required"))]
    pub quantity_type: Option<QuantityType>,

    #[serde(default)]
    #[validate(custom(
        function = "validate_phone_number",
        message = "Contact number must be 10-15 digits, spaces, '+', '-' or parentheses"
    ))]
    pub contact_number: String,

    /// Coordinates or a display name. Defaults to a placeholder when omitted.
    #[validate(custom(function = "validate_location"))]
    pub location: Option<Location>,
}

fn default_quantity() -> i64 {
    MIN_QUANTITY
}

impl CreateDonationDto {
    /// Build the stored record for a fresh, unreserved, open donation
    pub fn into_record(self, timestamp: i64) -> Result<DonationRecord, AppError> {
        let meal_type = self
            .meal_type
            .ok_or_else(|| AppError::Validation("Meal type is required".to_string()))?;
        let quantity_type = self
            .quantity_type
            .ok_or_else(|| AppError::Validation("Quantity type is required".to_string()))?;

        Ok(DonationRecord {
            donation_name: self.donation_name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            meal_type,
            quantity: self.quantity,
            quantity_type,
            contact_number: self.contact_number.trim().to_string(),
            location: Some(
                self.location
                    .unwrap_or_else(|| Location::Named(LOCATION_PLACEHOLDER.to_string())),
            ),
            timestamp,
            reserved_by: None,
            closed: false,
        })
    }
}

/// Request DTO for a partial donation edit
///
/// Omitted fields are left untouched. `reservedBy: null` clears a reservation
/// and an empty `description` removes it. `id` and `timestamp` are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_update"))]
pub struct UpdateDonationDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Donation name must not be blank"),
        length(max = 120, message = "Donation name must not exceed 120 characters")
    )]
    pub donation_name: Option<String>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    pub meal_type: Option<MealType>,

    #[validate(range(min = 1, max = 10, message = "Quantity must be between 1 and 10"))]
    pub quantity: Option<i64>,

    pub quantity_type: Option<QuantityType>,

    #[validate(custom(
        function = "validate_phone_number",
        message = "Contact number must be 10-15 digits, spaces, '+', '-' or parentheses"
    ))]
    pub contact_number: Option<String>,

    #[validate(custom(function = "validate_location"))]
    pub location: Option<Location>,

    /// Reserving user id, or `null` to release the reservation
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub reserved_by: Option<Option<String>>,

    pub closed: Option<bool>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateDonationDto {
    pub fn reserve(uid: impl Into<String>) -> Self {
        Self {
            reserved_by: Some(Some(uid.into())),
            ..Default::default()
        }
    }

    pub fn close() -> Self {
        Self {
            closed: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.donation_name.is_none()
            && self.description.is_none()
            && self.meal_type.is_none()
            && self.quantity.is_none()
            && self.quantity_type.is_none()
            && self.contact_number.is_none()
            && self.location.is_none()
            && self.reserved_by.is_none()
            && self.closed.is_none()
    }

    /// Store fields to merge; `null` entries delete the stored field
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();

        if let Some(name) = self.donation_name {
            fields.insert("donationName".into(), Value::String(name.trim().to_string()));
        }
        if let Some(description) = self.description {
            let description = description.trim();
            let value = if description.is_empty() {
                Value::Null
            } else {
                Value::String(description.to_string())
            };
            fields.insert("description".into(), value);
        }
        if let Some(meal_type) = self.meal_type {
            fields.insert("mealType".into(), Value::from(meal_type.as_str()));
        }
        if let Some(quantity) = self.quantity {
            fields.insert("quantity".into(), Value::from(quantity));
        }
        if let Some(quantity_type) = self.quantity_type {
            fields.insert("quantityType".into(), Value::from(quantity_type.as_str()));
        }
        if let Some(contact) = self.contact_number {
            fields.insert("contactNumber".into(), Value::String(contact.trim().to_string()));
        }
        if let Some(location) = self.location {
            fields.insert("location".into(), location.to_value());
        }
        if let Some(reserved_by) = self.reserved_by {
            let value = reserved_by
                .map(|uid| Value::String(uid.trim().to_string()))
                .unwrap_or(Value::Null);
            fields.insert("reservedBy".into(), value);
        }
        if let Some(closed) = self.closed {
            fields.insert("closed".into(), Value::Bool(closed));
        }

        fields
    }
}

fn validate_location(location: &Location) -> Result<(), ValidationError> {
    if location.is_valid() {
        return Ok(());
    }
    let mut error = ValidationError::new("location");
    error.message = Some(match location {
        Location::Named(_) => "Location name must not be blank".into(),
        Location::Coordinates { .. } => "Latitude must be within ±90 and longitude within ±180".into(),
    });
    Err(error)
}

fn validate_update(dto: &UpdateDonationDto) -> Result<(), ValidationError> {
    if dto.is_empty() {
        let mut error = ValidationError::new("empty_update");
        error.message = Some("At least one field must be provided".into());
        return Err(error);
    }
    if let Some(Some(uid)) = &dto.reserved_by {
        if uid.trim().is_empty() {
            let mut error = ValidationError::new("blank");
            error.message = Some("reservedBy must be a user id or null".into());
            return Err(error);
        }
    }
    Ok(())
}

/// Query params for listing donations
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListDonationsQuery {
    /// Status tab: `open`, `reserved` or `closed` (case-insensitive).
    /// Any other value returns every donation.
    pub status: Option<String>,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// Response DTO for a donation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponseDto {
    pub id: String,
    pub donation_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub meal_type: MealType,
    pub quantity: u8,
    pub quantity_type: QuantityType,
    pub contact_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub reserved_by: Option<String>,
    pub closed: bool,
    pub status: DonationStatus,
}

impl From<Donation> for DonationResponseDto {
    fn from(donation: Donation) -> Self {
        let status = derive_status(&donation);
        Self {
            id: donation.id,
            donation_name: donation.donation_name,
            description: donation.description,
            meal_type: donation.meal_type,
            quantity: donation.quantity,
            quantity_type: donation.quantity_type,
            contact_number: donation.contact_number,
            location: donation.location,
            timestamp: donation.timestamp,
            reserved_by: donation.reserved_by,
            closed: donation.closed,
            status,
        }
    }
}
