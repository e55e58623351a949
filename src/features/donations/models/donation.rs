use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::features::donations::status::DonationStatus;
use crate::shared::constants::{MAX_QUANTITY, MIN_QUANTITY};

/// Dietary class of a donated meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MealType {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Veg => "Veg",
            MealType::NonVeg => "Non-Veg",
        }
    }
}

/// Portion size of a donation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QuantityType {
    Small,
    Medium,
    Large,
}

impl QuantityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityType::Small => "Small",
            QuantityType::Medium => "Medium",
            QuantityType::Large => "Large",
        }
    }
}

/// Pickup location
///
/// Older clients stored a display name (or a placeholder text), newer ones a
/// coordinate pair. Both shapes are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    Named(String),
}

impl Location {
    /// Normalize a stored `location` value; anything unusable means "no location"
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| Location::Named(name.to_string()))
            }
            Value::Object(map) => {
                let latitude = map.get("latitude").and_then(Value::as_f64)?;
                let longitude = map.get("longitude").and_then(Value::as_f64)?;
                let location = Location::Coordinates {
                    latitude,
                    longitude,
                };
                location.is_valid().then_some(location)
            }
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Location::Coordinates {
                latitude,
                longitude,
            } => json!({ "latitude": latitude, "longitude": longitude }),
            Location::Named(name) => Value::String(name.clone()),
        }
    }

    /// Coordinates must be on the globe; names must not be blank
    pub fn is_valid(&self) -> bool {
        match self {
            Location::Coordinates {
                latitude,
                longitude,
            } => (-90.0..=90.0).contains(latitude) && (-180.0..=180.0).contains(longitude),
            Location::Named(name) => !name.trim().is_empty(),
        }
    }
}

/// Donation as stored under `/donations/{id}`
///
/// Required fields fail decoding when missing or mistyped. Optional fields
/// decode leniently: a missing or mistyped value becomes the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub donation_name: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    pub meal_type: MealType,
    pub quantity: i64,
    pub quantity_type: QuantityType,
    pub contact_number: String,
    #[serde(
        default,
        deserialize_with = "lenient_location",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Location>,
    pub timestamp: i64,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub reserved_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub closed: bool,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(Location::from_value))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, bool>(deserializer)?.unwrap_or(false))
}

/// Why a stored record could not become a [`Donation`]
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed donation record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("field '{0}' must not be blank")]
    Blank(&'static str),

    #[error("quantity {0} is outside the 1-10 range")]
    QuantityOutOfRange(i64),
}

/// A validated donation
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: String,
    pub donation_name: String,
    pub description: Option<String>,
    pub meal_type: MealType,
    pub quantity: u8,
    pub quantity_type: QuantityType,
    pub contact_number: String,
    pub location: Option<Location>,
    pub timestamp: i64,
    pub reserved_by: Option<String>,
    pub closed: bool,
}

impl Donation {
    /// Parse a raw store document
    pub fn from_value(id: impl Into<String>, raw: Value) -> Result<Self, RecordError> {
        let record: DonationRecord = serde_json::from_value(raw)?;
        Self::from_record(id, record)
    }

    pub fn from_record(id: impl Into<String>, record: DonationRecord) -> Result<Self, RecordError> {
        let donation_name = record.donation_name.trim().to_string();
        if donation_name.is_empty() {
            return Err(RecordError::Blank("donationName"));
        }

        let contact_number = record.contact_number.trim().to_string();
        if contact_number.is_empty() {
            return Err(RecordError::Blank("contactNumber"));
        }

        let quantity = u8::try_from(record.quantity)
            .ok()
            .filter(|q| (MIN_QUANTITY..=MAX_QUANTITY).contains(&i64::from(*q)))
            .ok_or(RecordError::QuantityOutOfRange(record.quantity))?;

        Ok(Self {
            id: id.into(),
            donation_name,
            description: non_blank(record.description),
            meal_type: record.meal_type,
            quantity,
            quantity_type: record.quantity_type,
            contact_number,
            location: record.location,
            timestamp: record.timestamp,
            reserved_by: record.reserved_by,
            closed: record.closed,
        })
    }

    pub fn status(&self) -> DonationStatus {
        DonationStatus::derive(self.closed, self.reserved_by.as_deref())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
