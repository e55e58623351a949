use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::donations::dtos::{CreateDonationDto, UpdateDonationDto};
use crate::features::donations::models::Donation;
use crate::features::donations::status;
use crate::modules::store::DocumentStore;
use crate::shared::constants::DONATIONS_COLLECTION;

/// Service for reading and writing donations in the document store
pub struct DonationService {
    store: Arc<dyn DocumentStore>,
}

impl DonationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Submit a new donation
    ///
    /// Nothing is written when validation fails.
    pub async fn create(&self, dto: CreateDonationDto) -> Result<Donation> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = dto.into_record(Utc::now().timestamp())?;
        let document = serde_json::to_value(&record)
            .map_err(|e| AppError::Internal(format!("Failed to encode donation: {}", e)))?;

        // A record that would not read back is never written
        let mut donation = Donation::from_record(String::new(), record)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let id = self
            .store
            .push(DONATIONS_COLLECTION, document)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create donation: {}", e);
                AppError::Store(e)
            })?;

        tracing::info!(
            "Donation created: id={}, name={}, quantity={}",
            id,
            donation.donation_name,
            donation.quantity
        );

        donation.id = id;
        Ok(donation)
    }

    /// Read every donation, skipping records that fail to parse
    pub async fn fetch_all(&self) -> Result<Vec<Donation>> {
        let entries = self.store.list(DONATIONS_COLLECTION).await.map_err(|e| {
            tracing::error!("Failed to list donations: {}", e);
            AppError::Store(e)
        })?;

        let donations = entries
            .into_iter()
            .filter_map(|(id, raw)| match Donation::from_value(id.as_str(), raw) {
                Ok(donation) => Some(donation),
                Err(e) => {
                    tracing::warn!("Skipping donation record {}: {}", id, e);
                    None
                }
            })
            .collect();

        Ok(donations)
    }

    /// Read every donation and keep the ones under a status tab
    pub async fn list(&self, tab: Option<&str>) -> Result<Vec<Donation>> {
        let donations = self.fetch_all().await?;
        Ok(match tab {
            Some(tab) => status::filter_by_tab(donations, tab),
            None => donations,
        })
    }

    pub async fn fetch_one(&self, id: &str) -> Result<Donation> {
        let raw = self
            .store
            .get(DONATIONS_COLLECTION, id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch donation {}: {}", id, e);
                AppError::Store(e)
            })?
            .ok_or_else(|| not_found(id))?;

        Donation::from_value(id, raw).map_err(|e| {
            tracing::warn!("Donation record {} is unreadable: {}", id, e);
            not_found(id)
        })
    }

    /// Merge the supplied fields into an existing donation
    pub async fn update(&self, id: &str, dto: UpdateDonationDto) -> Result<Donation> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Existence check only; no lock is held between this read and the write
        let existing = self
            .store
            .get(DONATIONS_COLLECTION, id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up donation {}: {}", id, e);
                AppError::Store(e)
            })?;
        if existing.is_none() {
            return Err(not_found(id));
        }

        let fields = dto.into_fields();
        let changed: Vec<String> = fields.keys().cloned().collect();

        self.store
            .update(DONATIONS_COLLECTION, id, fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update donation {}: {}", id, e);
                AppError::Store(e)
            })?;

        tracing::info!("Donation updated: id={}, fields={:?}", id, changed);

        self.fetch_one(id).await
    }

    /// Delete a donation. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store
            .remove(DONATIONS_COLLECTION, id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete donation {}: {}", id, e);
                AppError::Store(e)
            })?;

        tracing::info!("Donation deleted: id={}", id);
        Ok(())
    }

    pub async fn reserve(&self, id: &str, uid: &str) -> Result<Donation> {
        self.update(id, UpdateDonationDto::reserve(uid)).await
    }

    pub async fn close(&self, id: &str) -> Result<Donation> {
        self.update(id, UpdateDonationDto::close()).await
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("No details available for donation '{}'", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::donations::models::{Location, MealType, QuantityType};
    use crate::features::donations::status::DonationStatus;
    use crate::modules::store::{MemoryStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use serde_json::{json, Map, Value};
    use tokio_test::{assert_err, assert_ok};

    /// Store that refuses every call, as a database with bad rules would
    struct FailingStore;

    fn denied<T>() -> StoreResult<T> {
        Err(StoreError::Rejected {
            status: 401,
            message: "Permission denied".to_string(),
        })
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn list(&self, _: &str) -> StoreResult<Vec<(String, Value)>> {
            denied()
        }
        async fn get(&self, _: &str, _: &str) -> StoreResult<Option<Value>> {
            denied()
        }
        async fn push(&self, _: &str, _: Value) -> StoreResult<String> {
            denied()
        }
        async fn set(&self, _: &str, _: &str, _: Value) -> StoreResult<()> {
            denied()
        }
        async fn update(&self, _: &str, _: &str, _: Map<String, Value>) -> StoreResult<()> {
            denied()
        }
        async fn remove(&self, _: &str, _: &str) -> StoreResult<()> {
            denied()
        }
    }

    fn setup() -> (Arc<MemoryStore>, DonationService) {
        let store = Arc::new(MemoryStore::new());
        let service = DonationService::new(store.clone());
        (store, service)
    }

    fn create_dto() -> CreateDonationDto {
        CreateDonationDto {
            donation_name: "Paneer wraps".to_string(),
            description: Some(Sentence(3..8).fake()),
            meal_type: Some(MealType::Veg),
            quantity: 3,
            quantity_type: Some(QuantityType::Medium),
            contact_number: "+1 647 123 4567".to_string(),
            location: Some(Location::Coordinates {
                latitude: 43.6532,
                longitude: -79.3832,
            }),
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_one_round_trips_required_fields() {
        let (_, service) = setup();
        let dto = create_dto();

        let created = assert_ok!(service.create(dto.clone()).await);
        let fetched = assert_ok!(service.fetch_one(&created.id).await);

        assert_eq!(fetched.donation_name, dto.donation_name);
        assert_eq!(Some(fetched.meal_type), dto.meal_type);
        assert_eq!(i64::from(fetched.quantity), dto.quantity);
        assert_eq!(Some(fetched.quantity_type), dto.quantity_type);
        assert_eq!(fetched.contact_number, dto.contact_number);
        assert_eq!(fetched.location, dto.location);
        assert_eq!(fetched.timestamp, created.timestamp);
        assert_eq!(fetched.status(), DonationStatus::Open);
        assert!(fetched.timestamp > 0);
    }

    #[tokio::test]
    async fn test_create_without_location_stores_placeholder() {
        let (store, service) = setup();
        let mut dto = create_dto();
        dto.location = None;

        let created = assert_ok!(service.create(dto).await);
        let raw = store
            .get(DONATIONS_COLLECTION, &created.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(raw["location"], json!("Location will be added later"));
        assert_eq!(raw["closed"], json!(false));
        assert!(raw.get("reservedBy").is_none());
    }

    #[tokio::test]
    async fn test_create_with_empty_contact_writes_nothing() {
        let (store, service) = setup();
        let mut dto = create_dto();
        dto.contact_number = String::new();

        let result = service.create(dto).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.list(DONATIONS_COLLECTION).await.unwrap().is_empty());

        // Validation runs before the store is touched at all
        let failing = DonationService::new(Arc::new(FailingStore));
        let mut dto = create_dto();
        dto.quantity = 0;
        assert!(matches!(
            failing.create(dto).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_with_whitespace_contact_writes_nothing() {
        let (store, service) = setup();

        for contact in ["          ", "----------"] {
            let mut dto = create_dto();
            dto.contact_number = contact.to_string();

            let error = assert_err!(service.create(dto).await);
            assert!(matches!(error, AppError::Validation(_)), "{:?}", contact);
        }

        assert!(store.list(DONATIONS_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_whitespace_contact_keeps_donation() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);

        for contact in ["          ", "----------"] {
            let dto: UpdateDonationDto =
                serde_json::from_value(json!({ "contactNumber": contact })).unwrap();
            let error = assert_err!(service.update(&created.id, dto).await);
            assert!(matches!(error, AppError::Validation(_)), "{:?}", contact);
        }

        let fetched = assert_ok!(service.fetch_one(&created.id).await);
        assert_eq!(fetched.contact_number, "+1 647 123 4567");
        assert_eq!(assert_ok!(service.fetch_all().await).len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_carries_store_message() {
        let service = DonationService::new(Arc::new(FailingStore));

        let error = assert_err!(service.create(create_dto()).await);
        assert!(matches!(error, AppError::Store(_)));
        assert!(error.to_string().contains("Permission denied"));

        assert!(matches!(service.fetch_all().await, Err(AppError::Store(_))));
        assert!(matches!(service.delete("x").await, Err(AppError::Store(_))));
        assert!(matches!(
            service.update("x", UpdateDonationDto::close()).await,
            Err(AppError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_skips_unparseable_records() {
        let (store, service) = setup();
        let good = assert_ok!(service.create(create_dto()).await);
        store
            .set(
                DONATIONS_COLLECTION,
                "broken",
                json!({
                    "mealType": "Veg",
                    "quantity": 2,
                    "quantityType": "Small",
                    "contactNumber": "6471234567",
                    "timestamp": 1
                }),
            )
            .await
            .unwrap();

        let donations = assert_ok!(service.fetch_all().await);
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].id, good.id);

        // An unreadable record is reported like a missing one
        assert!(matches!(
            service.fetch_one("broken").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_key_order() {
        let (_, service) = setup();
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(assert_ok!(service.create(create_dto()).await).id);
        }

        let listed: Vec<String> = assert_ok!(service.fetch_all().await)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_close_wins_over_reservation() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);

        let reserved = assert_ok!(service.reserve(&created.id, "uid-42").await);
        assert_eq!(reserved.status(), DonationStatus::Reserved);
        assert_eq!(reserved.reserved_by.as_deref(), Some("uid-42"));

        let dto = UpdateDonationDto {
            closed: Some(true),
            ..Default::default()
        };
        assert_ok!(service.update(&created.id, dto).await);

        let fetched = assert_ok!(service.fetch_one(&created.id).await);
        assert_eq!(fetched.status(), DonationStatus::Closed);
        assert_eq!(fetched.reserved_by.as_deref(), Some("uid-42"));
    }

    #[tokio::test]
    async fn test_update_is_partial_and_null_clears_reservation() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);
        assert_ok!(service.reserve(&created.id, "uid-1").await);

        let dto: UpdateDonationDto =
            serde_json::from_value(json!({ "reservedBy": null, "quantity": 7 })).unwrap();
        let updated = assert_ok!(service.update(&created.id, dto).await);

        assert_eq!(updated.reserved_by, None);
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.donation_name, created.donation_name);
        assert_eq!(updated.contact_number, created.contact_number);
        assert_eq!(updated.timestamp, created.timestamp);
        assert_eq!(updated.status(), DonationStatus::Open);
    }

    #[tokio::test]
    async fn test_transitions_are_not_guarded() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);

        assert_ok!(service.close(&created.id).await);
        let reserved = assert_ok!(service.reserve(&created.id, "uid-7").await);
        assert_eq!(reserved.status(), DonationStatus::Closed);

        let reopened = assert_ok!(
            service
                .update(
                    &created.id,
                    UpdateDonationDto {
                        closed: Some(false),
                        ..Default::default()
                    }
                )
                .await
        );
        assert_eq!(reopened.status(), DonationStatus::Reserved);
    }

    #[tokio::test]
    async fn test_update_missing_donation_is_not_found() {
        let (store, service) = setup();

        let result = service.close("does-not-exist").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.list(DONATIONS_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_fields() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);

        let dto = UpdateDonationDto {
            quantity: Some(12),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&created.id, dto).await,
            Err(AppError::Validation(_))
        ));

        let fetched = assert_ok!(service.fetch_one(&created.id).await);
        assert_eq!(fetched.quantity, 3);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, service) = setup();
        let created = assert_ok!(service.create(create_dto()).await);

        assert_ok!(service.delete(&created.id).await);
        assert_ok!(service.delete(&created.id).await);
        assert_ok!(service.delete("never-existed").await);

        let error = assert_err!(service.fetch_one(&created.id).await);
        assert!(matches!(error, AppError::NotFound(ref msg) if msg.contains("No details available")));
    }

    #[tokio::test]
    async fn test_list_filters_by_tab() {
        let (_, service) = setup();
        let open = assert_ok!(service.create(create_dto()).await);
        let reserved = assert_ok!(service.create(create_dto()).await);
        let closed = assert_ok!(service.create(create_dto()).await);
        assert_ok!(service.reserve(&reserved.id, "uid-3").await);
        assert_ok!(service.close(&closed.id).await);

        let ids = |donations: Vec<Donation>| -> Vec<String> {
            donations.into_iter().map(|d| d.id).collect()
        };

        assert_eq!(ids(assert_ok!(service.list(Some("open")).await)), vec![open.id.clone()]);
        assert_eq!(
            ids(assert_ok!(service.list(Some("Reserved")).await)),
            vec![reserved.id.clone()]
        );
        assert_eq!(
            ids(assert_ok!(service.list(Some("CLOSED")).await)),
            vec![closed.id.clone()]
        );
        assert_eq!(assert_ok!(service.list(Some("everything")).await).len(), 3);
        assert_eq!(assert_ok!(service.list(None).await).len(), 3);
    }
}
