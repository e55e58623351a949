use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, DocumentId};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::donations::dtos::{
    CreateDonationDto, DonationResponseDto, ListDonationsQuery, UpdateDonationDto,
};
use crate::features::donations::services::DonationService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a donation
#[utoipa::path(
    post,
    path = "/api/donations",
    request_body = CreateDonationDto,
    responses(
        (status = 201, description = "Donation created", body = ApiResponse<DonationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Store error")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn create_donation(
    user: AuthenticatedUser,
    State(service): State<Arc<DonationService>>,
    AppJson(dto): AppJson<CreateDonationDto>,
) -> Result<(StatusCode, Json<ApiResponse<DonationResponseDto>>)> {
    tracing::debug!("Donation submitted by {}", user.uid);

    let donation = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(donation.into()),
            Some("Donation submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List donations, optionally narrowed to one status tab
#[utoipa::path(
    get,
    path = "/api/donations",
    params(ListDonationsQuery),
    responses(
        (status = 200, description = "Donations in store key order", body = ApiResponse<Vec<DonationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Store error")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn list_donations(
    State(service): State<Arc<DonationService>>,
    Query(params): Query<ListDonationsQuery>,
) -> Result<Json<ApiResponse<Vec<DonationResponseDto>>>> {
    let donations = service.list(params.status.as_deref()).await?;
    let total = donations.len() as i64;
    let items: Vec<DonationResponseDto> = donations.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/donations/{id}",
    params(
        ("id" = String, Path, description = "Donation key")
    ),
    responses(
        (status = 200, description = "Donation found", body = ApiResponse<DonationResponseDto>),
        (status = 404, description = "No details available")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn get_donation(
    State(service): State<Arc<DonationService>>,
    DocumentId(id): DocumentId,
) -> Result<Json<ApiResponse<DonationResponseDto>>> {
    let donation = service.fetch_one(&id).await?;
    Ok(Json(ApiResponse::success(Some(donation.into()), None, None)))
}

/// Partially update a donation
#[utoipa::path(
    patch,
    path = "/api/donations/{id}",
    params(
        ("id" = String, Path, description = "Donation key")
    ),
    request_body = UpdateDonationDto,
    responses(
        (status = 200, description = "Donation updated", body = ApiResponse<DonationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Donation not found")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn update_donation(
    State(service): State<Arc<DonationService>>,
    DocumentId(id): DocumentId,
    AppJson(dto): AppJson<UpdateDonationDto>,
) -> Result<Json<ApiResponse<DonationResponseDto>>> {
    let donation = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(donation.into()),
        Some("Donation updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/donations/{id}",
    params(
        ("id" = String, Path, description = "Donation key")
    ),
    responses(
        (status = 200, description = "Donation deleted (also when it did not exist)"),
        (status = 502, description = "Store error")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn delete_donation(
    State(service): State<Arc<DonationService>>,
    DocumentId(id): DocumentId,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Donation deleted successfully".to_string()),
        None,
    )))
}

/// Reserve a donation for the calling user
#[utoipa::path(
    post,
    path = "/api/donations/{id}/reserve",
    params(
        ("id" = String, Path, description = "Donation key")
    ),
    responses(
        (status = 200, description = "Donation reserved", body = ApiResponse<DonationResponseDto>),
        (status = 404, description = "Donation not found")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn reserve_donation(
    user: AuthenticatedUser,
    State(service): State<Arc<DonationService>>,
    DocumentId(id): DocumentId,
) -> Result<Json<ApiResponse<DonationResponseDto>>> {
    let donation = service.reserve(&id, &user.uid).await?;
    Ok(Json(ApiResponse::success(
        Some(donation.into()),
        Some("Donation reserved".to_string()),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/donations/{id}/close",
    params(
        ("id" = String, Path, description = "Donation key")
    ),
    responses(
        (status = 200, description = "Donation closed", body = ApiResponse<DonationResponseDto>),
        (status = 404, description = "Donation not found")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn close_donation(
    State(service): State<Arc<DonationService>>,
    DocumentId(id): DocumentId,
) -> Result<Json<ApiResponse<DonationResponseDto>>> {
    let donation = service.close(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(donation.into()),
        Some("Donation closed".to_string()),
        None,
    )))
}
