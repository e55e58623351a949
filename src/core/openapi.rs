use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::donations::{
    dtos as donations_dtos, handlers as donations_handlers, models as donations_models,
    status as donations_status,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::password_reset,
        auth::handlers::get_me,
        // Users
        profile_handler::get_profile,
        profile_handler::update_profile,
        // Donations
        donations_handlers::create_donation,
        donations_handlers::list_donations,
        donations_handlers::get_donation,
        donations_handlers::update_donation,
        donations_handlers::delete_donation,
        donations_handlers::reserve_donation,
        donations_handlers::close_donation,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::MeResponseDto,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::PasswordResetRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::MeResponseDto>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Donations
            donations_models::MealType,
            donations_models::QuantityType,
            donations_models::Location,
            donations_status::DonationStatus,
            donations_dtos::CreateDonationDto,
            donations_dtos::UpdateDonationDto,
            donations_dtos::DonationResponseDto,
            ApiResponse<donations_dtos::DonationResponseDto>,
            ApiResponse<Vec<donations_dtos::DonationResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Account registration, sign-in and password reset"),
        (name = "users", description = "User profile management"),
        (name = "donations", description = "Food donations: submit, reserve, close"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "KindMeal API",
        version = "0.1.0",
        description = "API documentation for KindMeal",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer ID token security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
