//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, hero_handler, inquiry_handler, property_handler, user_handler,
};
use crate::domain::{
    Amenities, Facing, Furnishing, HeroSlide, HeroStats, Inquiry, InquiryStatus, InquiryType,
    InquiryUpdate, ListingStatus, ListingType, NewInquiry, OwnedProperty, OwnerSummary, Property,
    PropertyCategory, PropertyImage, PropertyResponse, RegisterUser, SlideKind, StatusPatch,
    UpdateProfile, UserResponse, UserRole, UserWithProperties,
};
use crate::services::{AdminStats, AuthPayload, UserStats};
use crate::types::{InquiryPage, PropertyPage, UserPage};

/// OpenAPI documentation for the Estate API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estate API",
        version = "0.1.0",
        description = "Real-estate listings: search, listing lifecycle, curation and administration",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::admin_login,
        auth_handler::logout,
        auth_handler::get_profile,
        auth_handler::update_profile,
        auth_handler::change_password,
        // Property endpoints
        property_handler::list_properties,
        property_handler::featured_properties,
        property_handler::get_property,
        property_handler::create_property,
        property_handler::update_property,
        property_handler::delete_property,
        property_handler::my_properties,
        property_handler::all_properties,
        property_handler::update_status,
        property_handler::delete_image,
        property_handler::set_primary_image,
        // Hero endpoints
        hero_handler::slides,
        hero_handler::stats,
        hero_handler::toggle_featured,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user_status,
        user_handler::delete_user,
        user_handler::user_stats,
        user_handler::admin_stats,
        // Inquiry endpoints
        inquiry_handler::submit_inquiry,
        inquiry_handler::list_inquiries,
        inquiry_handler::update_inquiry,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            RegisterUser,
            UpdateProfile,
            OwnedProperty,
            UserWithProperties,
            ListingType,
            ListingStatus,
            PropertyCategory,
            Amenities,
            Facing,
            Furnishing,
            Property,
            PropertyImage,
            OwnerSummary,
            PropertyResponse,
            StatusPatch,
            HeroSlide,
            SlideKind,
            HeroStats,
            Inquiry,
            InquiryType,
            InquiryStatus,
            NewInquiry,
            InquiryUpdate,
            // Pages
            PropertyPage,
            UserPage,
            InquiryPage,
            // Service types
            AuthPayload,
            UserStats,
            AdminStats,
            // Handler types
            auth_handler::LoginRequest,
            auth_handler::ChangePasswordRequest,
            auth_handler::UserEnvelope,
            property_handler::PropertyEnvelope,
            property_handler::FeaturedEnvelope,
            property_handler::ImageEnvelope,
            hero_handler::FeaturedToggle,
            user_handler::UserStatusRequest,
            user_handler::UserDetailEnvelope,
            user_handler::UserStatsEnvelope,
            user_handler::AdminStatsEnvelope,
            inquiry_handler::InquiryEnvelope,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and own profile"),
        (name = "Properties", description = "Listing search and lifecycle"),
        (name = "Hero", description = "Landing page highlights"),
        (name = "Users", description = "User administration and statistics"),
        (name = "Inquiries", description = "Contact requests")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
