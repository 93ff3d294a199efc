//! Property listing handlers.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::PropertyForm;
use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::config::{DEFAULT_FEATURED_LIMIT, MAX_FEATURED_LIMIT};
use crate::domain::{
    Actor, ListingStatus, ListingType, PropertyCategory, PropertyFilter, PropertyImage,
    PropertyResponse, SortSpec, StatusPatch,
};
use crate::errors::{AppError, AppResult};
use crate::types::{empty_string_as_none, ApiResponse, Created, Page, PageRequest};

/// Public listing filters, sorting and paging.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PropertyListParams {
    /// buy | rent | sell
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub kind: Option<ListingType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub property_type: Option<PropertyCategory>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    /// Substring of location, city or state
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    /// Substring of title, description or location
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub bedrooms: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub bathrooms: Option<i32>,
    /// Property field to sort by (default createdAt)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_by: Option<String>,
    /// ASC | DESC (default DESC)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

impl PropertyListParams {
    fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            kind: self.kind,
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
            location: self.location.clone(),
            search: self.search.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
        }
    }
}

/// Admin listing filters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminListParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<ListingStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_approved: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedParams {
    /// Maximum number of listings (default 6, clamped to 1..=50)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyEnvelope {
    pub property: PropertyResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedEnvelope {
    pub properties: Vec<PropertyResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageEnvelope {
    pub image: PropertyImage,
}

/// Property routes; mutations sit behind the auth middleware.
pub fn property_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_properties))
        .route("/featured", get(featured_properties))
        .route("/:id", get(get_property));

    let protected = Router::new()
        .route("/", axum::routing::post(create_property))
        .route("/:id", put(update_property).delete(delete_property))
        .route("/user/my-properties", get(my_properties))
        .route("/admin/all", get(all_properties))
        .route("/:id/status", put(update_status))
        .route("/:id/images/:image_id", delete(delete_image))
        .route("/:id/images/:image_id/primary", put(set_primary_image))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

#[utoipa::path(
    get,
    path = "/properties",
    tag = "Properties",
    params(PropertyListParams),
    responses(
        (status = 200, description = "Properties retrieved successfully", body = crate::types::PropertyPage),
        (status = 400, description = "Invalid filter or sort parameter")
    )
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<PropertyListParams>,
) -> AppResult<ApiResponse<Page<PropertyResponse>>> {
    let sort = SortSpec::parse(params.sort_by.as_deref(), params.sort_order.as_deref())?;
    let page = PageRequest::new(params.page, params.size);

    let properties = state
        .property_service
        .list_public(params.filter(), sort, page)
        .await?;
    Ok(ApiResponse::ok("Properties retrieved successfully", properties))
}

#[utoipa::path(
    get,
    path = "/properties/featured",
    tag = "Properties",
    params(FeaturedParams),
    responses(
        (status = 200, description = "Featured properties retrieved successfully", body = FeaturedEnvelope)
    )
)]
pub async fn featured_properties(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> AppResult<ApiResponse<FeaturedEnvelope>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_FEATURED_LIMIT)
        .clamp(1, MAX_FEATURED_LIMIT);
    let properties = state.property_service.featured(limit).await?;
    Ok(ApiResponse::ok(
        "Featured properties retrieved successfully",
        FeaturedEnvelope { properties },
    ))
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property retrieved successfully", body = PropertyEnvelope),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<PropertyEnvelope>> {
    let property = state.property_service.get_public(id).await?;
    Ok(ApiResponse::ok(
        "Property retrieved successfully",
        PropertyEnvelope { property },
    ))
}

/// Create a listing from `multipart/form-data` or JSON
#[utoipa::path(
    post,
    path = "/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Property created successfully", body = PropertyEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_property(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    form: PropertyForm,
) -> AppResult<Created<PropertyEnvelope>> {
    let property = state
        .property_service
        .create(&actor, form.draft, form.files)
        .await?;
    Ok(Created::new(
        "Property created successfully",
        PropertyEnvelope { property },
    ))
}

#[utoipa::path(
    put,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property updated successfully", body = PropertyEnvelope),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Property not found or access denied")
    )
)]
pub async fn update_property(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    form: PropertyForm,
) -> AppResult<ApiResponse<PropertyEnvelope>> {
    let property = state
        .property_service
        .update(&actor, id, form.draft, form.files)
        .await?;
    Ok(ApiResponse::ok(
        "Property updated successfully",
        PropertyEnvelope { property },
    ))
}

#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property deleted successfully"),
        (status = 404, description = "Property not found or access denied")
    )
)]
pub async fn delete_property(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.property_service.delete(&actor, id).await?;
    Ok(ApiResponse::message("Property deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/properties/user/my-properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(PageParams),
    responses(
        (status = 200, description = "User properties retrieved successfully", body = crate::types::PropertyPage)
    )
)]
pub async fn my_properties(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<PropertyResponse>>> {
    let page = PageRequest::new(params.page, params.size);
    let properties = state.property_service.my_properties(&actor, page).await?;
    Ok(ApiResponse::ok(
        "User properties retrieved successfully",
        properties,
    ))
}

#[utoipa::path(
    get,
    path = "/properties/admin/all",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(AdminListParams),
    responses(
        (status = 200, description = "All properties retrieved successfully", body = crate::types::PropertyPage),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn all_properties(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<AdminListParams>,
) -> AppResult<ApiResponse<Page<PropertyResponse>>> {
    actor.require_admin()?;

    let sort = SortSpec::parse(params.sort_by.as_deref(), params.sort_order.as_deref())?;
    let page = PageRequest::new(params.page, params.size);
    let properties = state
        .property_service
        .list_all(params.status, params.is_approved, sort, page)
        .await?;
    Ok(ApiResponse::ok(
        "All properties retrieved successfully",
        properties,
    ))
}

#[utoipa::path(
    put,
    path = "/properties/{id}/status",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    request_body = StatusPatch,
    responses(
        (status = 200, description = "Property status updated successfully", body = PropertyEnvelope),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(patch): Json<StatusPatch>,
) -> AppResult<ApiResponse<PropertyEnvelope>> {
    actor.require_admin()?;
    if patch.is_approved.is_none() && patch.status.is_none() {
        return Err(AppError::validation("Nothing to update"));
    }

    let property = state.property_service.set_status(id, patch).await?;
    Ok(ApiResponse::ok(
        "Property status updated successfully",
        PropertyEnvelope {
            property: PropertyResponse::new(property, Vec::new(), None),
        },
    ))
}

#[utoipa::path(
    delete,
    path = "/properties/{id}/images/{image_id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Property id"),
        ("image_id" = i32, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Image deleted successfully"),
        (status = 404, description = "Property or image not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, image_id)): Path<(i32, i32)>,
) -> AppResult<ApiResponse<()>> {
    state
        .property_service
        .delete_image(&actor, id, image_id)
        .await?;
    Ok(ApiResponse::message("Image deleted successfully"))
}

#[utoipa::path(
    put,
    path = "/properties/{id}/images/{image_id}/primary",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Property id"),
        ("image_id" = i32, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Primary image updated successfully", body = ImageEnvelope),
        (status = 404, description = "Property or image not found")
    )
)]
pub async fn set_primary_image(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, image_id)): Path<(i32, i32)>,
) -> AppResult<ApiResponse<ImageEnvelope>> {
    let image = state
        .property_service
        .set_primary_image(&actor, id, image_id)
        .await?;
    Ok(ApiResponse::ok(
        "Primary image updated successfully",
        ImageEnvelope { image },
    ))
}
