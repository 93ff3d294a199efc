//! Landing page hero handlers.

use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::domain::{Actor, HeroSlide, HeroStats, Property};
use crate::errors::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedToggle {
    pub is_featured: bool,
}

pub fn hero_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/slides", get(slides))
        .route("/stats", get(stats))
        .merge(
            Router::new()
                .route("/property/:id/featured", put(toggle_featured))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

#[utoipa::path(
    get,
    path = "/hero/slides",
    tag = "Hero",
    responses(
        (status = 200, description = "Hero slides retrieved successfully", body = [HeroSlide])
    )
)]
pub async fn slides(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<HeroSlide>>> {
    let slides = state.hero_service.slides().await?;
    Ok(ApiResponse::ok("Hero slides retrieved successfully", slides))
}

#[utoipa::path(
    get,
    path = "/hero/stats",
    tag = "Hero",
    responses(
        (status = 200, description = "Hero statistics retrieved successfully", body = HeroStats)
    )
)]
pub async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<HeroStats>> {
    let stats = state.hero_service.stats().await?;
    Ok(ApiResponse::ok("Hero statistics retrieved successfully", stats))
}

#[utoipa::path(
    put,
    path = "/hero/property/{id}/featured",
    tag = "Hero",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property id")),
    request_body = FeaturedToggle,
    responses(
        (status = 200, description = "Featured flag changed", body = Property),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn toggle_featured(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(toggle): Json<FeaturedToggle>,
) -> AppResult<ApiResponse<Property>> {
    actor.require_admin()?;

    let property = state
        .hero_service
        .set_featured(id, toggle.is_featured)
        .await?;
    let message = if toggle.is_featured {
        "Property added to hero slideshow"
    } else {
        "Property removed from hero slideshow"
    };
    Ok(ApiResponse::ok(message, property))
}
