//! User administration handlers.
//!
//! Everything here runs behind the auth middleware; all routes except
//! `/users/stats` additionally require the admin role.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::handlers::auth_handler::UserEnvelope;
use crate::api::AppState;
use crate::domain::{Actor, UserFilter, UserRole, UserWithProperties};
use crate::errors::AppResult;
use crate::services::{AdminStats, UserStats};
use crate::types::{empty_string_as_none, ApiResponse, Page, PageRequest};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    /// Substring of name or email
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailEnvelope {
    pub user: UserWithProperties,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsEnvelope {
    pub stats: UserStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatsEnvelope {
    pub stats: AdminStats,
}

/// Create user routes (mounted behind auth middleware)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/stats", get(user_stats))
        .route("/admin/stats", get(admin_stats))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/status", put(update_user_status))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(UserListParams),
    responses(
        (status = 200, description = "Users retrieved successfully", body = crate::types::UserPage),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<UserListParams>,
) -> AppResult<ApiResponse<Page<UserWithProperties>>> {
    actor.require_admin()?;

    let filter = UserFilter {
        search: params.search,
        role: params.role,
    };
    let users = state
        .user_service
        .list_users(filter, PageRequest::new(params.page, params.size))
        .await?;
    Ok(ApiResponse::ok("Users retrieved successfully", users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserDetailEnvelope),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<UserDetailEnvelope>> {
    actor.require_admin()?;

    let user = state.user_service.get_user(id).await?;
    Ok(ApiResponse::ok(
        "User retrieved successfully",
        UserDetailEnvelope { user },
    ))
}

#[utoipa::path(
    put,
    path = "/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "User activated or deactivated", body = UserEnvelope),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(payload): Json<UserStatusRequest>,
) -> AppResult<ApiResponse<UserEnvelope>> {
    actor.require_admin()?;

    let user = state
        .user_service
        .set_active(id, payload.is_active)
        .await?;
    let message = if payload.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(ApiResponse::ok(message, UserEnvelope { user }))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    actor.require_admin()?;

    state.user_service.delete_user(&actor, id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/users/stats",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User statistics retrieved successfully", body = UserStatsEnvelope)
    )
)]
pub async fn user_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<ApiResponse<UserStatsEnvelope>> {
    let stats = state.user_service.user_stats(&actor).await?;
    Ok(ApiResponse::ok(
        "User statistics retrieved successfully",
        UserStatsEnvelope { stats },
    ))
}

#[utoipa::path(
    get,
    path = "/users/admin/stats",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin statistics retrieved successfully", body = AdminStatsEnvelope),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn admin_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<ApiResponse<AdminStatsEnvelope>> {
    actor.require_admin()?;

    let stats = state.user_service.admin_stats().await?;
    Ok(ApiResponse::ok(
        "Admin statistics retrieved successfully",
        AdminStatsEnvelope { stats },
    ))
}
