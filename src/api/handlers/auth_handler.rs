//! Authentication handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, RegisterUser, UpdateProfile, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::AuthPayload;
use crate::types::{ApiResponse, Created};

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters long"))]
    pub new_password: String,
}

/// Wrapper for endpoints that return a single user.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Routes that need no token.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
        .route("/logout", post(logout))
}

/// Routes behind the auth middleware.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/change-password", put(change_password))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered successfully", body = AuthPayload),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> AppResult<Created<AuthPayload>> {
    let payload = state.auth_service.register(payload).await?;
    Ok(Created::new("User registered successfully", payload))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or deactivated account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let payload = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;
    Ok(ApiResponse::ok("Login successful", payload))
}

/// Login restricted to admin accounts
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin login successful", body = AuthPayload),
        (status = 401, description = "Invalid admin credentials or deactivated account")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let payload = state
        .auth_service
        .admin_login(payload.email, payload.password)
        .await?;
    Ok(ApiResponse::ok("Admin login successful", payload))
}

/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Logout successful"))
)]
pub async fn logout() -> ApiResponse<()> {
    ApiResponse::message("Logout successful")
}

#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserEnvelope),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<ApiResponse<UserEnvelope>> {
    let user = state.auth_service.profile(&actor).await?;
    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        UserEnvelope { user },
    ))
}

#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated successfully", body = UserEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateProfile>, JsonRejection>,
) -> AppResult<ApiResponse<UserEnvelope>> {
    let Json(payload) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    // Blank values mean "keep", so they are dropped before validation.
    let changes = payload.without_blanks();
    changes.validate()?;

    let user = state.auth_service.update_profile(&actor, changes).await?;
    Ok(ApiResponse::ok(
        "Profile updated successfully",
        UserEnvelope { user },
    ))
}

#[utoipa::path(
    put,
    path = "/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .change_password(&actor, payload.current_password, payload.new_password)
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}
