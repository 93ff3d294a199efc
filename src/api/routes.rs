//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, hero_routes, inquiry_routes, profile_routes, property_routes, user_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Room for the text fields of a multipart request next to its files.
const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .uploads
        .max_files
        .saturating_mul(state.uploads.max_bytes)
        .saturating_add(FORM_FIELDS_ALLOWANCE);

    Router::new()
        // Health check endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/auth",
            auth_routes().merge(profile_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))),
        )
        .nest("/properties", property_routes(state.clone()))
        .nest("/hero", hero_routes(state.clone()))
        // Protected user routes (require JWT)
        .nest(
            "/users",
            user_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest("/inquiries", inquiry_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(state.http.request_timeout))
        .layer(cors_layer(state.http.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origin, or for any origin when none is set.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS_ORIGIN, allowing any origin");
            CorsLayer::permissive()
        }
    }
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to the Estate API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match state.database.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            false
        }
    };

    let status = if healthy { "healthy" } else { "unhealthy" };
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: ServiceStatus { status },
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
