//! Contact inquiry handlers.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, OptionalActor};
use crate::api::AppState;
use crate::domain::{Actor, Inquiry, InquiryFilter, InquiryStatus, InquiryUpdate, NewInquiry};
use crate::errors::AppResult;
use crate::types::{empty_string_as_none, ApiResponse, Created, Page, PageRequest};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InquiryListParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<InquiryStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_read: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InquiryEnvelope {
    pub inquiry: Inquiry,
}

pub fn inquiry_routes(state: AppState) -> Router<AppState> {
    Router::new().route("/", post(submit_inquiry)).merge(
        Router::new()
            .route("/", get(list_inquiries))
            .route("/:id", put(update_inquiry))
            .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
    )
}

/// Public contact form; a valid bearer token links the inquiry to its sender.
#[utoipa::path(
    post,
    path = "/inquiries",
    tag = "Inquiries",
    request_body = NewInquiry,
    responses(
        (status = 201, description = "Inquiry submitted successfully", body = InquiryEnvelope),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn submit_inquiry(
    State(state): State<AppState>,
    OptionalActor(sender): OptionalActor,
    ValidatedJson(payload): ValidatedJson<NewInquiry>,
) -> AppResult<Created<InquiryEnvelope>> {
    let inquiry = state.inquiry_service.submit(payload, sender).await?;
    Ok(Created::new(
        "Inquiry submitted successfully",
        InquiryEnvelope { inquiry },
    ))
}

#[utoipa::path(
    get,
    path = "/inquiries",
    tag = "Inquiries",
    security(("bearer_auth" = [])),
    params(InquiryListParams),
    responses(
        (status = 200, description = "Inquiries retrieved successfully", body = crate::types::InquiryPage),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<InquiryListParams>,
) -> AppResult<ApiResponse<Page<Inquiry>>> {
    actor.require_admin()?;

    let filter = InquiryFilter {
        status: params.status,
        is_read: params.is_read,
    };
    let inquiries = state
        .inquiry_service
        .list(filter, PageRequest::new(params.page, params.size))
        .await?;
    Ok(ApiResponse::ok("Inquiries retrieved successfully", inquiries))
}

#[utoipa::path(
    put,
    path = "/inquiries/{id}",
    tag = "Inquiries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Inquiry id")),
    request_body = InquiryUpdate,
    responses(
        (status = 200, description = "Inquiry updated successfully", body = InquiryEnvelope),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn update_inquiry(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(changes): Json<InquiryUpdate>,
) -> AppResult<ApiResponse<InquiryEnvelope>> {
    actor.require_admin()?;

    let inquiry = state.inquiry_service.update(id, changes).await?;
    Ok(ApiResponse::ok(
        "Inquiry updated successfully",
        InquiryEnvelope { inquiry },
    ))
}
