//! JWT authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Actor;
use crate::errors::AppError;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// resolves it to an active user, then injects the [`Actor`] into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let actor = state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

/// The signed-in actor when a valid bearer token is present.
///
/// Never rejects: a missing or invalid token just yields `None`.
#[derive(Debug, Clone)]
pub struct OptionalActor(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.auth_service.authenticate(token).await {
            Ok(actor) => Ok(Self(Some(actor))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable optional token");
                Ok(Self(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
