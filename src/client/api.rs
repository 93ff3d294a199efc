//! Typed HTTP client for the listing API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ClientError, ClientResult};
use crate::domain::{HeroSlide, ListingType, PropertyCategory, PropertyResponse, UserResponse};
use crate::types::Page;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Query of `GET /properties`. Unset fields are left out of the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ListingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Listing endpoints used by [`PropertyStore`](super::PropertyStore).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn list_properties(&self, query: PropertyQuery) -> ClientResult<Page<PropertyResponse>>;

    async fn featured_properties(&self) -> ClientResult<Vec<PropertyResponse>>;

    async fn hero_slides(&self) -> ClientResult<Vec<HeroSlide>>;

    async fn get_property(&self, id: i32) -> ClientResult<PropertyResponse>;

    /// Create a listing from JSON fields, as accepted by `POST /properties`.
    async fn create_property(&self, fields: Map<String, Value>) -> ClientResult<PropertyResponse>;

    async fn update_property(
        &self,
        id: i32,
        fields: Map<String, Value>,
    ) -> ClientResult<PropertyResponse>;

    async fn delete_property(&self, id: i32) -> ClientResult<()>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct PropertyEnvelope {
    property: PropertyResponse,
}

#[derive(Deserialize)]
struct FeaturedEnvelope {
    properties: Vec<PropertyResponse>,
}

#[derive(Deserialize)]
struct AuthEnvelope {
    user: UserResponse,
    token: String,
}

/// reqwest client bound to one API base URL, optionally with a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sign in and keep the issued token for later requests.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<UserResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        let auth: AuthEnvelope = self
            .send(self.http.post(self.url("/auth/login")).json(&body))
            .await?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    /// Forget the stored token.
    pub fn logout(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorized(request).send().await?;
        let envelope: Envelope<T> = checked(response).await?.json().await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = self.authorized(request).send().await?;
        let envelope: Envelope<Value> = checked(response).await?.json().await?;
        tracing::debug!(message = %envelope.message, "Request completed");
        Ok(())
    }
}

/// Turn an error status into [`ClientError::Api`] with the server's message.
async fn checked(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<Envelope<Value>>().await {
        Ok(envelope) if !envelope.message.is_empty() => envelope.message,
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}

#[async_trait]
impl PropertyApi for ApiClient {
    async fn list_properties(&self, query: PropertyQuery) -> ClientResult<Page<PropertyResponse>> {
        self.send(self.http.get(self.url("/properties")).query(&query))
            .await
    }

    async fn featured_properties(&self) -> ClientResult<Vec<PropertyResponse>> {
        let featured: FeaturedEnvelope = self
            .send(self.http.get(self.url("/properties/featured")))
            .await?;
        Ok(featured.properties)
    }

    async fn hero_slides(&self) -> ClientResult<Vec<HeroSlide>> {
        self.send(self.http.get(self.url("/hero/slides"))).await
    }

    async fn get_property(&self, id: i32) -> ClientResult<PropertyResponse> {
        let found: PropertyEnvelope = self
            .send(self.http.get(self.url(&format!("/properties/{}", id))))
            .await?;
        Ok(found.property)
    }

    async fn create_property(&self, fields: Map<String, Value>) -> ClientResult<PropertyResponse> {
        let created: PropertyEnvelope = self
            .send(self.http.post(self.url("/properties")).json(&fields))
            .await?;
        Ok(created.property)
    }

    async fn update_property(
        &self,
        id: i32,
        fields: Map<String, Value>,
    ) -> ClientResult<PropertyResponse> {
        let updated: PropertyEnvelope = self
            .send(
                self.http
                    .put(self.url(&format!("/properties/{}", id)))
                    .json(&fields),
            )
            .await?;
        Ok(updated.property)
    }

    async fn delete_property(&self, id: i32) -> ClientResult<()> {
        self.send_empty(self.http.delete(self.url(&format!("/properties/{}", id))))
            .await
    }
}
