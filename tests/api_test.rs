//! Integration tests for API endpoints.
//!
//! The router runs against hand-written service fakes and a disconnected
//! database handle, so no Postgres or image host is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use estate_api::api::{create_router, AppState, HttpSettings, UploadSettings};
use estate_api::config::Config;
use estate_api::domain::{
    Actor, Amenity, HeroSlide, HeroStats, Inquiry, InquiryFilter, InquiryStatus, InquiryUpdate,
    ListingStatus, ListingType, NewInquiry, Property, PropertyDraft, PropertyFilter,
    PropertyImage, PropertyResponse, RegisterUser, SlideKind, SortSpec, StatusPatch,
    UpdateProfile, UserFilter, UserResponse, UserRole, UserWithProperties,
};
use estate_api::errors::{AppError, AppResult};
use estate_api::infra::{Database, UploadedImage};
use estate_api::services::{
    AdminStats, AuthPayload, AuthService, Claims, HeroService, InquiryService, PropertyService,
    UserService, UserStats,
};
use estate_api::types::{Page, PageRequest};

mod common;
use common::sample_property;

const MEMBER_TOKEN: &str = "member-token";
const ADMIN_TOKEN: &str = "admin-token";

fn unused<T>() -> AppResult<T> {
    Err(AppError::internal("not used by this test"))
}

// =============================================================================
// Service fakes
// =============================================================================

/// Resolves the two fixed tokens; everything else is unauthorized.
struct FakeAuth;

#[async_trait]
impl AuthService for FakeAuth {
    async fn register(&self, _input: RegisterUser) -> AppResult<AuthPayload> {
        unused()
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<AuthPayload> {
        Err(AppError::InvalidCredentials(
            "Invalid email or password".to_string(),
        ))
    }

    async fn admin_login(&self, _email: String, _password: String) -> AppResult<AuthPayload> {
        unused()
    }

    async fn profile(&self, _actor: &Actor) -> AppResult<UserResponse> {
        unused()
    }

    async fn update_profile(
        &self,
        _actor: &Actor,
        _changes: UpdateProfile,
    ) -> AppResult<UserResponse> {
        unused()
    }

    async fn change_password(
        &self,
        _actor: &Actor,
        _current_password: String,
        _new_password: String,
    ) -> AppResult<()> {
        unused()
    }

    fn verify_token(&self, _token: &str) -> AppResult<Claims> {
        Err(AppError::Unauthorized)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Actor> {
        match token {
            MEMBER_TOKEN => Ok(Actor::new(7, "member@example.com", UserRole::User)),
            ADMIN_TOKEN => Ok(Actor::new(1, "admin@example.com", UserRole::Admin)),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Records the last public listing request and the last submitted draft
/// with the names and types of its uploaded files.
#[derive(Default)]
struct FakeProperties {
    last_list: Mutex<Option<(PropertyFilter, SortSpec, PageRequest)>>,
    last_draft: Mutex<Option<PropertyDraft>>,
    last_files: Mutex<Vec<(String, String)>>,
}

impl FakeProperties {
    fn record(&self, draft: PropertyDraft, files: &[UploadedImage]) {
        *self.last_draft.lock().unwrap() = Some(draft);
        *self.last_files.lock().unwrap() = files
            .iter()
            .map(|f| (f.file_name.clone(), f.content_type.clone()))
            .collect();
    }
}

#[async_trait]
impl PropertyService for FakeProperties {
    async fn list_public(
        &self,
        filter: PropertyFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        *self.last_list.lock().unwrap() = Some((filter, sort, page));
        let item = PropertyResponse::new(sample_property(1, "Sunny flat"), Vec::new(), None);
        Ok(Page::new(vec![item], 1, page))
    }

    async fn get_public(&self, id: i32) -> AppResult<PropertyResponse> {
        if id == 1 {
            Ok(PropertyResponse::new(
                sample_property(1, "Sunny flat"),
                Vec::new(),
                None,
            ))
        } else {
            Err(AppError::not_found("Property"))
        }
    }

    async fn featured(&self, _limit: u64) -> AppResult<Vec<PropertyResponse>> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        actor: &Actor,
        draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse> {
        let mut property = sample_property(42, draft.title.as_deref().unwrap_or_default());
        property.user_id = actor.id;
        self.record(draft, &files);
        Ok(PropertyResponse::new(property, Vec::new(), None))
    }

    async fn update(
        &self,
        _actor: &Actor,
        id: i32,
        draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse> {
        let property = sample_property(id, draft.title.as_deref().unwrap_or("Sunny flat"));
        self.record(draft, &files);
        Ok(PropertyResponse::new(property, Vec::new(), None))
    }

    async fn delete(&self, _actor: &Actor, _id: i32) -> AppResult<()> {
        unused()
    }

    async fn delete_image(
        &self,
        _actor: &Actor,
        _property_id: i32,
        _image_id: i32,
    ) -> AppResult<()> {
        unused()
    }

    async fn set_primary_image(
        &self,
        _actor: &Actor,
        _property_id: i32,
        _image_id: i32,
    ) -> AppResult<PropertyImage> {
        unused()
    }

    async fn my_properties(
        &self,
        _actor: &Actor,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        Ok(Page::new(Vec::new(), 0, page))
    }

    async fn list_all(
        &self,
        _status: Option<ListingStatus>,
        _is_approved: Option<bool>,
        _sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        Ok(Page::new(Vec::new(), 0, page))
    }

    async fn set_status(&self, _id: i32, _patch: StatusPatch) -> AppResult<Property> {
        unused()
    }
}

struct FakeUsers;

#[async_trait]
impl UserService for FakeUsers {
    async fn list_users(
        &self,
        _filter: UserFilter,
        _page: PageRequest,
    ) -> AppResult<Page<UserWithProperties>> {
        unused()
    }

    async fn get_user(&self, _id: i32) -> AppResult<UserWithProperties> {
        unused()
    }

    async fn set_active(&self, _id: i32, _is_active: bool) -> AppResult<UserResponse> {
        unused()
    }

    async fn delete_user(&self, _actor: &Actor, _id: i32) -> AppResult<()> {
        Ok(())
    }

    async fn user_stats(&self, _actor: &Actor) -> AppResult<UserStats> {
        Ok(UserStats::default())
    }

    async fn admin_stats(&self) -> AppResult<AdminStats> {
        unused()
    }
}

struct FakeHero;

#[async_trait]
impl HeroService for FakeHero {
    async fn slides(&self) -> AppResult<Vec<HeroSlide>> {
        Ok(vec![HeroSlide {
            id: "property-1".to_string(),
            title: "Sunny flat".to_string(),
            subtitle: None,
            description: None,
            image: "https://img.example.com/1.jpg".to_string(),
            price: Some("₹45,00,000".to_string()),
            location: Some("Baner".to_string()),
            link: "/property/1".to_string(),
            bullet_points: Vec::new(),
            property_id: Some(1),
            kind: SlideKind::Property,
        }])
    }

    async fn stats(&self) -> AppResult<HeroStats> {
        unused()
    }

    async fn set_featured(&self, _property_id: i32, _is_featured: bool) -> AppResult<Property> {
        unused()
    }
}

struct FakeInquiries;

#[async_trait]
impl InquiryService for FakeInquiries {
    async fn submit(&self, inquiry: NewInquiry, sender: Option<Actor>) -> AppResult<Inquiry> {
        let now = Utc::now();
        Ok(Inquiry {
            id: 3,
            name: inquiry.name,
            email: inquiry.email,
            phone: inquiry.phone,
            message: inquiry.message,
            inquiry_type: inquiry.inquiry_type,
            status: InquiryStatus::New,
            is_read: false,
            property_id: inquiry.property_id,
            user_id: sender.map(|actor| actor.id),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(&self, _filter: InquiryFilter, page: PageRequest) -> AppResult<Page<Inquiry>> {
        Ok(Page::new(Vec::new(), 0, page))
    }

    async fn update(&self, _id: i32, _changes: InquiryUpdate) -> AppResult<Inquiry> {
        unused()
    }
}

// =============================================================================
// Harness
// =============================================================================

fn test_app(properties: Arc<FakeProperties>) -> Router {
    let config = Config::with_secret("test-secret-key-for-testing-only-32chars");
    test_app_with_uploads(properties, UploadSettings::from(&config))
}

fn test_app_with_uploads(properties: Arc<FakeProperties>, uploads: UploadSettings) -> Router {
    let config = Config::with_secret("test-secret-key-for-testing-only-32chars");
    let state = AppState {
        auth_service: Arc::new(FakeAuth),
        user_service: Arc::new(FakeUsers),
        property_service: properties,
        hero_service: Arc::new(FakeHero),
        inquiry_service: Arc::new(FakeInquiries),
        database: Arc::new(Database::from_connection(DatabaseConnection::Disconnected)),
        uploads,
        http: HttpSettings::from(&config),
    };
    create_router(state)
}

fn app() -> Router {
    test_app(Arc::new(FakeProperties::default()))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "estate-test-boundary";

/// One part of a `multipart/form-data` body.
enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn image<'a>(file_name: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "images",
        file_name,
        content_type: "image/jpeg",
        bytes,
    }
}

fn multipart_request(method: Method, uri: &str, token: &str, parts: &[Part]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_root_returns_welcome_text() {
    let response = app()
        .oneshot(request(Method::GET, "/", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Welcome to the Estate API");
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let (status, body) = send(app(), request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_unknown_sort_column_is_rejected() {
    let (status, body) = send(
        app(),
        request(Method::GET, "/properties?sortBy=password", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_listing_query_clamps_size_and_ignores_blank_filters() {
    let properties = Arc::new(FakeProperties::default());
    let (status, body) = send(
        test_app(properties.clone()),
        request(
            Method::GET,
            "/properties?type=rent&minPrice=&size=500&page=2",
            None,
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalItems"], 1);

    let (filter, sort, page) = properties.last_list.lock().unwrap().clone().unwrap();
    assert_eq!(filter.kind, Some(ListingType::Rent));
    assert_eq!(filter.min_price, None);
    assert_eq!(sort, SortSpec::default());
    assert_eq!(page, PageRequest { page: 2, size: 100 });
}

#[tokio::test]
async fn test_missing_property_is_not_found() {
    let (status, body) = send(app(), request(Method::GET, "/properties/99", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Property not found");
}

#[tokio::test]
async fn test_get_property_wraps_listing() {
    let (status, body) = send(app(), request(Method::GET, "/properties/1", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["property"]["title"], "Sunny flat");
    assert_eq!(body["data"]["property"]["type"], "buy");
    assert_eq!(body["data"]["property"]["price"], "4500000");
}

#[tokio::test]
async fn test_create_requires_token() {
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/properties",
            None,
            Some(json!({ "title": "Sunny flat" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_from_json_body() {
    let properties = Arc::new(FakeProperties::default());
    let (status, body) = send(
        test_app(properties.clone()),
        request(
            Method::POST,
            "/properties",
            Some(MEMBER_TOKEN),
            Some(json!({
                "title": "Sunny flat in Baner",
                "type": "buy",
                "price": "4500000",
                "location": "Baner",
                "bedrooms": "2"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Property created successfully");
    assert_eq!(body["data"]["property"]["userId"], 7);

    let draft = properties.last_draft.lock().unwrap().clone().unwrap();
    assert_eq!(draft.title.as_deref(), Some("Sunny flat in Baner"));
    assert_eq!(draft.price, Some(Decimal::new(4_500_000, 0)));
    assert_eq!(draft.bedrooms, Some(2));
}

#[tokio::test]
async fn test_create_from_multipart_form() {
    let properties = Arc::new(FakeProperties::default());
    let (status, body) = send(
        test_app(properties.clone()),
        multipart_request(
            Method::POST,
            "/properties",
            MEMBER_TOKEN,
            &[
                Part::Text("title", "Garden villa"),
                Part::Text("type", "rent"),
                Part::Text("price", "35000"),
                Part::Text("location", "Aundh"),
                Part::Text("bedrooms", "3"),
                Part::Text("gym", "true"),
                image("front.jpg", b"\xff\xd8\xff\xe0jpeg"),
                image("blank.jpg", b""),
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["property"]["title"], "Garden villa");

    let draft = properties.last_draft.lock().unwrap().clone().unwrap();
    assert_eq!(draft.kind, Some(ListingType::Rent));
    assert_eq!(draft.price, Some(Decimal::new(35_000, 0)));
    assert_eq!(draft.bedrooms, Some(3));
    assert_eq!(draft.amenities, vec![(Amenity::Gym, true)]);

    let files = properties.last_files.lock().unwrap().clone();
    assert_eq!(
        files,
        vec![("front.jpg".to_string(), "image/jpeg".to_string())]
    );
}

#[tokio::test]
async fn test_update_from_multipart_form() {
    let properties = Arc::new(FakeProperties::default());
    let (status, body) = send(
        test_app(properties.clone()),
        multipart_request(
            Method::PUT,
            "/properties/5",
            MEMBER_TOKEN,
            &[Part::Text("title", "Renamed villa")],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["property"]["id"], 5);

    let draft = properties.last_draft.lock().unwrap().clone().unwrap();
    assert_eq!(draft.title.as_deref(), Some("Renamed villa"));
    assert_eq!(draft.price, None);
    assert!(properties.last_files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_multipart_rejects_non_image_upload() {
    let (status, body) = send(
        app(),
        multipart_request(
            Method::POST,
            "/properties",
            MEMBER_TOKEN,
            &[
                Part::Text("title", "Garden villa"),
                Part::File {
                    name: "images",
                    file_name: "brochure.pdf",
                    content_type: "application/pdf",
                    bytes: b"%PDF-1.7",
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Only image files are allowed"));
}

#[tokio::test]
async fn test_multipart_rejects_unknown_file_field() {
    let (status, body) = send(
        app(),
        multipart_request(
            Method::POST,
            "/properties",
            MEMBER_TOKEN,
            &[Part::File {
                name: "avatar",
                file_name: "me.jpg",
                content_type: "image/jpeg",
                bytes: b"jpeg",
            }],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("avatar"));
}

#[tokio::test]
async fn test_multipart_enforces_upload_limits() {
    let limits = || UploadSettings {
        dir: std::env::temp_dir(),
        max_files: 1,
        max_bytes: 8,
    };

    let (status, body) = send(
        test_app_with_uploads(Arc::new(FakeProperties::default()), limits()),
        multipart_request(
            Method::POST,
            "/properties",
            MEMBER_TOKEN,
            &[image("one.jpg", b"jpeg"), image("two.jpg", b"jpeg")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("At most 1 images"));

    let (status, body) = send(
        test_app_with_uploads(Arc::new(FakeProperties::default()), limits()),
        multipart_request(
            Method::POST,
            "/properties",
            MEMBER_TOKEN,
            &[image("large.jpg", b"0123456789")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("large.jpg"));
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let (status, _) = send(
        app(),
        request(
            Method::POST,
            "/properties",
            Some(MEMBER_TOKEN),
            Some(json!(["not", "an", "object"])),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_listing_requires_admin_role() {
    let (status, _) = send(
        app(),
        request(Method::GET, "/properties/admin/all", Some(MEMBER_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app(),
        request(Method::GET, "/properties/admin/all", Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalItems"], 0);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (status, _) = send(
        app(),
        request(
            Method::GET,
            "/properties/user/my-properties",
            Some("forged"),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_status_patch_is_rejected() {
    let (status, body) = send(
        app(),
        request(
            Method::PUT,
            "/properties/1/status",
            Some(ADMIN_TOKEN),
            Some(json!({})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Nothing to update");
}

#[tokio::test]
async fn test_member_cannot_delete_users() {
    let (status, _) = send(
        app(),
        request(Method::DELETE, "/users/2", Some(MEMBER_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app(),
        request(Method::DELETE, "/users/2", Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
}

#[tokio::test]
async fn test_inquiry_email_is_validated() {
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/inquiries",
            None,
            Some(json!({ "name": "Ravi", "email": "not-an-email" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_inquiry_links_signed_in_sender() {
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/inquiries",
            Some(MEMBER_TOKEN),
            Some(json!({ "name": "Ravi", "email": "ravi@example.com", "propertyId": 1 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["inquiry"]["userId"], 7);
    assert_eq!(body["data"]["inquiry"]["inquiryType"], "general");
}

#[tokio::test]
async fn test_inquiry_with_bad_token_stays_anonymous() {
    let (status, body) = send(
        app(),
        request(
            Method::POST,
            "/inquiries",
            Some("forged"),
            Some(json!({ "name": "Ravi", "email": "ravi@example.com" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["inquiry"]["userId"].is_null());
}

#[tokio::test]
async fn test_hero_slides_are_public() {
    let (status, body) = send(app(), request(Method::GET, "/hero/slides", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["type"], "property");
    assert_eq!(body["data"][0]["propertyId"], 1);
}
