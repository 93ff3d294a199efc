//! Client state layer tests against an in-memory listing backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use estate_api::client::{
    ClientError, ClientResult, PropertyApi, PropertyFilter, PropertyQuery, PropertyStore,
};
use estate_api::domain::{HeroSlide, ListingType, PropertyResponse};
use estate_api::types::{Page, PageRequest};

mod common;
use common::sample_property;

/// Listing backend that counts list fetches and applies mutations in memory.
struct InMemoryApi {
    listings: Mutex<Vec<PropertyResponse>>,
    list_calls: AtomicUsize,
    featured_calls: AtomicUsize,
}

impl InMemoryApi {
    fn new(listings: Vec<PropertyResponse>) -> Self {
        Self {
            listings: Mutex::new(listings),
            list_calls: AtomicUsize::new(0),
            featured_calls: AtomicUsize::new(0),
        }
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Property not found or access denied".to_string(),
        }
    }
}

#[async_trait]
impl PropertyApi for InMemoryApi {
    async fn list_properties(&self, query: PropertyQuery) -> ClientResult<Page<PropertyResponse>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let items = self.listings.lock().unwrap().clone();
        let total = items.len() as u64;
        Ok(Page::new(items, total, PageRequest::new(query.page, query.size)))
    }

    async fn featured_properties(&self) -> ClientResult<Vec<PropertyResponse>> {
        self.featured_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.property.is_featured)
            .cloned()
            .collect())
    }

    async fn hero_slides(&self) -> ClientResult<Vec<HeroSlide>> {
        Err(ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
        })
    }

    async fn get_property(&self, id: i32) -> ClientResult<PropertyResponse> {
        self.listings
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.property.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_property(&self, fields: Map<String, Value>) -> ClientResult<PropertyResponse> {
        let mut listings = self.listings.lock().unwrap();
        let id = listings.iter().map(|p| p.property.id).max().unwrap_or(0) + 1;
        let title = fields
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled");
        let created = listing(id, title, "Baner", Decimal::new(1_000_000, 0));
        listings.push(created.clone());
        Ok(created)
    }

    async fn update_property(
        &self,
        id: i32,
        fields: Map<String, Value>,
    ) -> ClientResult<PropertyResponse> {
        let mut listings = self.listings.lock().unwrap();
        let target = listings
            .iter_mut()
            .find(|p| p.property.id == id)
            .ok_or_else(Self::not_found)?;
        if let Some(title) = fields.get("title").and_then(Value::as_str) {
            target.property.title = title.to_string();
        }
        Ok(target.clone())
    }

    async fn delete_property(&self, id: i32) -> ClientResult<()> {
        let mut listings = self.listings.lock().unwrap();
        let before = listings.len();
        listings.retain(|p| p.property.id != id);
        if listings.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

fn listing(id: i32, title: &str, location: &str, price: Decimal) -> PropertyResponse {
    let mut property = sample_property(id, title);
    property.location = location.to_string();
    property.price = price;
    PropertyResponse::new(property, Vec::new(), None)
}

fn seeded_store() -> PropertyStore<InMemoryApi> {
    let mut rental = listing(2, "Cosy studio", "Kothrud", Decimal::new(18_000, 0));
    rental.property.kind = ListingType::Rent;
    rental.property.bedrooms = Some(1);
    rental.property.is_featured = true;

    PropertyStore::new(InMemoryApi::new(vec![
        listing(1, "Sunny flat", "Baner", Decimal::new(4_500_000, 0)),
        rental,
        listing(3, "Riverside villa", "Aundh", Decimal::new(22_000_000, 0)),
    ]))
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[tokio::test]
async fn test_listings_are_read_through_once() {
    let store = seeded_store();

    assert_eq!(store.properties().await.unwrap().len(), 3);
    assert_eq!(store.properties().await.unwrap().len(), 3);
    assert_eq!(store.api().list_calls(), 1);

    let cached = store.cached_property(2).await.unwrap();
    assert_eq!(cached.property.title, "Cosy studio");
    assert_eq!(store.api().list_calls(), 1);
}

#[tokio::test]
async fn test_cached_property_is_none_before_first_load() {
    let store = seeded_store();

    assert!(store.cached_property(1).await.is_none());
    assert_eq!(store.api().list_calls(), 0);
}

#[tokio::test]
async fn test_create_refetches_listing_set() {
    let store = seeded_store();
    store.properties().await.unwrap();

    let created = store
        .create(fields(json!({ "title": "New penthouse" })))
        .await
        .unwrap();

    assert_eq!(created.property.id, 4);
    assert_eq!(store.api().list_calls(), 2);
    assert!(store.cached_property(4).await.is_some());
}

#[tokio::test]
async fn test_update_and_delete_refresh_cache() {
    let store = seeded_store();
    store.properties().await.unwrap();

    store
        .update(1, fields(json!({ "title": "Sunny corner flat" })))
        .await
        .unwrap();
    let updated = store.cached_property(1).await.unwrap();
    assert_eq!(updated.property.title, "Sunny corner flat");

    store.delete(3).await.unwrap();
    assert!(store.cached_property(3).await.is_none());
    assert_eq!(store.api().list_calls(), 3);
}

#[tokio::test]
async fn test_failed_mutation_keeps_cache() {
    let store = seeded_store();
    store.properties().await.unwrap();

    let err = store.delete(99).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(store.api().list_calls(), 1);
    assert_eq!(store.properties().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_featured_is_cached_until_invalidated() {
    let store = seeded_store();

    let featured = store.featured().await.unwrap();
    assert_eq!(featured.len(), 1);
    store.featured().await.unwrap();
    assert_eq!(store.api().featured_calls.load(Ordering::SeqCst), 1);

    store.invalidate().await;
    store.featured().await.unwrap();
    assert_eq!(store.api().featured_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_search_and_filter_use_cached_listings() {
    let store = seeded_store();

    let found = store.search("RIVER").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].property.id, 3);

    assert_eq!(store.search("   ").await.unwrap().len(), 3);

    let filter = PropertyFilter {
        kind: Some(ListingType::Buy),
        max_price: Some(Decimal::new(5_000_000, 0)),
        ..Default::default()
    };
    let matched = store.filter(&filter).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].property.id, 1);

    assert_eq!(store.api().list_calls(), 1);
}

#[tokio::test]
async fn test_hero_slides_fall_back_on_error() {
    let store = seeded_store();

    let slides = store.hero_slides().await;
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].id, "fallback-1");
    assert!(slides[0].price.is_none());
}

#[tokio::test]
async fn test_fetch_property_bypasses_cache() {
    let store = seeded_store();

    let detail = store.fetch_property(3).await.unwrap();
    assert_eq!(detail.property.title, "Riverside villa");
    assert_eq!(store.api().list_calls(), 0);

    let err = store.fetch_property(99).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
