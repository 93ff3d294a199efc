//! Read-through cache of listings, featured listings and hero slides.
//!
//! Each collection is fetched on first read and served from memory after
//! that. Creating, updating or deleting a listing through the store marks
//! every collection stale and refetches the listing set. A failed refetch
//! leaves the set stale for the next read; the mutation result still stands.

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::api::{PropertyApi, PropertyQuery};
use super::error::ClientResult;
use super::filter::{filter_properties, search_properties, PropertyFilter};
use crate::domain::{HeroSlide, PropertyResponse, SlideKind};

#[derive(Debug, Default)]
struct Cached {
    properties: Option<Vec<PropertyResponse>>,
    featured: Option<Vec<PropertyResponse>>,
    hero_slides: Option<Vec<HeroSlide>>,
}

impl Cached {
    fn invalidate(&mut self) {
        *self = Self::default();
    }
}

pub struct PropertyStore<A: PropertyApi> {
    api: A,
    query: PropertyQuery,
    cached: Mutex<Cached>,
}

impl<A: PropertyApi> PropertyStore<A> {
    pub fn new(api: A) -> Self {
        Self::with_query(api, PropertyQuery::default())
    }

    /// Store whose listing set is the result of `query`.
    pub fn with_query(api: A, query: PropertyQuery) -> Self {
        Self {
            api,
            query,
            cached: Mutex::new(Cached::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn properties(&self) -> ClientResult<Vec<PropertyResponse>> {
        let mut cached = self.cached.lock().await;
        if let Some(properties) = &cached.properties {
            return Ok(properties.clone());
        }

        let page = self.api.list_properties(self.query.clone()).await?;
        cached.properties = Some(page.items.clone());
        Ok(page.items)
    }

    pub async fn featured(&self) -> ClientResult<Vec<PropertyResponse>> {
        let mut cached = self.cached.lock().await;
        if let Some(featured) = &cached.featured {
            return Ok(featured.clone());
        }

        let featured = self.api.featured_properties().await?;
        cached.featured = Some(featured.clone());
        Ok(featured)
    }

    /// Hero slides, or a single static slide when they cannot be loaded.
    /// The fallback is not cached, so the next read tries again.
    pub async fn hero_slides(&self) -> Vec<HeroSlide> {
        let mut cached = self.cached.lock().await;
        if let Some(slides) = &cached.hero_slides {
            return slides.clone();
        }

        match self.api.hero_slides().await {
            Ok(slides) => {
                cached.hero_slides = Some(slides.clone());
                slides
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load hero slides, using fallback");
                vec![fallback_slide()]
            }
        }
    }

    /// A listing from the cached set, without a request.
    pub async fn cached_property(&self, id: i32) -> Option<PropertyResponse> {
        let cached = self.cached.lock().await;
        cached
            .properties
            .as_ref()
            .and_then(|all| all.iter().find(|p| p.property.id == id).cloned())
    }

    /// Fresh detail fetch; the server counts it as a view.
    pub async fn fetch_property(&self, id: i32) -> ClientResult<PropertyResponse> {
        self.api.get_property(id).await
    }

    pub async fn create(&self, fields: Map<String, Value>) -> ClientResult<PropertyResponse> {
        let created = self.api.create_property(fields).await?;
        self.reload_after_mutation().await;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        fields: Map<String, Value>,
    ) -> ClientResult<PropertyResponse> {
        let updated = self.api.update_property(id, fields).await?;
        self.reload_after_mutation().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> ClientResult<()> {
        self.api.delete_property(id).await?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Drop every cached collection.
    pub async fn invalidate(&self) {
        self.cached.lock().await.invalidate();
    }

    /// Invalidate, then refetch the listing set.
    pub async fn refresh(&self) -> ClientResult<Vec<PropertyResponse>> {
        self.invalidate().await;
        self.properties().await
    }

    async fn reload_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to reload listings after a change");
        }
    }

    pub async fn search(&self, query: &str) -> ClientResult<Vec<PropertyResponse>> {
        Ok(search_properties(&self.properties().await?, query))
    }

    pub async fn filter(&self, filter: &PropertyFilter) -> ClientResult<Vec<PropertyResponse>> {
        Ok(filter_properties(&self.properties().await?, filter))
    }
}

fn fallback_slide() -> HeroSlide {
    HeroSlide {
        id: "fallback-1".to_string(),
        title: "Find Your Dream Home".to_string(),
        subtitle: Some("Discover amazing properties in prime locations".to_string()),
        description: Some("Discover amazing properties in prime locations".to_string()),
        image: "https://images.unsplash.com/photo-1560518883-ce09059eeffa?ixlib=rb-4.0.3"
            .to_string(),
        price: None,
        location: Some("Various Locations".to_string()),
        link: "/properties".to_string(),
        bullet_points: vec![
            "Premium Locations".to_string(),
            "Best Prices".to_string(),
            "Quality Assured".to_string(),
        ],
        property_id: None,
        kind: SlideKind::Default,
    }
}
