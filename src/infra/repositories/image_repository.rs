//! Property image repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entities::property_image::{ActiveModel, Column, Entity as ImageEntity};
use crate::domain::{NewPropertyImage, PropertyImage};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Image sets of the given properties, each in display order.
    async fn for_properties(&self, property_ids: Vec<i32>) -> AppResult<Vec<PropertyImage>>;

    /// Only the primary-flagged images of the given properties.
    async fn primary_for(&self, property_ids: Vec<i32>) -> AppResult<Vec<PropertyImage>>;

    async fn count_for(&self, property_id: i32) -> AppResult<u64>;

    async fn insert(&self, image: NewPropertyImage) -> AppResult<PropertyImage>;

    /// The image, if it belongs to `property_id`.
    async fn find(&self, property_id: i32, image_id: i32) -> AppResult<Option<PropertyImage>>;

    async fn delete(&self, image_id: i32) -> AppResult<bool>;
}

pub struct ImageStore {
    db: DatabaseConnection,
}

impl ImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Display order: per property by `order`, then by insertion.
fn display_order(select: Select<ImageEntity>) -> Select<ImageEntity> {
    select
        .order_by_asc(Column::PropertyId)
        .order_by_asc(Column::Order)
        .order_by_asc(Column::Id)
}

#[async_trait]
impl ImageRepository for ImageStore {
    async fn for_properties(&self, property_ids: Vec<i32>) -> AppResult<Vec<PropertyImage>> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = display_order(ImageEntity::find().filter(Column::PropertyId.is_in(property_ids)))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(PropertyImage::from).collect())
    }

    async fn primary_for(&self, property_ids: Vec<i32>) -> AppResult<Vec<PropertyImage>> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let select = ImageEntity::find()
            .filter(Column::PropertyId.is_in(property_ids))
            .filter(Column::IsPrimary.eq(true));
        let models = display_order(select).all(&self.db).await?;
        Ok(models.into_iter().map(PropertyImage::from).collect())
    }

    async fn count_for(&self, property_id: i32) -> AppResult<u64> {
        Ok(ImageEntity::find()
            .filter(Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?)
    }

    async fn insert(&self, image: NewPropertyImage) -> AppResult<PropertyImage> {
        let now = Utc::now();
        let active = ActiveModel {
            property_id: Set(image.property_id),
            url: Set(image.url),
            public_id: Set(image.public_id),
            caption: Set(None),
            is_primary: Set(image.is_primary),
            order: Set(image.order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(PropertyImage::from(active.insert(&self.db).await?))
    }

    async fn find(&self, property_id: i32, image_id: i32) -> AppResult<Option<PropertyImage>> {
        let model = ImageEntity::find_by_id(image_id)
            .filter(Column::PropertyId.eq(property_id))
            .one(&self.db)
            .await?;
        Ok(model.map(PropertyImage::from))
    }

    async fn delete(&self, image_id: i32) -> AppResult<bool> {
        let result = ImageEntity::delete_by_id(image_id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
