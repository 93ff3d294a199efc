//! Property service - Listing queries and the ownership-gated lifecycle.
//!
//! Every mutation resolves its target through [`Actor::can_mutate`]; a
//! listing the actor may not touch is reported exactly like a missing one.
//! Image attachment is best-effort: upload failures are logged and never
//! fail the surrounding create or update.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::IMAGE_FOLDER_PROPERTIES;
use crate::domain::{
    Actor, ListingQuery, ListingStatus, NewPropertyImage, Property, PropertyDraft,
    PropertyFilter, PropertyImage, PropertyResponse, SortSpec, StatusPatch, Visibility,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ImageJanitor, ImageStorage, UnitOfWork, UploadedImage};
use crate::types::{Page, PageRequest};
use crate::with_transaction;

/// Property service trait for dependency injection.
#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Approved, available listings matching `filter`.
    async fn list_public(
        &self,
        filter: PropertyFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>>;

    /// One public listing; counts as a view.
    async fn get_public(&self, id: i32) -> AppResult<PropertyResponse>;

    /// Featured public listings with their primary image only.
    async fn featured(&self, limit: u64) -> AppResult<Vec<PropertyResponse>>;

    async fn create(
        &self,
        actor: &Actor,
        draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse>;

    async fn update(
        &self,
        actor: &Actor,
        id: i32,
        draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse>;

    async fn delete(&self, actor: &Actor, id: i32) -> AppResult<()>;

    async fn delete_image(&self, actor: &Actor, property_id: i32, image_id: i32)
        -> AppResult<()>;

    /// Make one image the property's only primary image.
    async fn set_primary_image(
        &self,
        actor: &Actor,
        property_id: i32,
        image_id: i32,
    ) -> AppResult<PropertyImage>;

    /// The actor's own listings regardless of approval or status.
    async fn my_properties(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>>;

    /// Every listing, optionally narrowed by status and approval.
    async fn list_all(
        &self,
        status: Option<ListingStatus>,
        is_approved: Option<bool>,
        sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>>;

    async fn set_status(&self, id: i32, patch: StatusPatch) -> AppResult<Property>;
}

/// Concrete implementation of PropertyService using Unit of Work.
pub struct PropertyManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ImageStorage>,
    janitor: ImageJanitor,
}

fn group_images(images: Vec<PropertyImage>) -> HashMap<i32, Vec<PropertyImage>> {
    let mut grouped: HashMap<i32, Vec<PropertyImage>> = HashMap::new();
    for image in images {
        grouped.entry(image.property_id).or_default().push(image);
    }
    grouped
}

impl<U: UnitOfWork> PropertyManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ImageStorage>, janitor: ImageJanitor) -> Self {
        Self {
            uow,
            storage,
            janitor,
        }
    }

    /// Join listings with their ordered image sets and owner projections.
    async fn with_relations(&self, properties: Vec<Property>) -> AppResult<Vec<PropertyResponse>> {
        let ids: Vec<i32> = properties.iter().map(|p| p.id).collect();
        let mut owner_ids: Vec<i32> = properties.iter().map(|p| p.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let images_repo = self.uow.images();
        let users_repo = self.uow.users();
        let (images, owners) = tokio::try_join!(
            images_repo.for_properties(ids),
            users_repo.summaries(owner_ids),
        )?;

        let mut images = group_images(images);
        let owners: HashMap<i32, _> = owners.into_iter().map(|o| (o.id, o)).collect();

        Ok(properties
            .into_iter()
            .map(|p| {
                let property_images = images.remove(&p.id).unwrap_or_default();
                let user = owners.get(&p.user_id).cloned();
                PropertyResponse::new(p, property_images, user)
            })
            .collect())
    }

    async fn with_images(&self, property: Property) -> AppResult<PropertyResponse> {
        let images = self.uow.images().for_properties(vec![property.id]).await?;
        Ok(PropertyResponse::new(property, images, None))
    }

    async fn page_of(&self, query: ListingQuery) -> AppResult<Page<PropertyResponse>> {
        let page = query.page;
        let (properties, total) = self.uow.properties().list(query).await?;
        let items = self.with_relations(properties).await?;
        Ok(Page::new(items, total, page))
    }

    /// The listing `id`, if `actor` may change it.
    async fn mutable_property(&self, actor: &Actor, id: i32) -> AppResult<Property> {
        self.uow
            .properties()
            .find_by_id(id)
            .await?
            .filter(|p| actor.can_mutate(p.user_id))
            .ok_or_else(|| AppError::not_found_or_denied("Property"))
    }

    /// Upload `files` concurrently and record each stored one after
    /// `existing` images. Returns how many were attached.
    async fn attach_uploads(
        &self,
        property_id: i32,
        files: Vec<UploadedImage>,
        existing: usize,
    ) -> usize {
        if files.is_empty() {
            return 0;
        }

        let uploads = join_all(
            files
                .iter()
                .map(|file| self.storage.upload(file.path(), IMAGE_FOLDER_PROPERTIES)),
        )
        .await;

        let mut attached = 0;
        for (index, (file, result)) in files.iter().zip(uploads).enumerate() {
            let stored = match result {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::error!(
                        property_id,
                        file = %file.file_name,
                        error = %e,
                        "Image upload failed"
                    );
                    continue;
                }
            };

            let image = NewPropertyImage::from_upload(property_id, stored, existing, index);
            match self.uow.images().insert(image).await {
                Ok(_) => attached += 1,
                Err(e) => tracing::error!(property_id, error = %e, "Could not record image"),
            }
        }

        // Local copies are removed when `files` drops here.
        drop(files);
        attached
    }
}

#[async_trait]
impl<U: UnitOfWork> PropertyService for PropertyManager<U> {
    async fn list_public(
        &self,
        filter: PropertyFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        self.page_of(ListingQuery {
            visibility: Visibility::Public,
            filter,
            sort,
            page,
        })
        .await
    }

    async fn get_public(&self, id: i32) -> AppResult<PropertyResponse> {
        if !self.uow.properties().increment_views(id).await? {
            return Err(AppError::not_found("Property"));
        }

        let property = self
            .uow
            .properties()
            .find_public(id)
            .await?
            .ok_or_not_found("Property")?;

        self.with_relations(vec![property])
            .await?
            .pop()
            .ok_or_not_found("Property")
    }

    async fn featured(&self, limit: u64) -> AppResult<Vec<PropertyResponse>> {
        let properties = self.uow.properties().featured(limit).await?;
        let ids = properties.iter().map(|p| p.id).collect();
        let mut images = group_images(self.uow.images().primary_for(ids).await?);

        Ok(properties
            .into_iter()
            .map(|p| {
                let primary = images.remove(&p.id).unwrap_or_default();
                PropertyResponse::new(p, primary, None)
            })
            .collect())
    }

    async fn create(
        &self,
        actor: &Actor,
        mut draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse> {
        if actor.is_admin() {
            draft.is_approved = Some(true);
        } else {
            draft.strip_curation();
        }
        draft.validate_for_create()?;

        let property = self.uow.properties().create(actor.id, draft).await?;
        let attached = self.attach_uploads(property.id, files, 0).await;

        tracing::info!(property_id = property.id, owner_id = actor.id, attached, "Property created");
        self.with_images(property).await
    }

    async fn update(
        &self,
        actor: &Actor,
        id: i32,
        mut draft: PropertyDraft,
        files: Vec<UploadedImage>,
    ) -> AppResult<PropertyResponse> {
        let current = self.mutable_property(actor, id).await?;
        if !actor.is_admin() {
            draft.strip_curation();
        }
        draft.validate_for_update()?;

        let property = if draft.is_empty() {
            current
        } else {
            self.uow
                .properties()
                .update(id, draft)
                .await?
                .ok_or_else(|| AppError::not_found_or_denied("Property"))?
        };

        if !files.is_empty() {
            let existing = self.uow.images().count_for(id).await? as usize;
            let attached = self.attach_uploads(id, files, existing).await;
            tracing::debug!(property_id = id, existing, attached, "Images appended");
        }

        tracing::info!(property_id = id, actor_id = actor.id, "Property updated");
        self.with_images(property).await
    }

    async fn delete(&self, actor: &Actor, id: i32) -> AppResult<()> {
        let property = self.mutable_property(actor, id).await?;

        let public_ids = self
            .uow
            .images()
            .for_properties(vec![property.id])
            .await?
            .into_iter()
            .filter_map(|image| image.public_id)
            .collect();
        let queued = self.janitor.remove_all(public_ids).await;

        if !self.uow.properties().delete(property.id).await? {
            return Err(AppError::not_found_or_denied("Property"));
        }

        tracing::info!(property_id = id, actor_id = actor.id, queued, "Property deleted");
        Ok(())
    }

    async fn delete_image(
        &self,
        actor: &Actor,
        property_id: i32,
        image_id: i32,
    ) -> AppResult<()> {
        self.mutable_property(actor, property_id).await?;

        let image = self
            .uow
            .images()
            .find(property_id, image_id)
            .await?
            .ok_or_not_found("Image")?;

        if let Some(public_id) = image.public_id {
            self.janitor.remove_all(vec![public_id]).await;
        }
        self.uow.images().delete(image.id).await?;

        tracing::info!(property_id, image_id, "Property image deleted");
        Ok(())
    }

    async fn set_primary_image(
        &self,
        actor: &Actor,
        property_id: i32,
        image_id: i32,
    ) -> AppResult<PropertyImage> {
        self.mutable_property(actor, property_id).await?;

        let image = with_transaction!(self.uow, |ctx| {
            ctx.images().set_primary(property_id, image_id).await
        })?;

        tracing::info!(property_id, image_id, "Primary image changed");
        Ok(image)
    }

    async fn my_properties(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        self.page_of(ListingQuery {
            visibility: Visibility::OwnedBy(actor.id),
            filter: PropertyFilter::default(),
            sort: SortSpec::default(),
            page,
        })
        .await
    }

    async fn list_all(
        &self,
        status: Option<ListingStatus>,
        is_approved: Option<bool>,
        sort: SortSpec,
        page: PageRequest,
    ) -> AppResult<Page<PropertyResponse>> {
        self.page_of(ListingQuery {
            visibility: Visibility::All { status, is_approved },
            filter: PropertyFilter::default(),
            sort,
            page,
        })
        .await
    }

    async fn set_status(&self, id: i32, patch: StatusPatch) -> AppResult<Property> {
        let property = self
            .uow
            .properties()
            .update_status(id, patch)
            .await?
            .ok_or_not_found("Property")?;

        tracing::info!(
            property_id = id,
            status = %property.status,
            is_approved = property.is_approved,
            "Property status updated"
        );
        Ok(property)
    }
}
