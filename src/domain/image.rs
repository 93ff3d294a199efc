//! Images attached to a listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One hosted image of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyImage {
    pub id: i32,
    pub property_id: i32,
    pub url: String,
    /// Remote-storage identifier, used to delete the hosted blob.
    #[serde(skip_serializing, default)]
    pub public_id: Option<String>,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Row to insert after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPropertyImage {
    pub property_id: i32,
    pub url: String,
    pub public_id: Option<String>,
    pub is_primary: bool,
    pub order: i32,
}

impl NewPropertyImage {
    /// Position `index` of an upload batch appended after `existing` images.
    /// Only the first file of a property's first batch becomes primary.
    pub fn from_upload(property_id: i32, stored: StoredImage, existing: usize, index: usize) -> Self {
        Self {
            property_id,
            url: stored.url,
            public_id: Some(stored.public_id),
            is_primary: existing == 0 && index == 0,
            order: (existing + index) as i32,
        }
    }
}

/// What the remote image host returns for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredImage {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}
