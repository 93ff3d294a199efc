//! Property payload extractor for multipart and JSON submissions.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::api::state::UploadSettings;
use crate::api::AppState;
use crate::config::UPLOAD_FIELD_IMAGES;
use crate::domain::PropertyDraft;
use crate::errors::{AppError, AppResult};
use crate::infra::UploadedImage;

/// A property create/update payload normalized into a typed draft, plus
/// any image files that came with it.
pub struct PropertyForm {
    pub draft: PropertyDraft,
    pub files: Vec<UploadedImage>,
}

#[async_trait]
impl FromRequest<AppState> for PropertyForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let (fields, files) = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart, &state.uploads).await?
        } else {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            match body {
                Value::Object(fields) => (fields, Vec::new()),
                _ => return Err(AppError::validation("Request body must be a JSON object")),
            }
        };

        Ok(Self {
            draft: PropertyDraft::from_fields(&fields)?,
            files,
        })
    }
}

/// Collect text fields as strings and `images` file parts as temp files.
async fn read_multipart(
    mut multipart: Multipart,
    limits: &UploadSettings,
) -> AppResult<(Map<String, Value>, Vec<UploadedImage>)> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.insert(name, Value::String(text));
            continue;
        };

        if name != UPLOAD_FIELD_IMAGES {
            return Err(AppError::BadRequest(format!("Unexpected file field '{}'", name)));
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("Only image files are allowed".to_string()));
        }
        if files.len() >= limits.max_files {
            return Err(AppError::BadRequest(format!(
                "At most {} images may be uploaded at once",
                limits.max_files
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.len() > limits.max_bytes {
            return Err(AppError::BadRequest(format!(
                "Image '{}' exceeds the {} byte limit",
                file_name, limits.max_bytes
            )));
        }
        if bytes.is_empty() {
            continue;
        }

        files.push(UploadedImage::persist(
            &limits.dir,
            file_name,
            content_type,
            &bytes,
        )?);
    }

    Ok((fields, files))
}
