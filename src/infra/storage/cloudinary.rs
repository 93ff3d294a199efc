//! Cloudinary upload API client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::ImageStorage;
use crate::config::{CloudinaryConfig, CLOUDINARY_API_BASE};
use crate::domain::StoredImage;
use crate::errors::{AppError, AppResult};

/// Signed requests against `{base}/{cloud}/image/{upload,destroy}`.
pub struct CloudinaryStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            config,
            base_url: CLOUDINARY_API_BASE.to_string(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.base_url, self.config.cloud_name, action)
    }

    /// Signature over `params` (sorted by name) followed by the API secret.
    fn sign(&self, params: &[(&str, String)]) -> String {
        signature(params, self.config.api_secret())
    }
}

fn signature(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn storage_error(action: &str, err: impl std::fmt::Display) -> AppError {
    AppError::storage(format!("{} failed: {}", action, err))
}

#[async_trait]
impl ImageStorage for CloudinaryStorage {
    async fn upload(&self, path: &Path, folder: &str) -> AppResult<StoredImage> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| storage_error("reading upload", e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = Utc::now().timestamp().to_string();
        let signed = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", self.sign(&signed));

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| storage_error("upload", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(storage_error("upload", format!("{} {}", status, body)));
        }

        let stored: StoredImage = response
            .json()
            .await
            .map_err(|e| storage_error("decoding upload response", e))?;
        tracing::debug!(public_id = %stored.public_id, "Image uploaded");
        Ok(stored)
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.sign(&signed);
        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature_algorithm", "sha256".to_string()),
            ("signature", signature),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| storage_error("destroy", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(storage_error("destroy", status));
        }

        let outcome: DestroyResponse = response
            .json()
            .await
            .map_err(|e| storage_error("decoding destroy response", e))?;
        match outcome.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(storage_error("destroy", other)),
        }
    }
}
