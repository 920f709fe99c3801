use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::core::config::ImageUploadConfig;
use crate::core::{ApiClient, AppError};

#[derive(Debug, Deserialize)]
struct HostedImage {
    display_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<HostedImage>,
}

/// Image host used for profile photos and university logos.
pub struct ImageUploader {
    client: ApiClient,
    config: ImageUploadConfig,
}

impl ImageUploader {
    pub fn new(client: ApiClient, config: ImageUploadConfig) -> Self {
        Self { client, config }
    }

    #[tracing::instrument(name = "Upload image", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::validation_error("image: Image is required"));
        }
        let form = Form::new().part("image", Part::bytes(bytes).file_name(file_name.to_string()));
        let query = [("key", self.config.api_key.expose_secret().as_str())];
        let response: UploadResponse = self
            .client
            .post_multipart_external(&self.config.upload_url, &query, form)
            .await?;

        match response.data {
            Some(image) if response.success => Ok(image.display_url),
            _ => Err(AppError::network_error("Image upload was not accepted")),
        }
    }
}
