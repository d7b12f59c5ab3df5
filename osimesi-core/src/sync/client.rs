//! HTTP client for the remote restaurant service.
//!
//! The service exposes a conventional collection resource: list via GET,
//! create via multipart POST (the photo is an uploaded file at creation
//! time), update via full-record PUT and delete by id. Responses are decoded
//! through the wire adapter so partial records never fail the whole call.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::error::SyncError;
use super::wire::{from_wire, to_wire};
use crate::models::{Photo, Restaurant, RestaurantDraft};

/// Fixed base address used when no other is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client for the remote restaurant collection.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client, normalizing a scheme-less address to `http://`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let raw: String = base_url.into();
        let base_url = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw
        } else {
            format!("http://{}", raw)
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Returns the normalized base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the collection resource.
    pub fn collection_url(&self) -> String {
        format!("{}/api/restaurants/", self.base_url)
    }

    /// URL of a single record.
    pub fn record_url(&self, id: &str) -> String {
        format!("{}/api/restaurants/{}/", self.base_url, id)
    }

    /// Fetches the full collection.
    pub async fn list(&self) -> Result<Vec<Restaurant>, SyncError> {
        let response = self
            .http
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| SyncError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::ServerStatus(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::DecodeError(e.to_string()))?;

        let records = body
            .as_array()
            .map(|items| items.iter().map(|v| from_wire(v, &self.base_url)).collect())
            .unwrap_or_default();

        Ok(records)
    }

    /// Creates a record via multipart POST: text fields plus the photo as a
    /// binary file attachment. Returns the record as the service stored it,
    /// with its assigned id and timestamp.
    pub async fn create(&self, draft: &RestaurantDraft) -> Result<Restaurant, SyncError> {
        let (file_name, bytes) = photo_attachment(&draft.photo);

        let form = Form::new()
            .text("name", draft.name.trim().to_string())
            .text("memo", draft.memo.clone())
            .text("lat", draft.location.lat.to_string())
            .text("lng", draft.location.lng.to_string())
            .part("photo", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.collection_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SyncError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::ServerStatus(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::DecodeError(e.to_string()))?;

        Ok(from_wire(&body, &self.base_url))
    }

    /// Replaces a record with a full JSON payload (PUT).
    pub async fn update(&self, restaurant: &Restaurant) -> Result<Restaurant, SyncError> {
        let response = self
            .http
            .put(self.record_url(&restaurant.id))
            .json(&to_wire(restaurant))
            .send()
            .await
            .map_err(|e| SyncError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::ServerStatus(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::DecodeError(e.to_string()))?;

        Ok(from_wire(&body, &self.base_url))
    }

    /// Deletes a record by id. A 404 counts as success so that delete stays
    /// idempotent.
    pub async fn delete(&self, id: &str) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(|e| SyncError::RequestError(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status.as_u16() == 404 {
            Ok(())
        } else {
            Err(SyncError::ServerStatus(status.as_u16()))
        }
    }
}

/// Resolves a draft photo to an uploadable (file name, bytes) pair.
///
/// Inline data URLs are decoded back to bytes; anything undecodable is sent
/// as-is rather than rejected.
fn photo_attachment(photo: &Photo) -> (String, Vec<u8>) {
    match photo {
        Photo::Upload { file_name, bytes } => (file_name.clone(), bytes.clone()),
        Photo::Inline(data) => {
            let bytes = data
                .split_once("base64,")
                .and_then(|(_, payload)| BASE64.decode(payload).ok())
                .unwrap_or_else(|| data.as_bytes().to_vec());
            ("photo.jpg".to_string(), bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");

        let client = ApiClient::new("https://api.example.com/");
        assert_eq!(client.base_url(), "https://api.example.com");

        let client = ApiClient::new("localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_collection_url() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(
            client.collection_url(),
            "http://localhost:8000/api/restaurants/"
        );
    }

    #[test]
    fn test_record_url() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(
            client.record_url("17"),
            "http://localhost:8000/api/restaurants/17/"
        );
    }

    #[test]
    fn test_photo_attachment_upload() {
        let photo = Photo::Upload {
            file_name: "ramen.png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let (name, bytes) = photo_attachment(&photo);
        assert_eq!(name, "ramen.png");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_photo_attachment_decodes_data_url() {
        let photo = Photo::Inline("data:image/png;base64,AQID".to_string());
        let (name, bytes) = photo_attachment(&photo);
        assert_eq!(name, "photo.jpg");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_photo_attachment_falls_back_to_raw() {
        let photo = Photo::Inline("not a data url".to_string());
        let (_, bytes) = photo_attachment(&photo);
        assert_eq!(bytes, b"not a data url".to_vec());
    }
}
