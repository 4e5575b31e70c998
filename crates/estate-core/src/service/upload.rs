// Standalone image uploads: `/admin/upload/image(s)`
//
// The backend decides where files live and answers with public URLs;
// nothing here invents storage identifiers.

use std::sync::Arc;

use estate_api::upload::{IMAGE_FIELD, IMAGES_FIELD, attach_files};
use estate_api::{ApiClient, Form, Method, UploadFile};
use serde::Deserialize;

use super::payload;
use crate::error::CoreError;

const SINGLE: &str = "/admin/upload/image";
const MULTIPLE: &str = "/admin/upload/images";

/// An uploaded image as listed by the backend: a bare URL or `{ url }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageRef {
    Url(String),
    Object { url: String },
}

impl ImageRef {
    fn into_url(self) -> String {
        match self {
            Self::Url(url) | Self::Object { url } => url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Uploaded {
    url: Option<String>,
    #[serde(alias = "urls")]
    images: Option<Vec<ImageRef>>,
}

impl Uploaded {
    fn into_urls(self) -> Vec<String> {
        let mut urls: Vec<String> = self.url.into_iter().collect();
        urls.extend(self.images.into_iter().flatten().map(ImageRef::into_url));
        urls
    }
}

#[derive(Clone)]
pub struct UploadService {
    client: Arc<ApiClient>,
}

impl UploadService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Upload one image, returning its public URL.
    pub async fn upload_image(&self, file: UploadFile) -> Result<String, CoreError> {
        const FALLBACK: &str = "Không thể tải ảnh lên";
        let form = attach_files(Form::new(), IMAGE_FIELD, vec![file])
            .map_err(|e| CoreError::translate(e, FALLBACK))?;
        let result = self.client.upload(Method::POST, SINGLE, form).await;
        let uploaded: Uploaded = payload(result, FALLBACK)?;
        uploaded
            .into_urls()
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Malformed {
                message: FALLBACK.to_owned(),
            })
    }

    /// Upload several images in one request, returning URLs in order.
    pub async fn upload_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>, CoreError> {
        const FALLBACK: &str = "Không thể tải ảnh lên";
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let form = attach_files(Form::new(), IMAGES_FIELD, files)
            .map_err(|e| CoreError::translate(e, FALLBACK))?;
        let result = self.client.upload(Method::POST, MULTIPLE, form).await;
        let uploaded: Uploaded = payload(result, FALLBACK)?;
        Ok(uploaded.into_urls())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_upload_response_shape_yields_urls() {
        let single: Uploaded = serde_json::from_str(r#"{"url":"/u/a.png"}"#).unwrap();
        assert_eq!(single.into_urls(), vec!["/u/a.png"]);

        let listed: Uploaded =
            serde_json::from_str(r#"{"images":["/u/a.png",{"url":"/u/b.png"}]}"#).unwrap();
        assert_eq!(listed.into_urls(), vec!["/u/a.png", "/u/b.png"]);

        let aliased: Uploaded = serde_json::from_str(r#"{"urls":["/u/c.png"]}"#).unwrap();
        assert_eq!(aliased.into_urls(), vec!["/u/c.png"]);
    }
}
