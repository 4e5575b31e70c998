// Multipart encoding for create/update requests that carry files
//
// Scalar fields become text parts, nested objects and arrays become JSON
// text parts (the backend parses them back), and files are appended under
// one repeated field name.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;

/// Field name new image files are sent under.
pub const IMAGES_FIELD: &str = "images";

/// Field name of the single-image upload endpoint.
pub const IMAGE_FIELD: &str = "image";

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Stage in-memory bytes; the MIME type is sniffed from the content.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = infer::get(&bytes).map_or(FALLBACK_MIME, |kind| kind.mime_type());
        Self {
            file_name: file_name.into(),
            mime: mime.to_owned(),
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Upload(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    /// Whether the sniffed type is an image.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    fn into_part(self) -> Result<Part, Error> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| Error::Upload(format!("invalid MIME type: {e}")))
    }
}

/// Encode `payload`'s top-level fields as form parts.
///
/// `payload` must serialize to a JSON object; `null` fields are omitted.
pub fn form_from<T: Serialize>(payload: &T) -> Result<Form, Error> {
    let value = serde_json::to_value(payload).map_err(|e| Error::Upload(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(Error::Upload("multipart payload must be a JSON object".into()));
    };

    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            Value::Null => form,
            Value::String(s) => form.text(name, s),
            other => form.text(name, other.to_string()),
        };
    }
    Ok(form)
}

/// Append files under `field`, one part per file.
pub fn attach_files(mut form: Form, field: &str, files: Vec<UploadFile>) -> Result<Form, Error> {
    for file in files {
        debug!(field, file = %file.file_name, mime = %file.mime, size = file.bytes.len(), "attaching file");
        form = form.part(field.to_owned(), file.into_part()?);
    }
    Ok(form)
}

/// `form_from` followed by `attach_files` under [`IMAGES_FIELD`].
pub fn form_with_images<T: Serialize>(payload: &T, images: Vec<UploadFile>) -> Result<Form, Error> {
    attach_files(form_from(payload)?, IMAGES_FIELD, images)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn mime_is_sniffed_from_content() {
        let png = UploadFile::new("cover.png", PNG_HEADER.to_vec());
        assert_eq!(png.mime, "image/png");
        assert!(png.is_image());

        let unknown = UploadFile::new("notes.bin", vec![1, 2, 3]);
        assert_eq!(unknown.mime, FALLBACK_MIME);
        assert!(!unknown.is_image());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = form_from(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::Upload(_)));
    }

    #[tokio::test]
    async fn from_path_reads_file_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facade.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "facade.png");
        assert_eq!(file.bytes.len(), PNG_HEADER.len());
        assert!(file.is_image());
    }
}
