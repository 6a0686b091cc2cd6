use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use uuid::Uuid;

use crate::error::AcquisitionError;

/// Image bytes handed to the controller for a single analysis.
///
/// Cloning is cheap; the underlying buffer is shared.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    id: Uuid,
    bytes: Bytes,
    content_type: String,
    received_at: DateTime<Utc>,
}

impl ImagePayload {
    pub fn new(
        bytes: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Result<Self, AcquisitionError> {
        let bytes = bytes.into();
        let content_type = content_type.into();
        if !is_image_content_type(&content_type) {
            return Err(AcquisitionError::UnsupportedContentType(content_type));
        }
        if bytes.is_empty() {
            return Err(AcquisitionError::Empty);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            bytes,
            content_type,
            received_at: Utc::now(),
        })
    }

    /// Lenient intake for dropped files: anything that is not an image is ignored.
    pub fn accept(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Option<Self> {
        match Self::new(bytes, content_type) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("Ignoring dropped file: {}", e);
                None
            }
        }
    }

    /// Reads an image from disk, tagging it with the MIME type of its detected format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AcquisitionError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let format = image::guess_format(&bytes)
            .or_else(|_| ImageFormat::from_path(path))
            .map_err(|_| AcquisitionError::UnrecognizedFormat)?;
        tracing::debug!("Read {} bytes of {:?} from {}", bytes.len(), format, path.display());
        Self::new(bytes, format.to_mime_type())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
