//! Image asset model

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

const KIB_BYTES: u64 = 1024;
const MIB_BYTES: u64 = KIB_BYTES * 1024;
const GIB_BYTES: u64 = MIB_BYTES * 1024;

/// A unique identifier for an image asset
///
/// Derived from the upload time and the original filename, so the same file
/// uploaded twice yields two distinct assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(String);

impl ImageId {
    fn derive(uploaded_at: i64, name: &str) -> Self {
        Self(format!("{uploaded_at}-{name}"))
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file handed to the upload path
///
/// `bytes` is the transient binary handle; it only lives for the duration of
/// the upload operation and is never part of the durable record.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload from a filename, MIME type, and raw bytes
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Whether this upload carries an image MIME type
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// An image asset persisted in the images collection
///
/// Immutable after creation; deleted as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Unique identifier
    pub id: ImageId,
    /// Original filename
    pub name: String,
    /// MIME type captured at upload
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Self-contained data URL, usable directly as an image source
    pub src: String,
}

impl ImageAsset {
    /// Build a durable asset record from an accepted upload
    #[must_use]
    pub fn from_upload(upload: &ImageUpload) -> Self {
        let uploaded_at = chrono::Utc::now().timestamp_millis();
        let encoded = BASE64_STANDARD.encode(&upload.bytes);
        Self {
            id: ImageId::derive(uploaded_at, &upload.name),
            name: upload.name.clone(),
            mime_type: upload.mime_type.clone(),
            size_bytes: upload.bytes.len() as u64,
            src: format!("data:{};base64,{encoded}", upload.mime_type),
        }
    }

    /// Human-readable size for display
    #[must_use]
    pub fn human_size(&self) -> String {
        let bytes = self.size_bytes;

        if bytes < KIB_BYTES {
            format!("{bytes} B")
        } else if bytes < MIB_BYTES {
            format_scaled_one_decimal(bytes, KIB_BYTES, "KB")
        } else if bytes < GIB_BYTES {
            format_scaled_one_decimal(bytes, MIB_BYTES, "MB")
        } else {
            format_scaled_one_decimal(bytes, GIB_BYTES, "GB")
        }
    }
}

fn format_scaled_one_decimal(bytes: u64, unit: u64, suffix: &str) -> String {
    let mut whole = bytes / unit;
    let mut tenth = ((bytes % unit) * 10 + (unit / 2)) / unit;

    if tenth == 10 {
        whole += 1;
        tenth = 0;
    }

    format!("{whole}.{tenth} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_upload() -> ImageUpload {
        ImageUpload::new("photo.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    #[test]
    fn test_is_image() {
        assert!(png_upload().is_image());

        let text = ImageUpload::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(!text.is_image());
    }

    #[test]
    fn test_from_upload_builds_data_url() {
        let asset = ImageAsset::from_upload(&png_upload());

        assert_eq!(asset.name, "photo.png");
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.size_bytes, 4);
        assert!(asset.src.starts_with("data:image/png;base64,"));
        assert!(asset.id.as_str().ends_with("-photo.png"));
    }

    #[test]
    fn test_src_round_trips_bytes() {
        let upload = png_upload();
        let asset = ImageAsset::from_upload(&upload);

        let encoded = asset
            .src
            .split_once("base64,")
            .map(|(_, payload)| payload)
            .unwrap();
        assert_eq!(BASE64_STANDARD.decode(encoded).unwrap(), upload.bytes);
    }

    #[test]
    fn test_human_size() {
        let mut asset = ImageAsset::from_upload(&png_upload());

        asset.size_bytes = 512;
        assert_eq!(asset.human_size(), "512 B");

        asset.size_bytes = 1536;
        assert_eq!(asset.human_size(), "1.5 KB");

        asset.size_bytes = 5 * MIB_BYTES;
        assert_eq!(asset.human_size(), "5.0 MB");
    }
}
