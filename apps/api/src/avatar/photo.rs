use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;

pub const DEFAULT_FILENAME: &str = "upload.png";
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// The uploaded source photo. Lives for one generation request and is never
/// written to disk by the service.
#[derive(Debug, Clone)]
pub struct PhotoPayload {
    pub bytes: Bytes,
    pub media_type: String,
    pub filename: String,
}

impl PhotoPayload {
    pub fn new(bytes: impl Into<Bytes>, media_type: Option<&str>, filename: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_MEDIA_TYPE)
                .to_string(),
            filename: filename
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_FILENAME)
                .to_string(),
        }
    }

    /// Reads a photo from disk, taking the media type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed reading {}", path.display()))?;
        let filename = path.file_name().and_then(|value| value.to_str());
        Ok(Self::new(bytes, Some(media_type_for_path(path)), filename))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A self-contained `data:` URL of the original bytes, displayable without
    /// any further network access.
    pub fn local_preview_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, BASE64.encode(&self.bytes))
    }
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => DEFAULT_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_metadata_uses_defaults() {
        let photo = PhotoPayload::new(vec![1u8, 2, 3], None, Some("  "));
        assert_eq!(photo.filename, "upload.png");
        assert_eq!(photo.media_type, "application/octet-stream");
        assert!(!photo.is_empty());
    }

    #[test]
    fn test_local_preview_url_embeds_bytes() {
        let photo = PhotoPayload::new(b"hi".to_vec(), Some("image/png"), Some("me.png"));
        assert_eq!(photo.local_preview_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_media_type_from_extension_is_case_insensitive() {
        assert_eq!(media_type_for_path(Path::new("selfie.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("selfie.webp")), "image/webp");
        assert_eq!(
            media_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.jpeg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

        let photo = PhotoPayload::from_path(&path).await.unwrap();
        assert_eq!(photo.filename, "portrait.jpeg");
        assert_eq!(photo.media_type, "image/jpeg");
        assert_eq!(photo.bytes.as_ref(), &[0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = PhotoPayload::from_path(dir.path().join("nope.png")).await;
        assert!(result.is_err());
    }
}
