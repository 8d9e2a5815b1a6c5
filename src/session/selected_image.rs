use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;
use uuid::Uuid;

use crate::error::ImageRejection;

/// The image the user picked, as handed to the session and the predictor.
/// Bytes are shared so clones of the same selection stay cheap.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    id: Uuid,
    filename: String,
    bytes: Arc<[u8]>,
    kind: ImageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }
}

impl SelectedImage {
    /// Sniffs the payload's magic bytes; anything but JPEG or PNG is
    /// rejected before it can enter the session.
    pub fn from_bytes(filename: impl Into<String>, bytes: Arc<[u8]>) -> Result<Self, ImageRejection> {
        if bytes.is_empty() {
            return Err(ImageRejection::Empty);
        }
        let kind = match image::guess_format(&bytes) {
            Ok(ImageFormat::Jpeg) => ImageKind::Jpeg,
            Ok(ImageFormat::Png) => ImageKind::Png,
            _ => return Err(ImageRejection::UnsupportedFormat),
        };
        Ok(Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            bytes,
            kind,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ImageRejection> {
        let bytes = std::fs::read(path).map_err(|source| ImageRejection::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(filename, Arc::from(bytes))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// URI the preview texture is registered under; one per selection, so a
    /// replaced selection's texture can be forgotten without touching the
    /// new one.
    pub fn preview_uri(&self) -> String {
        format!("bytes://mediscan/{}", self.id)
    }

    pub fn size_label(&self) -> String {
        let len = self.bytes.len() as f64;
        if len >= 1024.0 * 1024.0 {
            format!("{:.1} MB", len / (1024.0 * 1024.0))
        } else if len >= 1024.0 {
            format!("{:.1} KB", len / 1024.0)
        } else {
            format!("{} B", self.bytes.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

    #[test]
    fn test_png_payload_is_accepted() {
        let image = SelectedImage::from_bytes("photo.png", Arc::from(PNG_MAGIC.to_vec())).unwrap();
        assert_eq!(image.kind(), ImageKind::Png);
        assert_eq!(image.kind().mime(), "image/png");
        assert_eq!(image.filename(), "photo.png");
    }

    #[test]
    fn test_jpeg_payload_is_accepted() {
        let image = SelectedImage::from_bytes("photo.jpg", Arc::from(JPEG_MAGIC.to_vec())).unwrap();
        assert_eq!(image.kind(), ImageKind::Jpeg);
        assert_eq!(image.kind().mime(), "image/jpeg");
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = SelectedImage::from_bytes("empty.png", Arc::from(Vec::new())).unwrap_err();
        assert!(matches!(err, ImageRejection::Empty));
    }

    #[test]
    fn test_non_image_payload_is_rejected() {
        let err =
            SelectedImage::from_bytes("notes.txt", Arc::from(b"hello world".to_vec())).unwrap_err();
        assert!(matches!(err, ImageRejection::UnsupportedFormat));
    }

    #[test]
    fn test_each_selection_gets_its_own_preview_uri() {
        let a = SelectedImage::from_bytes("a.png", Arc::from(PNG_MAGIC.to_vec())).unwrap();
        let b = SelectedImage::from_bytes("a.png", Arc::from(PNG_MAGIC.to_vec())).unwrap();
        assert_ne!(a.preview_uri(), b.preview_uri());
    }

    #[test]
    fn test_size_label() {
        let image = SelectedImage::from_bytes("a.png", Arc::from(PNG_MAGIC.to_vec())).unwrap();
        assert_eq!(image.size_label(), "8 B");
    }
}
