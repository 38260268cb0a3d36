//! Storage for uploaded product images.
//!
//! Files are written below the media root as `products/<uuid>.<ext>`; the
//! storefront serves the same directory under `/media`.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use thiserror::Error;
use uuid::Uuid;

/// Image extensions accepted for product photos.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Sub-directory of the media root holding product images.
const PRODUCT_DIR: &str = "products";

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The file name has no usable image extension.
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    UnsupportedType,

    /// Writing to disk failed.
    #[error("could not store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    /// The lower-cased extension, if it is an accepted image type.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnsupportedType` for anything else.
    pub fn image_extension(&self) -> Result<String, MediaError> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(MediaError::UnsupportedType)
    }
}

/// Writes uploads under a media root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store a product image and return its path relative to the media root.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnsupportedType` for non-image names, or
    /// `MediaError::Io` if the file cannot be written.
    pub async fn save_product_image(&self, upload: &Upload) -> Result<String, MediaError> {
        let extension = upload.image_extension()?;
        let relative = format!("{PRODUCT_DIR}/{}.{extension}", Uuid::new_v4());

        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &upload.bytes).await?;

        tracing::info!(path = %relative, bytes = upload.bytes.len(), "stored product image");
        Ok(relative)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn upload(name: &str) -> Upload {
        Upload {
            file_name: name.to_string(),
            bytes: Bytes::from_static(b"\x89PNG fake"),
        }
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(upload("cake.PNG").image_extension().unwrap(), "png");
        assert_eq!(upload("photo.jpeg").image_extension().unwrap(), "jpeg");
        assert!(upload("notes.txt").image_extension().is_err());
        assert!(upload("no-extension").image_extension().is_err());
    }

    #[tokio::test]
    async fn test_save_product_image_writes_under_products() {
        let root = std::env::temp_dir().join(format!("aiza-media-{}", Uuid::new_v4()));
        let store = MediaStore::new(root.clone());

        let relative = store.save_product_image(&upload("eclair.webp")).await.unwrap();

        assert!(relative.starts_with("products/"));
        assert!(relative.ends_with(".webp"));
        let written = tokio::fs::read(root.join(&relative)).await.unwrap();
        assert_eq!(written, b"\x89PNG fake");

        tokio::fs::remove_dir_all(root).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_non_images() {
        let store = MediaStore::new(std::env::temp_dir());
        assert!(matches!(
            store.save_product_image(&upload("script.sh")).await,
            Err(MediaError::UnsupportedType)
        ));
    }
}
