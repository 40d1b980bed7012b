use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::misc::parse_data_url;

const RECIPE_IMAGE_DIR: &str = "recipes/images";

/// Recipe images on local disk, addressed by paths relative to `root`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        MediaStorage {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.media_root.clone(), config.max_image_bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decodes a base64 image data URL into its file extension and bytes.
    pub fn decode_image(&self, data_url: &str) -> AppResult<(&'static str, Vec<u8>)> {
        let (mime_type, bytes) = parse_data_url(data_url).ok_or_else(|| {
            AppError::Validation("Image must be a base64 encoded data URL".to_string())
        })?;

        let parsed: mime::Mime = mime_type
            .parse()
            .map_err(|_| AppError::Validation(format!("Unknown image type {}", mime_type)))?;
        if parsed.type_() != mime::IMAGE {
            return Err(AppError::Validation(format!(
                "Expected an image, got {}",
                mime_type
            )));
        }

        let extension = image_extension(&parsed).ok_or_else(|| {
            AppError::Validation(format!("Unsupported image type {}", mime_type))
        })?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Image is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "Image exceeds {} bytes",
                self.max_bytes
            )));
        }

        Ok((extension, bytes))
    }

    /// Stores a data URL image and returns its path relative to the media root.
    pub async fn store_recipe_image(&self, data_url: &str) -> AppResult<String> {
        let (extension, bytes) = self.decode_image(data_url)?;

        let relative = format!(
            "{}/{}.{}",
            RECIPE_IMAGE_DIR,
            uuid::Uuid::new_v4(),
            extension
        );
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!("Stored recipe image {} ({} bytes)", relative, bytes.len());
        Ok(relative)
    }

    /// Best effort: a missing file or a path escaping the root is only logged.
    pub async fn remove(&self, relative: &str) {
        let relative_path = Path::new(relative);
        if relative.is_empty()
            || !relative_path
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            tracing::warn!("Refusing to remove media path {:?}", relative);
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.root.join(relative_path)).await {
            tracing::warn!("Failed to remove media file {}: {}", relative, e);
        }
    }
}

fn image_extension(mime_type: &mime::Mime) -> Option<&'static str> {
    let extensions = mime_guess::get_mime_extensions(mime_type)?;
    if mime_type.subtype() == mime::JPEG {
        return Some("jpg");
    }
    extensions
        .iter()
        .copied()
        .find(|ext| *ext == mime_type.subtype().as_str())
        .or_else(|| extensions.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::PNG_DATA_URL;

    #[test]
    fn test_decode_image() {
        let storage = MediaStorage::new("media", 1024);

        let (ext, bytes) = storage.decode_image(PNG_DATA_URL).unwrap();
        assert_eq!(ext, "png");
        assert!(!bytes.is_empty());

        let (ext, _) = storage
            .decode_image("data:image/jpeg;base64,aGVsbG8=")
            .unwrap();
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn test_decode_rejects_non_images_and_oversize() {
        let storage = MediaStorage::new("media", 4);
        assert!(storage.decode_image("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(storage.decode_image("data:image/png;base64,aGVsbG8=").is_err());
        assert!(storage.decode_image("not a data url").is_err());
    }

    #[actix_web::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), 1024 * 1024);

        let relative = storage.store_recipe_image(PNG_DATA_URL).await.unwrap();
        assert!(relative.starts_with("recipes/images/"));
        assert!(relative.ends_with(".png"));
        assert!(dir.path().join(&relative).exists());

        storage.remove(&relative).await;
        assert!(!dir.path().join(&relative).exists());

        // nothing outside the root is touched
        storage.remove("../outside.png").await;
    }
}
