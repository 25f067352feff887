//! Stored-image cleanup for custom badges. Uploads are handled by the object
//! storage the client talks to directly; this side only ever removes files.

use std::path::{Component, Path, PathBuf};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn remove(&self, image_url: &str) -> std::io::Result<()>;
}

/// Images kept under a local directory, addressed by their path relative to it.
pub struct LocalMediaStorage {
    root_path: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps an image reference onto the root. References that try to leave
    /// the root are refused.
    fn resolve(&self, image_url: &str) -> Option<PathBuf> {
        let relative = Path::new(image_url.trim_start_matches('/'));
        let escapes = relative.components().any(|component| {
            !matches!(component, Component::Normal(_))
        });
        if escapes || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root_path.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn remove(&self, image_url: &str) -> std::io::Result<()> {
        let path = self.resolve(image_url).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("image reference outside media root: {}", image_url),
            )
        })?;
        tokio::fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_under_root() {
        let storage = LocalMediaStorage::new(PathBuf::from("/srv/uploads"));
        assert_eq!(
            storage.resolve("/badges/a.png"),
            Some(PathBuf::from("/srv/uploads/badges/a.png"))
        );
        assert_eq!(storage.resolve("../etc/passwd"), None);
        assert_eq!(storage.resolve(""), None);
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let root = std::env::temp_dir().join(format!("segreto-media-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(root.join("badges")).await.unwrap();
        tokio::fs::write(root.join("badges/b.png"), b"png").await.unwrap();

        let storage = LocalMediaStorage::new(root.clone());
        storage.remove("badges/b.png").await.unwrap();
        assert!(!root.join("badges/b.png").exists());

        assert!(storage.remove("badges/b.png").await.is_err());
        tokio::fs::remove_dir_all(root).await.unwrap();
    }
}
