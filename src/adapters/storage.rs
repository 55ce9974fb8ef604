use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem storage rooted at `base_path`. Directories are only created
/// when something is written.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // 先寫入暫存檔再改名，避免留下寫一半的檔案
        let mut tmp_name = full_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let written = match fs::write(&tmp_path, data).await {
            Ok(()) => fs::rename(&tmp_path, &full_path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        fs::remove_file(self.full_path(path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("Results");
        let storage = LocalStorage::new(&root);

        assert!(!root.exists());

        storage
            .write_file("Individual_Results/Ann.txt", b"Bob")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(root.join("Individual_Results/Ann.txt")).unwrap(),
            "Bob"
        );
        assert!(!root.join("Individual_Results/Ann.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("full_results.txt", b"Ann --> Bob\n").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("full_results.txt")).unwrap(),
            "Ann --> Bob\n"
        );

        storage.remove_file("full_results.txt").await.unwrap();
        assert!(!temp_dir.path().join("full_results.txt").exists());
        assert!(storage.remove_file("full_results.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        // A non-empty directory at the target path makes the rename fail.
        std::fs::create_dir_all(temp_dir.path().join("Ann.txt/occupied")).unwrap();

        let result = storage.write_file("Ann.txt", b"Bob").await;

        assert!(result.is_err());
        assert!(!temp_dir.path().join("Ann.txt.tmp").exists());
        assert!(temp_dir.path().join("Ann.txt").is_dir());
    }
}
