//! Report file store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A file written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    /// Store-relative path, also used as the document URL
    pub path: String,
    /// Hex SHA-256 of the content
    pub checksum: String,
    pub size: u64,
}

impl StoredReport {
    pub fn describe(path: &str, bytes: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            checksum: hex::encode(Sha256::digest(bytes)),
            size: bytes.len() as u64,
        }
    }
}

/// Where generated reports are kept
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Write `bytes` at the store-relative `path`; an existing file is never replaced
    async fn put(&self, path: &str, bytes: &[u8]) -> AppResult<StoredReport>;

    /// Remove a file; a missing file is not an error
    async fn remove(&self, path: &str) -> AppResult<()>;
}

/// Report store on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalReportStore {
    root: PathBuf,
}

impl LocalReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative path below the root, refusing anything that would escape it
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !safe {
            return Err(AppError::Report(format!("Invalid report path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> AppResult<StoredReport> {
        let target = self.resolve(path)?;
        let dir = target
            .parent()
            .ok_or_else(|| AppError::Report(format!("Invalid report path: {}", path)))?;
        tokio::fs::create_dir_all(dir).await?;

        // Write next to the target then link it in place, so readers never see a
        // partial file. Linking fails on an existing target where rename would replace it.
        let tmp = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        let linked = tokio::fs::hard_link(&tmp, &target).await;
        let _ = tokio::fs::remove_file(&tmp).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AppError::Report(format!("Report already exists: {}", path)));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!("Stored report {} ({} bytes)", target.display(), bytes.len());
        Ok(StoredReport::describe(path, bytes))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalReportStore::new(dir.path());

        let stored = store
            .put("reports/DIARIA/report_20260101_080000_BBCL12.pdf", b"hello")
            .await
            .unwrap();

        assert_eq!(stored.size, 5);
        assert_eq!(
            stored.checksum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        let written = std::fs::read(dir.path().join(&stored.path)).unwrap();
        assert_eq!(written, b"hello");

        // No temp files left behind
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("reports/DIARIA"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_put_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalReportStore::new(dir.path());
        let path = "reports/DIARIA/report_20260101_080000_BBCL12_1.pdf";

        let first = store.put(path, b"first").await.unwrap();
        let second = store.put(path, b"second").await;

        assert!(matches!(second, Err(AppError::Report(_))));
        let written = std::fs::read(dir.path().join(path)).unwrap();
        assert_eq!(written, b"first");
        assert_eq!(first.checksum, StoredReport::describe(path, b"first").checksum);

        // The rejected write leaves no temp file behind
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("reports/DIARIA"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalReportStore::new(dir.path());

        store.put("reports/a.pdf", b"x").await.unwrap();
        store.remove("reports/a.pdf").await.unwrap();
        assert!(!dir.path().join("reports/a.pdf").exists());
        store.remove("reports/a.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalReportStore::new(dir.path());

        assert!(store.put("../outside.pdf", b"x").await.is_err());
        assert!(store.put("/etc/passwd", b"x").await.is_err());
        assert!(store.put("", b"x").await.is_err());
    }
}
