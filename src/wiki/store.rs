//! Page persistence
//!
//! One file per page, `{data_dir}/{title}.txt`, holding the raw body bytes.
//! Writes truncate in place; there is no atomic rename and no locking, so
//! concurrent saves of one title race and the last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::page::{Page, Title};

/// Store failure. Titles are validated before they reach the store (it only
/// accepts `Title`), so the only failures are absence and I/O.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page {0} does not exist")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// File-backed page store rooted at a single directory
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the data directory if it is missing
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn path_for(&self, title: &Title) -> PathBuf {
        self.dir.join(title.file_name())
    }

    /// Write the page body, creating or truncating its file (mode 0600 on Unix)
    pub async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.path_for(&page.title);

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await?;
        file.write_all(&page.body).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read a page back. A missing file is reported as `NotFound`.
    pub async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        match fs::read(self.path_for(title)).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(title.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());

        let page = Page::new(title("Test"), "Hello\nworld");
        store.save(&page).await.unwrap();

        let loaded = store.load(&title("Test")).await.unwrap();
        assert_eq!(loaded, page);
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());

        store.save(&Page::new(title("Layout"), "raw bytes")).await.unwrap();

        let on_disk = std::fs::read(dir.path().join("Layout.txt")).unwrap();
        assert_eq!(on_disk, b"raw bytes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());
        store.save(&Page::new(title("Secret"), "x")).await.unwrap();

        let mode = std::fs::metadata(dir.path().join("Secret.txt"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());

        store.save(&Page::new(title("Over"), "a much longer first body")).await.unwrap();
        store.save(&Page::new(title("Over"), "short")).await.unwrap();

        let loaded = store.load(&title("Over")).await.unwrap();
        assert_eq!(loaded.body, b"short");
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());

        let err = store.load(&title("Nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_into_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path().join("absent"));

        let err = store.save(&Page::new(title("X"), "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path().join("nested").join("data"));

        store.ensure_dir().await.unwrap();
        store.save(&Page::new(title("Now"), "works")).await.unwrap();
        assert!(store.dir().join("Now.txt").exists());
    }

    #[tokio::test]
    async fn test_concurrent_saves_leave_one_body() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());

        let a = Page::new(title("Race"), "A");
        let b = Page::new(title("Race"), "B");
        let (ra, rb) = tokio::join!(store.save(&a), store.save(&b));
        ra.unwrap();
        rb.unwrap();

        let body = store.load(&title("Race")).await.unwrap().body;
        assert!(body == b"A" || body == b"B", "unexpected body {body:?}");
    }
}
