use crate::app::ports::KeyValueStorePort;
use crate::error::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Key-value store keeping one file per key under a root directory.
///
/// File names are the sha256 of the key, so arbitrary keys (`@food_delivery_cart`)
/// map to safe paths. Writes go to a temp file in the same directory and are renamed
/// into place, so a crash mid-write leaves the previous value intact.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hex = hex::encode(hasher.finalize());
        self.root.join("kv").join(format!("{}.json", hex))
    }
}

fn read_value(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_value(path: &Path, value: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| crate::error::CartError::storage("key path has no parent directory"))?;
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn remove_value(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key);
        tokio::task::spawn_blocking(move || read_value(&path)).await?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key);
        let value = value.to_string();
        let bytes = value.len();
        tokio::task::spawn_blocking(move || write_value(&path, &value)).await??;
        debug!("Wrote {} bytes for key {}", bytes, key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key);
        tokio::task::spawn_blocking(move || remove_value(&path)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get("@food_delivery_cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn value_survives_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        FileKeyValueStore::new(dir.path())
            .set("@food_delivery_cart", "{\"items\":[]}")
            .await
            .unwrap();

        let reopened = FileKeyValueStore::new(dir.path());
        assert_eq!(
            reopened.get("@food_delivery_cart").await.unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
    }

    #[tokio::test]
    async fn overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        let files = fs::read_dir(dir.path().join("kv")).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[test]
    fn key_paths_are_hashed() {
        let store = FileKeyValueStore::new("/data");
        let path = store.path_for_key("@food_delivery_cart");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), 64 + ".json".len());
        assert!(name.chars().take(64).all(|c| c.is_ascii_hexdigit()));
        assert_ne!(path, store.path_for_key("other"));
    }
}
