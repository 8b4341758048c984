//! File-backed storage: one JSON object per file.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// JSON document store on the local filesystem.
///
/// Every write replaces the whole document via a temporary file and rename,
/// so a crash mid-write leaves the previous version in place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StorageResult<Map<String, Value>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };
        if data.is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&data)? {
            Value::Object(map) => Ok(map),
            other => Err(StorageError::Corrupt(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await?;
        tracing::debug!(path = %self.path.display(), key = key, "Storage key written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert!(store.get("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence() {
        let path = temp_path("file-store");

        let store = FileStore::new(&path);
        store.set("serializedWallet", json!({"json": "cafe"})).await.unwrap();
        store.set("other", json!(42)).await.unwrap();

        // Load new instance
        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("serializedWallet").await.unwrap(),
            Some(json!({"json": "cafe"}))
        );
        assert_eq!(reopened.get("other").await.unwrap(), Some(json!(42)));

        // Writes keep the other keys in the document.
        reopened.set("other", json!(43)).await.unwrap();
        assert_eq!(
            store.get("serializedWallet").await.unwrap(),
            Some(json!({"json": "cafe"}))
        );

        // Cleanup
        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"[1, 2, 3]").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));

        std::fs::write(&path, b"{ not json").unwrap();
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
