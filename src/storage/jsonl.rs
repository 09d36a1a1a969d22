//! JSONL-based storage implementation with in-memory caching.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Serialize, de::DeserializeOwned};

use super::traits::{Filter, HasId, Storage};
use crate::error::{RedatorError, Result};

/// JSONL-based storage with in-memory caching.
///
/// One file per collection; the file is the source of truth and the cache
/// is filled lazily on first access.
pub struct JsonlStorage {
    base_path: PathBuf,
    cache: RwLock<HashMap<String, Vec<serde_json::Value>>>,
}

impl std::fmt::Debug for JsonlStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlStorage")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

impl JsonlStorage {
    /// Create a new JsonlStorage at the given path.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Get the file path for a collection.
    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && !collection.contains("..")
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(RedatorError::Storage(format!("Invalid collection name: {}", collection)));
        }
        Ok(self.base_path.join(format!("{}.jsonl", collection)))
    }

    /// Load a collection into cache if not already loaded.
    fn ensure_loaded(&self, collection: &str) -> Result<()> {
        {
            let cache = self.cache.read().map_err(|e| RedatorError::Storage(e.to_string()))?;
            if cache.contains_key(collection) {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().map_err(|e| RedatorError::Storage(e.to_string()))?;
        if cache.contains_key(collection) {
            return Ok(());
        }

        let path = self.collection_path(collection)?;
        let records = if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            let mut records = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    let record: serde_json::Value = serde_json::from_str(&line)?;
                    records.push(record);
                }
            }
            records
        } else {
            Vec::new()
        };

        log::debug!("Loaded collection {} ({} records)", collection, records.len());
        cache.insert(collection.to_string(), records);
        Ok(())
    }

    /// Append a record to the JSONL file.
    fn append_to_file(&self, collection: &str, record: &serde_json::Value) -> Result<()> {
        let path = self.collection_path(collection)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    /// Rewrite the entire collection file from cache.
    fn rewrite_file(&self, collection: &str) -> Result<()> {
        let cache = self.cache.read().map_err(|e| RedatorError::Storage(e.to_string()))?;
        let records = cache
            .get(collection)
            .ok_or_else(|| RedatorError::Storage(format!("Collection not loaded: {}", collection)))?;

        let path = self.collection_path(collection)?;
        let mut file = File::create(&path)?;
        for record in records {
            writeln!(file, "{}", serde_json::to_string(record)?)?;
        }
        Ok(())
    }
}

fn record_id(record: &serde_json::Value) -> Option<&str> {
    record.get("id").and_then(|v| v.as_str())
}

impl Storage for JsonlStorage {
    fn create<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        self.ensure_loaded(collection)?;

        let value = serde_json::to_value(record)?;

        // Append to file first (source of truth)
        self.append_to_file(collection, &value)?;

        let mut cache = self.cache.write().map_err(|e| RedatorError::Storage(e.to_string()))?;
        cache.entry(collection.to_string()).or_default().push(value);

        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        self.ensure_loaded(collection)?;

        let cache = self.cache.read().map_err(|e| RedatorError::Storage(e.to_string()))?;
        let records = cache
            .get(collection)
            .ok_or_else(|| RedatorError::Storage(format!("Collection not loaded: {}", collection)))?;

        match records.iter().find(|r| record_id(r) == Some(id)) {
            Some(record) => Ok(Some(serde_json::from_value(record.clone())?)),
            None => Ok(None),
        }
    }

    fn update<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        self.ensure_loaded(collection)?;

        let id = record.id();
        let value = serde_json::to_value(record)?;

        {
            let mut cache = self.cache.write().map_err(|e| RedatorError::Storage(e.to_string()))?;
            let records = cache
                .get_mut(collection)
                .ok_or_else(|| RedatorError::Storage(format!("Collection not loaded: {}", collection)))?;

            match records.iter_mut().find(|r| record_id(r) == Some(id)) {
                Some(slot) => *slot = value,
                None => return Err(RedatorError::NotFound(id.to_string())),
            }
        }

        self.rewrite_file(collection)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.ensure_loaded(collection)?;

        {
            let mut cache = self.cache.write().map_err(|e| RedatorError::Storage(e.to_string()))?;
            let records = cache
                .get_mut(collection)
                .ok_or_else(|| RedatorError::Storage(format!("Collection not loaded: {}", collection)))?;

            let original_len = records.len();
            records.retain(|r| record_id(r) != Some(id));

            if records.len() == original_len {
                return Err(RedatorError::NotFound(id.to_string()));
            }
        }

        self.rewrite_file(collection)
    }

    fn query<T: DeserializeOwned>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>> {
        self.ensure_loaded(collection)?;

        let cache = self.cache.read().map_err(|e| RedatorError::Storage(e.to_string()))?;
        let records = cache
            .get(collection)
            .ok_or_else(|| RedatorError::Storage(format!("Collection not loaded: {}", collection)))?;

        let mut results = Vec::new();
        for record in records {
            if filters.iter().all(|f| f.matches(record)) {
                results.push(serde_json::from_value(record.clone())?);
            }
        }

        Ok(results)
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        let path = self.collection_path(collection)?;

        let mut cache = self.cache.write().map_err(|e| RedatorError::Storage(e.to_string()))?;
        cache.remove(collection);

        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestRecord {
        id: String,
        name: String,
        status: String,
    }

    impl HasId for TestRecord {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn record(id: &str, name: &str, status: &str) -> TestRecord {
        TestRecord {
            id: id.to_string(),
            name: name.to_string(),
            status: status.to_string(),
        }
    }

    fn create_test_storage() -> (JsonlStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonlStorage::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_and_get() {
        let (storage, _temp) = create_test_storage();
        let rec = record("1", "test", "active");

        storage.create("test", &rec).unwrap();
        let retrieved: Option<TestRecord> = storage.get("test", "1").unwrap();

        assert_eq!(retrieved, Some(rec));
    }

    #[test]
    fn test_get_not_found() {
        let (storage, _temp) = create_test_storage();
        let retrieved: Option<TestRecord> = storage.get("test", "nonexistent").unwrap();
        assert_eq!(retrieved, None);
    }

    #[test]
    fn test_update_overwrites_whole_record() {
        let (storage, _temp) = create_test_storage();
        storage.create("test", &record("1", "test", "active")).unwrap();

        let updated = record("1", "renamed", "completed");
        storage.update("test", &updated).unwrap();

        let retrieved: Option<TestRecord> = storage.get("test", "1").unwrap();
        assert_eq!(retrieved, Some(updated));
    }

    #[test]
    fn test_update_not_found() {
        let (storage, _temp) = create_test_storage();
        let result = storage.update("test", &record("1", "test", "active"));
        assert!(matches!(result, Err(RedatorError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (storage, _temp) = create_test_storage();
        storage.create("test", &record("1", "test", "active")).unwrap();
        storage.delete("test", "1").unwrap();

        let retrieved: Option<TestRecord> = storage.get("test", "1").unwrap();
        assert_eq!(retrieved, None);
    }

    #[test]
    fn test_delete_not_found() {
        let (storage, _temp) = create_test_storage();
        let result = storage.delete("test", "nonexistent");
        assert!(matches!(result, Err(RedatorError::NotFound(_))));
    }

    #[test]
    fn test_query_with_filters() {
        let (storage, _temp) = create_test_storage();
        storage.create("test", &record("1", "alice", "active")).unwrap();
        storage.create("test", &record("2", "bob", "inactive")).unwrap();
        storage.create("test", &record("3", "charlie", "active")).unwrap();

        let active: Vec<TestRecord> = storage.query("test", &[Filter::eq("status", "active")]).unwrap();

        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| r.status == "active"));
    }

    #[test]
    fn test_list() {
        let (storage, _temp) = create_test_storage();
        storage.create("test", &record("1", "one", "active")).unwrap();
        storage.create("test", &record("2", "two", "active")).unwrap();

        let all: Vec<TestRecord> = storage.list("test").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = JsonlStorage::new(temp_dir.path()).unwrap();
            storage.create("test", &record("1", "test", "active")).unwrap();
            storage.update("test", &record("1", "kept", "active")).unwrap();
        }

        {
            let storage = JsonlStorage::new(temp_dir.path()).unwrap();
            let retrieved: Option<TestRecord> = storage.get("test", "1").unwrap();
            assert_eq!(retrieved.unwrap().name, "kept");
        }
    }

    #[test]
    fn test_empty_collection() {
        let (storage, _temp) = create_test_storage();
        let all: Vec<TestRecord> = storage.list("empty").unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_drop_collection_removes_file_and_cache() {
        let (storage, temp) = create_test_storage();
        storage.create("topics.abc.tasks", &record("1", "x", "a")).unwrap();
        assert!(temp.path().join("topics.abc.tasks.jsonl").exists());

        storage.drop_collection("topics.abc.tasks").unwrap();

        assert!(!temp.path().join("topics.abc.tasks.jsonl").exists());
        let all: Vec<TestRecord> = storage.list("topics.abc.tasks").unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_drop_missing_collection_is_ok() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.drop_collection("never").is_ok());
    }

    #[test]
    fn test_rejects_path_like_collection_names() {
        let (storage, _temp) = create_test_storage();
        let result: Result<Vec<TestRecord>> = storage.list("../escape");
        assert!(matches!(result, Err(RedatorError::Storage(_))));
        let result: Result<Vec<TestRecord>> = storage.list("a/b");
        assert!(matches!(result, Err(RedatorError::Storage(_))));
    }

    #[test]
    fn test_multiple_collections() {
        let (storage, _temp) = create_test_storage();
        storage.create("collection_a", &record("1", "in_a", "active")).unwrap();
        storage.create("collection_b", &record("1", "in_b", "active")).unwrap();

        let a: Option<TestRecord> = storage.get("collection_a", "1").unwrap();
        let b: Option<TestRecord> = storage.get("collection_b", "1").unwrap();

        assert_eq!(a.unwrap().name, "in_a");
        assert_eq!(b.unwrap().name, "in_b");
    }
}
