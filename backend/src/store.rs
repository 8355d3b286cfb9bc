use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use serde_json::Value;
use crate::documents::{DocumentStore, StoreResult};
use crate::error::StoreError;

pub type DocumentMap = Mutex<HashMap<String, Value>>;

/// In-process document store.
///
/// Carries fault hooks so tests can stand in for an unreachable store or for
/// keys removed by another writer between two calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DocumentMap,
    unavailable: AtomicBool,
    vanishing_deletes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// The next `count` keys passed to `delete` are dropped without being
    /// counted, as if a concurrent writer removed them first.
    pub fn drop_on_delete(&self, count: usize) {
        self.vanishing_deletes.store(count, Ordering::SeqCst);
    }

    /// Store a document as-is, bypassing any typed encoding.
    pub fn insert_raw(&self, key: impl Into<String>, document: Value) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(key.into(), document);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Value>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store marked unavailable".into()));
        }
        self.documents
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn take_vanishing(&self) -> bool {
        self.vanishing_deletes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[rocket::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, document: &Value) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        let mut documents = self.lock()?;
        let mut deleted = 0;
        for key in keys {
            let removed = documents.remove(key).is_some();
            if removed && !self.take_vanishing() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self.lock()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}
