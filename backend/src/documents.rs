use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::VoterId;
use crate::error::StoreError;

pub const VOTER_KEY_PREFIX: &str = "voter:";

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal key/JSON-document store.
///
/// Each call is atomic for the single key it touches and nothing more;
/// callers composing several calls get no isolation from concurrent callers.
#[rocket::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Create or replace the whole document at `key`.
    async fn set(&self, key: &str, document: &Value) -> StoreResult<()>;

    /// Returns the number of keys actually removed.
    async fn delete(&self, keys: &[String]) -> StoreResult<u64>;

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

pub fn voter_key(id: VoterId) -> String {
    format!("{VOTER_KEY_PREFIX}{id}")
}

pub async fn read_document<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> StoreResult<Option<T>> {
    let Some(value) = store.get(key).await? else { return Ok(None) };

    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| StoreError::Deserialize { key: key.to_string(), source })
}

pub async fn write_document<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    document: &T,
) -> StoreResult<()> {
    let value = serde_json::to_value(document).map_err(StoreError::Encode)?;
    store.set(key, &value).await
}
