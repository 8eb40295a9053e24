//! Remote Store Client
//!
//! Path-addressed JSON store: GET returns a subtree, PUT replaces one,
//! DELETE removes one. There is no batching and no subscription; a live
//! update is a full re-fetch.

mod http;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Collection, RecordId};
use crate::error::StoreResult;

pub use http::HttpStore;
pub use memory::{MemoryStore, StoreCall};

/// Characters escaped inside a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'.')
    .add(b'$');

/// Address of a subtree in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorePath {
    /// Whole snapshot
    Root,
    /// `{collection}.json`
    Collection(Collection),
    /// `{collection}/{id}.json`
    Record(Collection, RecordId),
}

impl StorePath {
    pub fn record(collection: Collection, id: &RecordId) -> Self {
        StorePath::Record(collection, id.clone())
    }

    /// Raw (unencoded) segments from the root
    pub fn segments(&self) -> Vec<&str> {
        match self {
            StorePath::Root => Vec::new(),
            StorePath::Collection(c) => vec![c.name()],
            StorePath::Record(c, id) => vec![c.name(), id.as_str()],
        }
    }

    /// URL path relative to the store base, including the `.json` suffix
    pub fn to_url_path(&self) -> String {
        let encoded: Vec<String> = self
            .segments()
            .iter()
            .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
            .collect();
        format!("{}.json", encoded.join("/"))
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url_path())
    }
}

/// Result of the health probe, consumed by the status badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub timed_out: bool,
}

impl HealthReport {
    pub fn timed_out() -> Self {
        Self {
            ok: false,
            status: 0,
            status_text: "Timed out".to_string(),
            timed_out: true,
        }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: 0,
            status_text: reason.into(),
            timed_out: false,
        }
    }
}

/// Access to the remote JSON tree.
///
/// Execution is single threaded, so implementations do not need to be `Send`.
#[async_trait(?Send)]
pub trait RemoteStore {
    /// GET a subtree; JSON `null` means "absent"
    async fn fetch(&self, path: &StorePath) -> StoreResult<Value>;

    /// PUT a subtree, replacing what was there
    async fn put(&self, path: &StorePath, value: &Value) -> StoreResult<()>;

    /// Remove a subtree
    async fn delete(&self, path: &StorePath) -> StoreResult<()>;

    /// Reachability check against the root, aborted after `timeout`
    async fn probe(&self, timeout: Duration) -> HealthReport;

    /// GET that degrades to `None` on failure or absence, logging the failure
    async fn get(&self, path: &StorePath) -> Option<Value> {
        match self.fetch(path).await {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("[store] GET {} failed: {}", path, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_paths() {
        assert_eq!(StorePath::Root.to_url_path(), ".json");
        assert_eq!(StorePath::Collection(Collection::Tasks).to_url_path(), "tasks.json");
        let id = RecordId::new("task", 3);
        assert_eq!(StorePath::record(Collection::Tasks, &id).to_url_path(), "tasks/task-003.json");
    }

    #[test]
    fn test_segments_are_encoded() {
        let path = StorePath::Record(Collection::Contacts, RecordId::from_key("a b/c"));
        assert_eq!(path.to_url_path(), "contacts/a%20b%2Fc.json");
    }
}
