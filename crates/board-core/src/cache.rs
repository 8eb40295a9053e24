//! Local Cache
//!
//! In-memory mirror of the remote collections. Mutations land here
//! synchronously before the matching remote write is issued, so a re-render
//! right after a mutation already sees the new state. A failed write does
//! not roll anything back; the next full fetch replaces the cache.
//!
//! Records keep insertion order (the allocator depends on it).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::codec;
use crate::domain::Collection;

/// Handle shared by every component of the running session
pub type SharedCache = Rc<RefCell<LocalCache>>;

#[derive(Debug, Clone)]
pub struct LocalCache {
    collections: HashMap<Collection, Map<String, Value>>,
    container: Collection,
    loaded: bool,
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCache {
    pub fn new() -> Self {
        Self {
            collections: Collection::ALL.iter().map(|c| (*c, Map::new())).collect(),
            container: Collection::Tasks,
            loaded: false,
        }
    }

    pub fn shared() -> SharedCache {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Select the collection that allocator and read helpers address
    pub fn set_container(&mut self, collection: Collection) {
        self.container = collection;
    }

    pub fn container(&self) -> Collection {
        self.container
    }

    /// True once a remote snapshot has been applied
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace every collection from a fetched root snapshot.
    ///
    /// Missing or non-object subtrees become empty collections, and
    /// non-object records are skipped. Records are decoded from wire shape.
    pub fn populate(&mut self, snapshot: Option<&Value>) {
        for collection in Collection::ALL {
            let subtree = snapshot.and_then(|s| s.get(collection.name()));
            self.replace_collection(collection, subtree);
        }
        self.loaded = true;
    }

    /// Replace one collection from its fetched subtree
    pub fn replace_collection(&mut self, collection: Collection, subtree: Option<&Value>) {
        let records = match subtree {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(id, record)| {
                    let keep = record.is_object();
                    if !keep {
                        log::warn!("[cache] skipping malformed {} record {}", collection, id);
                    }
                    keep
                })
                .map(|(id, record)| (id.clone(), codec::decode(record)))
                .collect(),
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                log::warn!("[cache] {} subtree is not an object ({}), treating as empty", collection, kind_of(other));
                Map::new()
            }
        };
        self.collections.insert(collection, records);
    }

    /// Optimistic upsert (`Some`) or delete (`None`). An update keeps the
    /// record's position; a delete preserves the order of the rest.
    pub fn merge(&mut self, collection: Collection, id: &str, record: Option<Value>) {
        let records = self.collections.entry(collection).or_default();
        match record {
            Some(value) => {
                records.insert(id.to_string(), value);
            }
            None => {
                records.shift_remove(id);
            }
        }
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<&Value> {
        self.collections.get(&collection).and_then(|m| m.get(id))
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        self.get(collection, id).is_some()
    }

    /// Keys of a collection in insertion order
    pub fn keys(&self, collection: Collection) -> Vec<&str> {
        self.collections
            .get(&collection)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Keys of the selected container
    pub fn container_keys(&self) -> Vec<&str> {
        self.keys(self.container)
    }

    pub fn records(&self, collection: Collection) -> impl Iterator<Item = (&str, &Value)> {
        self.collections
            .get(&collection)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Map::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_populate_decodes_and_keeps_order() {
        let mut cache = LocalCache::new();
        let snapshot = json!({
            "tasks": {
                "task-002": {"title": "b", "labels": [[0, "x"], [1, "y"]]},
                "task-001": {"title": "a"}
            },
            "contacts": {"contact-001": {"name": "Eva"}}
        });
        cache.populate(Some(&snapshot));
        assert!(cache.is_loaded());
        assert_eq!(cache.keys(Collection::Tasks), vec!["task-002", "task-001"]);
        assert_eq!(cache.get(Collection::Tasks, "task-002").unwrap()["labels"], json!(["x", "y"]));
        assert_eq!(cache.len(Collection::Contacts), 1);
    }

    #[test]
    fn test_populate_tolerates_malformed_snapshot() {
        let mut cache = LocalCache::new();
        cache.populate(Some(&json!({"tasks": "oops", "contacts": {"contact-001": 5}})));
        assert!(cache.is_empty(Collection::Tasks));
        assert!(cache.is_empty(Collection::Contacts));

        cache.populate(None);
        assert!(cache.is_loaded());
        assert!(cache.is_empty(Collection::Tasks));
    }

    #[test]
    fn test_merge_upsert_and_delete() {
        let mut cache = LocalCache::new();
        cache.merge(Collection::Tasks, "task-001", Some(json!({"title": "a"})));
        cache.merge(Collection::Tasks, "task-002", Some(json!({"title": "b"})));
        cache.merge(Collection::Tasks, "task-003", Some(json!({"title": "c"})));
        cache.merge(Collection::Tasks, "task-001", Some(json!({"title": "a2"})));
        assert_eq!(cache.keys(Collection::Tasks), vec!["task-001", "task-002", "task-003"]);
        assert_eq!(cache.get(Collection::Tasks, "task-001").unwrap()["title"], "a2");

        cache.merge(Collection::Tasks, "task-002", None);
        assert_eq!(cache.keys(Collection::Tasks), vec!["task-001", "task-003"]);
        assert!(!cache.contains(Collection::Tasks, "task-002"));
    }

    #[test]
    fn test_last_merge_wins() {
        let mut cache = LocalCache::new();
        cache.merge(Collection::Tasks, "task-001", Some(json!({"columnID": "toDo"})));
        cache.merge(Collection::Tasks, "task-001", Some(json!({"columnID": "done"})));
        assert_eq!(cache.get(Collection::Tasks, "task-001").unwrap()["columnID"], "done");
    }

    #[test]
    fn test_container_selection() {
        let mut cache = LocalCache::new();
        cache.merge(Collection::Contacts, "contact-001", Some(json!({})));
        assert!(cache.container_keys().is_empty());
        cache.set_container(Collection::Contacts);
        assert_eq!(cache.container_keys(), vec!["contact-001"]);
    }
}
