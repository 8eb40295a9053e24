//! In-Memory Store
//!
//! A path-addressed JSON tree held in memory. Records every call so tests
//! can assert on the exact writes a flow produced; also works as an offline
//! backend.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{HealthReport, RemoteStore, StorePath};
use crate::error::{StoreError, StoreResult};

/// One operation seen by the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Get(String),
    Put(String, Value),
    Delete(String),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RefCell<Value>,
    calls: RefCell<Vec<StoreCall>>,
    fail_writes: Cell<bool>,
    offline: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn with_snapshot(snapshot: Value) -> Self {
        let store = Self::new();
        *store.root.borrow_mut() = snapshot;
        store
    }

    /// Make every PUT/DELETE answer with a 500
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every call fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    /// Only the PUT/DELETE calls
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, StoreCall::Get(_)))
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.get() {
            return Err(StoreError::Transport("store offline".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> StoreResult<()> {
        self.check_online()?;
        if self.fail_writes.get() {
            return Err(StoreError::Status {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    fn write(&self, path: &StorePath, value: Value) {
        let segments = path.segments();
        let mut root = self.root.borrow_mut();
        let Some((last, parents)) = segments.split_last() else {
            *root = value;
            return;
        };

        let mut node: &mut Value = &mut root;
        for seg in parents {
            node = ensure_object(node)
                .entry(seg.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let map = ensure_object(node);
        if value.is_null() {
            map.shift_remove(*last);
        } else {
            map.insert(last.to_string(), value);
        }
    }

    fn read(&self, path: &StorePath) -> Value {
        let root = self.root.borrow();
        let mut node = &*root;
        for seg in path.segments() {
            match node.get(seg) {
                Some(child) => node = child,
                None => return Value::Null,
            }
        }
        node.clone()
    }
}

/// Turn `node` into an object if it is anything else
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

#[async_trait(?Send)]
impl RemoteStore for MemoryStore {
    async fn fetch(&self, path: &StorePath) -> StoreResult<Value> {
        self.record(StoreCall::Get(path.to_url_path()));
        self.check_online()?;
        Ok(self.read(path))
    }

    async fn put(&self, path: &StorePath, value: &Value) -> StoreResult<()> {
        self.record(StoreCall::Put(path.to_url_path(), value.clone()));
        self.check_writable()?;
        self.write(path, value.clone());
        Ok(())
    }

    async fn delete(&self, path: &StorePath) -> StoreResult<()> {
        self.record(StoreCall::Delete(path.to_url_path()));
        self.check_writable()?;
        self.write(path, Value::Null);
        Ok(())
    }

    async fn probe(&self, _timeout: Duration) -> HealthReport {
        if self.offline.get() {
            HealthReport::unreachable("store offline")
        } else {
            HealthReport {
                ok: true,
                status: 200,
                status_text: "OK".to_string(),
                timed_out: false,
            }
        }
    }
}
