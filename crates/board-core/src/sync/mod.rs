//! Board Sync Service
//!
//! Entry points the UI calls. Each mutation updates the shared cache first
//! and then talks to the store:
//! - creates write first and only cache the record once the PUT succeeded,
//!   so a failed create leaves no trace
//! - updates, moves, subtask toggles and deletes merge into the cache
//!   synchronously and hand back a [`PendingWrite`]; the caller sends it
//!   with [`BoardSync::flush`] whenever it likes (usually a spawned task).
//!   A failed flush is logged and the cache keeps the optimistic state.
//!
//! Listeners registered with [`BoardSync::subscribe`] are told which
//! collection changed after every cache mutation and every fetch.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::allocator::{IdAllocator, LastKeyAllocator};
use crate::board::{BoardBuckets, BoardSummary};
use crate::cache::{LocalCache, SharedCache};
use crate::codec;
use crate::domain::{group_by_letter, now_stamp, Collection, Contact, ContactDraft, RecordId, RemoteColumn, Task, TaskDraft, VisualColumn};
use crate::error::{BoardError, BoardResult, StoreResult};
use crate::gesture::MoveCommit;
use crate::remote::{HealthReport, RemoteStore, StorePath};


/// A remote write whose cache side already happened
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub path: StorePath,
    /// Encoded record to PUT; `None` deletes the path
    pub body: Option<Value>,
}

impl PendingWrite {
    pub fn put(path: StorePath, body: Value) -> Self {
        Self { path, body: Some(body) }
    }

    pub fn delete(path: StorePath) -> Self {
        Self { path, body: None }
    }

    pub fn is_delete(&self) -> bool {
        self.body.is_none()
    }
}

type Listener = Box<dyn Fn(Collection)>;

pub struct BoardSync {
    store: Rc<dyn RemoteStore>,
    cache: SharedCache,
    allocator: Box<dyn IdAllocator>,
    listeners: RefCell<Vec<Listener>>,
}

impl BoardSync {
    pub fn new(store: Rc<dyn RemoteStore>) -> Self {
        Self::with_cache(store, LocalCache::shared())
    }

    pub fn with_cache(store: Rc<dyn RemoteStore>, cache: SharedCache) -> Self {
        Self {
            store,
            cache,
            allocator: Box::new(LastKeyAllocator),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Swap the id strategy (e.g. `MaxScanAllocator`)
    pub fn with_allocator(mut self, allocator: impl IdAllocator + 'static) -> Self {
        self.allocator = Box::new(allocator);
        self
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn store(&self) -> &Rc<dyn RemoteStore> {
        &self.store
    }

    pub fn subscribe(&self, listener: impl Fn(Collection) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn notify(&self, collection: Collection) {
        for listener in self.listeners.borrow().iter() {
            listener(collection);
        }
    }

    // ========================
    // Reads
    // ========================

    /// Fetch the whole snapshot into the cache.
    ///
    /// Returns `false` when the store could not be read. A cache that was
    /// never loaded becomes empty; a loaded one is left as it was.
    pub async fn load(&self) -> bool {
        let result = self.store.fetch(&StorePath::Root).await;
        let applied = match result {
            Ok(snapshot) => {
                self.cache.borrow_mut().populate(Some(&snapshot));
                true
            }
            Err(e) => {
                log::warn!("[sync] snapshot fetch failed: {}", e);
                let mut cache = self.cache.borrow_mut();
                if !cache.is_loaded() {
                    cache.populate(None);
                }
                false
            }
        };
        log::info!(
            "[sync] snapshot {}: {} tasks, {} contacts",
            if applied { "loaded" } else { "unavailable" },
            self.cache.borrow().len(Collection::Tasks),
            self.cache.borrow().len(Collection::Contacts)
        );
        for collection in Collection::ALL {
            self.notify(collection);
        }
        applied
    }

    /// Re-fetch one collection
    pub async fn refresh(&self, collection: Collection) -> bool {
        match self.store.fetch(&StorePath::Collection(collection)).await {
            Ok(subtree) => {
                self.cache.borrow_mut().replace_collection(collection, Some(&subtree));
                self.notify(collection);
                true
            }
            Err(e) => {
                log::warn!("[sync] {} fetch failed: {}", collection, e);
                false
            }
        }
    }

    pub fn board(&self) -> BoardBuckets {
        let cache = self.cache.borrow();
        BoardBuckets::group(cache.records(Collection::Tasks))
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary::from_buckets(&self.board())
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        let cache = self.cache.borrow();
        let record = cache.get(Collection::Tasks, id)?;
        serde_json::from_value(record.clone()).ok()
    }

    /// Contacts sorted by name; malformed records are skipped
    pub fn contacts(&self) -> Vec<Contact> {
        let cache = self.cache.borrow();
        let mut contacts: Vec<Contact> = cache
            .records(Collection::Contacts)
            .filter_map(|(id, record)| match serde_json::from_value::<Contact>(record.clone()) {
                Ok(mut contact) => {
                    if contact.id.is_empty() {
                        contact.id = id.to_string();
                    }
                    Some(contact)
                }
                Err(e) => {
                    log::warn!("[sync] skipping contact {}: {}", id, e);
                    None
                }
            })
            .collect();
        contacts.sort_by_key(|c| c.name.to_lowercase());
        contacts
    }

    /// Contacts grouped by the first letter of their name
    pub fn contact_groups(&self) -> Vec<(char, Vec<Contact>)> {
        group_by_letter(self.contacts())
    }

    /// Next free id in `collection`
    pub fn allocate_id(&self, collection: Collection) -> RecordId {
        let mut cache = self.cache.borrow_mut();
        cache.set_container(collection);
        let keys = cache.container_keys();
        self.allocator.next_id(collection.id_prefix(), &keys)
    }

    // ========================
    // Tasks
    // ========================

    /// Create a task from a validated draft. Fails without touching the
    /// cache when the store write fails.
    pub async fn create_task(&self, draft: TaskDraft) -> BoardResult<RecordId> {
        let id = self.allocate_id(Collection::Tasks);
        let task = draft.into_task(&id, &now_stamp());
        let record = to_record(&task)?;
        self.create_record(Collection::Tasks, id, record).await
    }

    /// Apply an edit from the task form
    pub fn update_task(&self, id: &str, draft: TaskDraft) -> BoardResult<PendingWrite> {
        let (mut record, mut task) = self.load_task(id)?;
        let before = to_record(&task)?;
        draft.apply_to(&mut task, &now_stamp());
        patch_changed(&mut record, &before, to_record(&task)?)?;
        Ok(self.stage_put(Collection::Tasks, id, record))
    }

    /// Move a task to another column. `None` when it already is there.
    pub fn move_task(&self, id: &str, to: VisualColumn) -> BoardResult<Option<PendingWrite>> {
        let mut record = self.record(Collection::Tasks, id)?;
        let current = record
            .get("columnID")
            .and_then(Value::as_str)
            .and_then(RemoteColumn::parse)
            .map(RemoteColumn::to_visual);
        if current == Some(to) {
            log::debug!("[sync] {} already in {}, nothing to move", id, to);
            return Ok(None);
        }
        let Value::Object(fields) = &mut record else {
            return Err(BoardError::Malformed(format!("task {} is not an object", id)));
        };
        fields.insert("columnID".to_string(), Value::String(to.to_remote().as_str().to_string()));
        fields.insert("updatedAt".to_string(), Value::String(now_stamp()));
        log::info!("[sync] moving {} to {}", id, to);
        Ok(Some(self.stage_put(Collection::Tasks, id, record)))
    }

    /// Persist the outcome of a drag gesture
    pub fn apply_move(&self, commit: &MoveCommit) -> BoardResult<Option<PendingWrite>> {
        self.move_task(&commit.task_id, commit.to)
    }

    /// Flip one subtask checkbox and recount. Only `checkedSubtasks`,
    /// `subtasksCompleted` and `updatedAt` are written.
    pub fn toggle_subtask(&self, id: &str, index: usize) -> BoardResult<PendingWrite> {
        let mut record = self.record(Collection::Tasks, id)?;
        let Value::Object(fields) = &mut record else {
            return Err(BoardError::Malformed(format!("task {} is not an object", id)));
        };
        let total = fields.get("totalSubtasks").and_then(Value::as_array).map_or(0, Vec::len);
        let mut checked: Vec<bool> = match fields.get("checkedSubtasks") {
            None => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(|v| v.as_bool().unwrap_or(false)).collect(),
            Some(other) => return Err(BoardError::Malformed(format!("task {} checkedSubtasks: {}", id, other))),
        };
        if total != checked.len() {
            return Err(BoardError::SubtaskMismatch {
                id: id.to_string(),
                total,
                checked: checked.len(),
            });
        }
        let len = checked.len();
        let Some(flag) = checked.get_mut(index) else {
            return Err(BoardError::SubtaskOutOfRange { id: id.to_string(), index, len });
        };
        *flag = !*flag;
        let completed = checked.iter().filter(|c| **c).count();
        fields.insert("checkedSubtasks".to_string(), Value::from(checked));
        fields.insert("subtasksCompleted".to_string(), Value::from(completed));
        fields.insert("updatedAt".to_string(), Value::String(now_stamp()));
        Ok(self.stage_put(Collection::Tasks, id, record))
    }

    pub fn delete_task(&self, id: &str) -> BoardResult<PendingWrite> {
        self.record(Collection::Tasks, id)?;
        Ok(self.stage_delete(Collection::Tasks, id))
    }

    // ========================
    // Contacts
    // ========================

    pub async fn create_contact(&self, draft: ContactDraft) -> BoardResult<RecordId> {
        let id = self.allocate_id(Collection::Contacts);
        let contact = draft.into_contact(&id);
        let record = to_record(&contact)?;
        self.create_record(Collection::Contacts, id, record).await
    }

    pub fn update_contact(&self, id: &str, draft: ContactDraft) -> BoardResult<PendingWrite> {
        let mut record = self.record(Collection::Contacts, id)?;
        let mut contact: Contact =
            serde_json::from_value(record.clone()).map_err(|e| BoardError::Malformed(format!("contact {}: {}", id, e)))?;
        if contact.id.is_empty() {
            contact.id = id.to_string();
        }
        let before = to_record(&contact)?;
        draft.apply_to(&mut contact);
        patch_changed(&mut record, &before, to_record(&contact)?)?;
        Ok(self.stage_put(Collection::Contacts, id, record))
    }

    /// Delete a contact and unassign it from every task. The first write
    /// deletes the contact; the rest are best-effort task updates.
    pub fn delete_contact(&self, id: &str) -> BoardResult<Vec<PendingWrite>> {
        self.record(Collection::Contacts, id)?;
        let mut writes = vec![self.stage_delete(Collection::Contacts, id)];

        let affected: Vec<(String, Value)> = {
            let cache = self.cache.borrow();
            cache
                .records(Collection::Tasks)
                .filter(|(_, record)| {
                    record
                        .get("assignedUsers")
                        .and_then(Value::as_array)
                        .is_some_and(|users| users.iter().any(|u| u.as_str() == Some(id)))
                })
                .map(|(task_id, record)| (task_id.to_string(), record.clone()))
                .collect()
        };
        for (task_id, mut record) in affected {
            if let Some(Value::Array(users)) = record.get_mut("assignedUsers") {
                users.retain(|u| u.as_str() != Some(id));
            }
            writes.push(self.stage_put(Collection::Tasks, &task_id, record));
        }
        Ok(writes)
    }

    // ========================
    // Store access
    // ========================

    /// Send a staged write. Failure is logged and returned; the cache is
    /// not rolled back.
    pub async fn flush(&self, pending: PendingWrite) -> StoreResult<()> {
        let result = match &pending.body {
            Some(body) => self.store.put(&pending.path, body).await,
            None => self.store.delete(&pending.path).await,
        };
        if let Err(e) = &result {
            log::warn!("[sync] write to {} failed, keeping optimistic state: {}", pending.path, e);
        }
        result
    }

    /// Send several writes in order; returns how many failed
    pub async fn flush_all(&self, writes: Vec<PendingWrite>) -> usize {
        let mut failed = 0;
        for pending in writes {
            if self.flush(pending).await.is_err() {
                failed += 1;
            }
        }
        failed
    }

    pub async fn probe(&self, timeout: Duration) -> HealthReport {
        self.store.probe(timeout).await
    }

    // ========================
    // Helpers
    // ========================

    async fn create_record(&self, collection: Collection, id: RecordId, record: Value) -> BoardResult<RecordId> {
        let path = StorePath::record(collection, &id);
        if let Err(e) = self.store.put(&path, &codec::encode(&record)).await {
            log::error!("[sync] creating {} failed: {}", path, e);
            return Err(e.into());
        }
        self.cache.borrow_mut().merge(collection, id.as_str(), Some(record));
        log::info!("[sync] created {}", id);
        self.notify(collection);
        Ok(id)
    }

    fn record(&self, collection: Collection, id: &str) -> BoardResult<Value> {
        self.cache
            .borrow()
            .get(collection, id)
            .cloned()
            .ok_or_else(|| BoardError::NotFound { collection, id: id.to_string() })
    }

    fn load_task(&self, id: &str) -> BoardResult<(Value, Task)> {
        let record = self.record(Collection::Tasks, id)?;
        let task = serde_json::from_value(record.clone()).map_err(|e| BoardError::Malformed(format!("task {}: {}", id, e)))?;
        Ok((record, task))
    }

    fn stage_put(&self, collection: Collection, id: &str, record: Value) -> PendingWrite {
        let body = codec::encode(&record);
        self.cache.borrow_mut().merge(collection, id, Some(record));
        self.notify(collection);
        PendingWrite::put(StorePath::Record(collection, RecordId::from_key(id)), body)
    }

    fn stage_delete(&self, collection: Collection, id: &str) -> PendingWrite {
        self.cache.borrow_mut().merge(collection, id, None);
        self.notify(collection);
        PendingWrite::delete(StorePath::Record(collection, RecordId::from_key(id)))
    }
}

fn to_record<T: Serialize>(value: &T) -> BoardResult<Value> {
    serde_json::to_value(value).map_err(|e| BoardError::Malformed(e.to_string()))
}

/// Write into `record` the fields whose typed value differs between
/// `before` and `after`. Fields the edit left alone keep their stored form,
/// and fields the record never had stay absent.
fn patch_changed(record: &mut Value, before: &Value, after: Value) -> BoardResult<()> {
    let Value::Object(fields) = record else {
        return Err(BoardError::Malformed("record is not an object".to_string()));
    };
    let Value::Object(after) = after else {
        return Err(BoardError::Malformed("edited record is not an object".to_string()));
    };
    if let Value::Object(before) = before {
        for key in before.keys().filter(|k| !after.contains_key(*k)) {
            fields.shift_remove(key);
        }
    }
    for (key, value) in after {
        if before.get(&key) != Some(&value) {
            fields.insert(key, value);
        }
    }
    Ok(())
}
