//! Board Core
//!
//! Sync engine behind the task board:
//! - domain: tasks, contacts, record ids, column mapping
//! - remote: path-addressed JSON store client (HTTP and in-memory)
//! - codec: array canonicalization at the wire boundary
//! - cache: optimistic in-memory mirror of the remote collections
//! - allocator: `{prefix}-{NNN}` id allocation
//! - board: column grouping and summary counters
//! - gesture: drag/move state machine shared by pointer and touch input
//! - sync: the service tying the above together

pub mod allocator;
pub mod board;
pub mod cache;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod gesture;
pub mod remote;
pub mod sync;

pub use allocator::{IdAllocator, LastKeyAllocator, MaxScanAllocator};
pub use board::{BoardBuckets, BoardSummary, Bucket, TaskCard};
pub use cache::{LocalCache, SharedCache};
pub use config::StoreConfig;
pub use domain::{Collection, Contact, ContactDraft, Priority, RecordId, RemoteColumn, Task, TaskCategory, TaskDraft, VisualColumn};
pub use error::{BoardError, BoardResult, ConfigError, StoreError, StoreResult};
pub use gesture::{GestureConfig, GestureMachine, InputKind, MoveCommit, Point, Resolution};
pub use remote::{HealthReport, HttpStore, MemoryStore, RemoteStore, StorePath};
pub use sync::{BoardSync, PendingWrite};
