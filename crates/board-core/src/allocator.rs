//! Identifier Allocator
//!
//! The store has no sequences, so new ids are derived from the keys already
//! in the cache. Two strategies sit behind one trait so callers never care
//! which is active.
//!
//! Known limitation: two creates racing from different sessions can compute
//! the same id; the second PUT overwrites the first. Nothing detects this.

use crate::domain::RecordId;

pub trait IdAllocator {
    /// Next id for `prefix`, given the collection's keys in insertion order
    fn next_id(&self, prefix: &str, keys: &[&str]) -> RecordId;
}

/// Increments the number of the *last* key in insertion order.
///
/// This is the board's historical behavior and the default. If insertion
/// order stops matching numeric order (e.g. the highest record was deleted
/// and a lower one re-inserted later), the result can collide with an
/// existing lower-positioned record. Keys with another prefix or a
/// non-numeric suffix are passed over. An empty collection is seeded with
/// `{prefix}-000`, so the first id is `{prefix}-001`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastKeyAllocator;

impl IdAllocator for LastKeyAllocator {
    fn next_id(&self, prefix: &str, keys: &[&str]) -> RecordId {
        let last = keys
            .iter()
            .rev()
            .filter_map(|k| RecordId::parse(k))
            .find(|(p, _)| *p == prefix)
            .map_or(0, |(_, n)| n);
        RecordId::new(prefix, last + 1)
    }
}

/// Scans for the true maximum number, so ids never collide within one
/// session regardless of key order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxScanAllocator;

impl IdAllocator for MaxScanAllocator {
    fn next_id(&self, prefix: &str, keys: &[&str]) -> RecordId {
        let max = keys
            .iter()
            .filter_map(|k| RecordId::parse(k))
            .filter(|(p, _)| *p == prefix)
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0);
        RecordId::new(prefix, max + 1)
    }
}
