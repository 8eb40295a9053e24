//! Board Command Wrappers
//!
//! UI-facing entry points into `BoardSync`, organized by domain. Each one
//! updates the cache synchronously and pushes the write in the background.

mod task;
mod health;

use std::rc::Rc;

use board_core::{BoardSync, PendingWrite};
use leptos::task::spawn_local;

pub use task::*;
pub use health::*;

/// Send a staged write; a failure is logged and the optimistic state kept
fn push(sync: &Rc<BoardSync>, pending: PendingWrite) {
    let sync = Rc::clone(sync);
    spawn_local(async move {
        let _ = sync.flush(pending).await;
    });
}
