//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use board_core::BoardSync;
use leptos::prelude::*;
use leptos_dragdrop::DndSignals;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    sync: StoredValue<Rc<BoardSync>, LocalStorage>,
    pub dnd: DndSignals,
    /// Bumped by the sync listener whenever the cache changed
    pub board_version: ReadSignal<u32>,
}

impl AppContext {
    pub fn new(
        sync: Rc<BoardSync>,
        dnd: DndSignals,
        board_version: ReadSignal<u32>,
    ) -> Self {
        Self {
            sync: StoredValue::new_local(sync),
            dnd,
            board_version,
        }
    }

    pub fn sync(&self) -> Rc<BoardSync> {
        self.sync.get_value()
    }
}
