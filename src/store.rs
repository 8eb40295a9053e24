//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Everything here
//! is derived from the sync cache; the cache stays the source of truth.

use board_core::{BoardSummary, BoardSync, Bucket, Contact, HealthReport, TaskCard, VisualColumn};
use leptos::prelude::*;
use reactive_stores::Store;

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Filtered board, one bucket per visual column
    pub buckets: Vec<Bucket>,
    /// Counters over the unfiltered board
    pub summary: BoardSummary,
    pub contacts: Vec<Contact>,
    /// Last health probe result, `None` before the first probe
    pub health: Option<HealthReport>,
    /// Search box content
    pub query: String,
    /// Whether a snapshot was ever applied
    pub loaded: bool,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Rebuild board, summary and contacts from the sync cache
pub fn store_refresh_board(store: &AppStore, sync: &BoardSync) {
    let board = sync.board();
    let query = store.query().get_untracked();
    store.summary().set(BoardSummary::from_buckets(&board));
    store.buckets().set(board.filter(&query).buckets);
    store.contacts().set(sync.contacts());
    store.loaded().set(sync.cache().borrow().is_loaded());
}

pub fn store_set_query(store: &AppStore, query: String) {
    store.query().set(query);
}

pub fn store_set_health(store: &AppStore, report: HealthReport) {
    store.health().set(Some(report));
}

/// Cards of one column, empty before the first load
pub fn store_column_cards(store: &AppStore, column: VisualColumn) -> Vec<TaskCard> {
    store
        .buckets()
        .get()
        .into_iter()
        .find(|b| b.column == column)
        .map(|b| b.cards)
        .unwrap_or_default()
}

/// Initials and color for each assigned contact id that still exists
pub fn store_assignee_badges(store: &AppStore, ids: &[String]) -> Vec<(String, String)> {
    store.contacts().with(|contacts| {
        ids.iter()
            .filter_map(|id| contacts.iter().find(|c| &c.id == id))
            .map(|c| {
                let color = c.avatar_color.clone().unwrap_or_else(|| "#666".to_string());
                (c.initials.clone(), color)
            })
            .collect()
    })
}
