//! Task Board App
//!
//! Wires the sync engine, the reactive store and the drag/drop signals,
//! then lays out the four columns under the summary bar.

use std::rc::Rc;

use board_core::{BoardSync, GestureConfig, HttpStore, VisualColumn};
use leptos::prelude::*;
use leptos_dragdrop::create_dnd_signals;
use reactive_stores::Store;

use crate::commands;
use crate::components::{BoardColumn, HealthBadge, LogTail, SummaryBar};
use crate::context::AppContext;
use crate::settings;
use crate::store::{store_refresh_board, store_set_health, store_set_query, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = settings::load_store_config();
    log::info!("[APP] using store at {}", config.normalized_base());

    let store = Store::new(AppState::default());
    provide_context(store);

    let sync = Rc::new(BoardSync::new(Rc::new(HttpStore::new(config.clone()))));

    let gesture_sync = Rc::clone(&sync);
    let dnd = create_dnd_signals(GestureConfig::default(), move |resolution| {
        commands::apply_gesture(&gesture_sync, resolution);
    });

    let (board_version, set_board_version) = signal(0u32);
    sync.subscribe(move |collection| {
        log::debug!("[APP] {} changed", collection);
        set_board_version.update(|v| *v += 1);
    });

    let ctx = AppContext::new(Rc::clone(&sync), dnd, board_version);
    provide_context(ctx);

    // Re-derive the board whenever the cache or the search changes
    Effect::new(move |_| {
        let _ = board_version.get();
        let _ = store.query().get();
        store_refresh_board(&store, &ctx.sync());
    });

    commands::load_board(&sync);
    commands::spawn_health_loop(&sync, &config, move |report| store_set_health(&store, report));

    view! {
        <div class="app-layout">
            <header class="board-header">
                <h1>"Board"</h1>
                <input
                    type="search"
                    class="board-search"
                    placeholder="Find task"
                    prop:value=move || store.query().get()
                    on:input=move |ev| store_set_query(&store, event_target_value(&ev))
                />
                <button class="board-refresh" on:click=move |_| commands::refresh_tasks(&ctx.sync())>"Refresh"</button>
                <HealthBadge />
            </header>
            <SummaryBar />
            <Show
                when=move || store.loaded().get()
                fallback=|| view! { <div class="board-loading">"Loading board..."</div> }
            >
                <main class="board">
                    {VisualColumn::ALL.into_iter().map(|column| view! { <BoardColumn column=column /> }).collect_view()}
                </main>
            </Show>
            <LogTail />
        </div>
    }
}
