//! Board Column Component
//!
//! One drop target per visual column. Cards are re-rendered from the store,
//! so a committed move relocates the card with the next board refresh.

use board_core::VisualColumn;
use leptos::prelude::*;
use leptos_dragdrop::{make_on_column_dragleave, make_on_column_dragover, make_on_column_drop};

use crate::components::{BoardCard, QuickAdd};
use crate::context::AppContext;
use crate::store::{store_column_cards, use_app_store};

#[component]
pub fn BoardColumn(column: VisualColumn) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let dnd = ctx.dnd;

    let cards = move || store_column_cards(&store, column);
    let is_over = move || dnd.hover_column_read.get() == Some(column) && dnd.dragging_id_read.get().is_some();

    view! {
        <section
            class=move || if is_over() { "board-column drag-over" } else { "board-column" }
            data-column=column.as_str()
            on:dragover=make_on_column_dragover(dnd, column)
            on:dragleave=make_on_column_dragleave(dnd, column)
            on:drop=make_on_column_drop(dnd, column)
        >
            <header class="board-column-header">
                <h2>{column.label()}</h2>
                <span class="board-column-count">{move || cards().len()}</span>
            </header>
            <QuickAdd column=column />
            <div class="board-column-cards">
                <For
                    each=cards
                    key=|card| (card.id.clone(), card.task.updated_at.clone())
                    children=move |card| view! { <BoardCard card=card column=column /> }
                />
                <Show when=move || cards().is_empty()>
                    <div class="board-column-empty">{format!("No tasks in {}", column.label())}</div>
                </Show>
            </div>
        </section>
    }
}
