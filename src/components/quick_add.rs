//! Quick Add Component
//!
//! Single-line form creating a task straight into a column.

use board_core::{TaskDraft, VisualColumn};
use leptos::prelude::*;

use crate::commands;
use crate::context::AppContext;

#[component]
pub fn QuickAdd(column: VisualColumn) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (title, set_title) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        let draft = TaskDraft {
            title: text,
            column: Some(column),
            ..Default::default()
        };
        commands::create_task(&ctx.sync(), draft);
        set_title.set(String::new());
    };

    view! {
        <form class="quick-add" on:submit=on_submit>
            <input
                type="text"
                placeholder="Add task..."
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <button type="submit">"+"</button>
        </form>
    }
}
