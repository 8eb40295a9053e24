//! Summary Bar Component

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SummaryBar() -> impl IntoView {
    let store = use_app_store();
    let summary = move || store.summary().get();

    view! {
        <div class="summary-bar">
            <div class="summary-tile"><strong>{move || summary().to_do}</strong>" To do"</div>
            <div class="summary-tile"><strong>{move || summary().in_progress}</strong>" In progress"</div>
            <div class="summary-tile"><strong>{move || summary().await_feedback}</strong>" Awaiting feedback"</div>
            <div class="summary-tile"><strong>{move || summary().done}</strong>" Done"</div>
            <div class="summary-tile urgent">
                <strong>{move || summary().urgent}</strong>" Urgent"
                {move || summary().next_urgent_deadline.map(|d| view! {
                    <span class="summary-deadline">{format!(" next due {}", d.format("%d.%m.%Y"))}</span>
                })}
            </div>
            <div class="summary-tile"><strong>{move || summary().total}</strong>" Total"</div>
        </div>
    }
}
