//! Log Tail Component
//!
//! Collapsible view of the most recent log lines kept by the logger.

use leptos::prelude::*;

use crate::context::AppContext;

const SHOWN_LINES: usize = 20;

#[component]
pub fn LogTail() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (open, set_open) = signal(false);

    let lines = move || {
        // re-read after every board change
        let _ = ctx.board_version.get();
        let all = rolling_logger::logger().map(|l| l.recent_lines()).unwrap_or_default();
        let skip = all.len().saturating_sub(SHOWN_LINES);
        all.into_iter().skip(skip).collect::<Vec<_>>()
    };

    view! {
        <div class="log-tail">
            <button class="log-tail-toggle" on:click=move |_| set_open.update(|v| *v = !*v)>
                {move || if open.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || open.get()>
                <pre class="log-tail-lines">{move || lines().join("\n")}</pre>
            </Show>
        </div>
    }
}
