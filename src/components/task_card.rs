//! Task Card Component
//!
//! Draggable card with subtask progress, assignee badges and priority.
//! Mouse and pen use native drag events; touch goes through the emulated
//! drag in `leptos_dragdrop`.

use board_core::{TaskCard, VisualColumn};
use leptos::prelude::*;
use leptos_dragdrop::{
    make_on_dragend, make_on_dragstart, make_on_touchcancel, make_on_touchend, make_on_touchmove,
    make_on_touchstart,
};

use crate::commands;
use crate::context::AppContext;
use crate::store::{store_assignee_badges, use_app_store};

#[component]
pub fn BoardCard(card: TaskCard, column: VisualColumn) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let dnd = ctx.dnd;

    let id = card.id;
    let task = card.task;
    let element_id = format!("card-{}", id);
    let (done, total) = task.subtask_progress();
    let progress = if total == 0 { 0 } else { done * 100 / total };
    let (expanded, set_expanded) = signal(false);

    let assigned = task.assigned_users.clone();
    let badges = move || store_assignee_badges(&store, &assigned);

    let drag_id = id.clone();
    let is_dragging = move || dnd.dragging_id_read.get().as_deref() == Some(drag_id.as_str());

    let delete_id = id.clone();
    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        commands::delete_task(&ctx.sync(), &delete_id);
    };

    let on_click = move |_: web_sys::MouseEvent| {
        // a drag that just ended also fires click
        if !dnd.drag_just_ended_read.get_untracked() {
            set_expanded.update(|v| *v = !*v);
        }
    };

    // mismatched lists cannot be toggled safely
    let editable = task.subtasks_consistent();
    let subtask_id = id.clone();
    let subtasks = task
        .total_subtasks
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, text)| {
            let checked = task.checked_subtasks.get(index).copied().unwrap_or(false);
            let toggle_id = subtask_id.clone();
            view! {
                <li class="subtask">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=checked
                            prop:disabled=!editable
                            on:click=move |ev| ev.stop_propagation()
                            on:change=move |_| commands::toggle_subtask(&ctx.sync(), &toggle_id, index)
                        />
                        {text}
                    </label>
                </li>
            }
        })
        .collect_view();

    view! {
        <article
            id=element_id.clone()
            class=move || if is_dragging() { "task-card dragging" } else { "task-card" }
            draggable="true"
            on:click=on_click
            on:dragstart=make_on_dragstart(dnd, id.clone(), column)
            on:dragend=make_on_dragend(dnd)
            on:touchstart=make_on_touchstart(dnd, id.clone(), column)
            on:touchmove=make_on_touchmove(dnd, element_id.clone())
            on:touchend=make_on_touchend(dnd, element_id.clone())
            on:touchcancel=make_on_touchcancel(dnd, element_id.clone())
        >
            <span class=format!("task-category category-{}", task.category.as_str().replace(' ', "-").to_lowercase())>
                {task.category.as_str()}
            </span>
            <h3 class="task-title">{task.title.clone()}</h3>
            <p class="task-description">{task.description.clone()}</p>
            <Show when={move || total > 0}>
                <div class="subtask-progress">
                    <div class="subtask-bar">
                        <div class="subtask-fill" style=format!("width: {}%;", progress)></div>
                    </div>
                    <span class="subtask-count">{format!("{}/{} Subtasks", done, total)}</span>
                </div>
            </Show>
            <ul class="subtask-list" style:display=move || if expanded.get() { "block" } else { "none" }>
                {subtasks}
            </ul>
            <footer class="task-footer">
                <div class="task-assignees">
                    {move || badges().into_iter().map(|(initials, color)| view! {
                        <span class="assignee-badge" style=format!("background-color: {};", color)>{initials}</span>
                    }).collect_view()}
                </div>
                <span class=format!("task-priority priority-{}", task.priority.as_str())>{task.priority.as_str()}</span>
                <button class="task-delete" title="Delete task" on:click=on_delete>"×"</button>
            </footer>
        </article>
    }
}
