use std::rc::Rc;

use board_core::{BoardSync, Collection, Resolution, TaskDraft};
use leptos::task::spawn_local;

use super::push;

/// Outcome of a finished drag gesture
pub fn apply_gesture(sync: &Rc<BoardSync>, resolution: Resolution) {
    let Resolution::Commit(commit) = resolution else {
        return;
    };
    match sync.apply_move(&commit) {
        Ok(Some(pending)) => push(sync, pending),
        Ok(None) => {}
        Err(e) => log::warn!("[APP] move of {} rejected: {}", commit.task_id, e),
    }
}

/// Create a task; it shows up once the store accepted it
pub fn create_task(sync: &Rc<BoardSync>, draft: TaskDraft) {
    let sync = Rc::clone(sync);
    spawn_local(async move {
        match sync.create_task(draft).await {
            Ok(id) => log::info!("[APP] created {}", id),
            Err(e) => log::error!("[APP] create task failed: {}", e),
        }
    });
}

pub fn toggle_subtask(sync: &Rc<BoardSync>, id: &str, index: usize) {
    match sync.toggle_subtask(id, index) {
        Ok(pending) => push(sync, pending),
        Err(e) => log::warn!("[APP] toggle subtask {} of {}: {}", index, id, e),
    }
}

pub fn delete_task(sync: &Rc<BoardSync>, id: &str) {
    match sync.delete_task(id) {
        Ok(pending) => push(sync, pending),
        Err(e) => log::warn!("[APP] delete {}: {}", id, e),
    }
}

/// Initial snapshot load
pub fn load_board(sync: &Rc<BoardSync>) {
    let sync = Rc::clone(sync);
    spawn_local(async move {
        if !sync.load().await {
            log::warn!("[APP] store unreachable, showing cached board");
        }
    });
}

/// Re-read the task collection only
pub fn refresh_tasks(sync: &Rc<BoardSync>) {
    let sync = Rc::clone(sync);
    spawn_local(async move {
        sync.refresh(Collection::Tasks).await;
    });
}
