//! Leptos DragDrop Utilities
//!
//! Moves board cards between columns. Two thin adapters feed one
//! `board_core::GestureMachine`:
//! - native HTML5 drag events (mouse, pen): the card id travels in the
//!   transfer payload, the drop target is the column that got `drop`
//! - touch emulation: the card follows the finger as a ghost once it moved
//!   past the threshold, the drop target is hit-tested under the final touch
//!
//! Columns are found through their `data-column` attribute.

mod ghost;

use board_core::gesture::GestureStep;
use board_core::{GestureConfig, GestureMachine, InputKind, Point, Resolution, VisualColumn};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, TouchEvent, TouchList};

pub use ghost::{clear_ghost, place_ghost};

/// Attribute carrying a column's visual id
pub const DATA_COLUMN_ATTR: &str = "data-column";
/// Transfer format for the dragged card id
pub const TRANSFER_FORMAT: &str = "text/plain";
/// How long clicks are ignored after a drag ended (ms)
const CLICK_SUPPRESS_MS: i32 = 100;

/// DnD state shared by every card and column
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Card currently being dragged (for styling)
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    /// Column under the pointer/finger
    pub hover_column_read: ReadSignal<Option<VisualColumn>>,
    pub hover_column_write: WriteSignal<Option<VisualColumn>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    machine: StoredValue<GestureMachine>,
    on_resolve: StoredValue<Box<dyn Fn(Resolution)>, LocalStorage>,
}

/// Create the DnD state. `on_resolve` runs once per finished gesture.
pub fn create_dnd_signals<F>(config: GestureConfig, on_resolve: F) -> DndSignals
where
    F: Fn(Resolution) + 'static,
{
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (hover_column_read, hover_column_write) = signal(None::<VisualColumn>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let on_resolve: Box<dyn Fn(Resolution)> = Box::new(on_resolve);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        hover_column_read,
        hover_column_write,
        drag_just_ended_read,
        drag_just_ended_write,
        machine: StoredValue::new(GestureMachine::new(config)),
        on_resolve: StoredValue::new_local(on_resolve),
    }
}

impl DndSignals {
    pub fn is_dragging(&self) -> bool {
        self.machine.with_value(GestureMachine::is_dragging)
    }

    /// Touch handlers leave native pointer drags alone
    fn is_touch(&self) -> bool {
        self.machine.with_value(|m| m.input() == Some(InputKind::Touch))
    }
}

/// Finish the gesture in progress, reset transient state and report the
/// outcome. `payload` is the id from a native transfer; a mismatch with the
/// tracked gesture cancels.
fn resolve(dnd: &DndSignals, target: Option<VisualColumn>, payload: Option<String>) {
    let resolution = dnd
        .machine
        .try_update_value(|m| {
            let matches = match payload.as_deref() {
                Some(id) if !id.is_empty() => m.active_task() == Some(id),
                _ => true,
            };
            if matches {
                m.finish(target)
            } else {
                log::warn!("[dnd] transfer payload {:?} does not match active gesture", payload);
                m.cancel();
                Some(Resolution::Cancelled)
            }
        })
        .flatten();

    end_drag(dnd);
    if let Some(resolution) = resolution {
        log::debug!("[dnd] gesture resolved: {:?}", resolution);
        dnd.on_resolve.with_value(|f| f(resolution));
    }
}

/// Clear drag styling and briefly suppress clicks
pub fn end_drag(dnd: &DndSignals) {
    let was_dragging = dnd.dragging_id_read.get_untracked().is_some();
    dnd.dragging_id_write.set(None);
    dnd.hover_column_write.set(None);
    if !was_dragging {
        return;
    }
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), CLICK_SUPPRESS_MS);
        cb.forget();
    }
}

// ========================
// Native drag pipeline
// ========================

/// `dragstart` on a card
pub fn make_on_dragstart(dnd: DndSignals, task_id: String, source: VisualColumn) -> impl Fn(DragEvent) + 'static {
    move |ev: DragEvent| {
        if let Some(dt) = ev.data_transfer() {
            let _ = dt.set_data(TRANSFER_FORMAT, &task_id);
            dt.set_effect_allowed("move");
        }
        let at = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
        dnd.machine.update_value(|m| {
            m.start(task_id.clone(), source, at, InputKind::Pointer);
            m.begin_native();
        });
        dnd.dragging_id_write.set(Some(task_id.clone()));
    }
}

/// `dragend` on a card; resolves as cancelled unless `drop` already did
pub fn make_on_dragend(dnd: DndSignals) -> impl Fn(DragEvent) + 'static {
    move |_ev: DragEvent| resolve(&dnd, None, None)
}

/// `dragover` on a column; accepting the drop needs `preventDefault`
pub fn make_on_column_dragover(dnd: DndSignals, column: VisualColumn) -> impl Fn(DragEvent) + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        if dnd.hover_column_read.get_untracked() != Some(column) {
            dnd.hover_column_write.set(Some(column));
        }
    }
}

pub fn make_on_column_dragleave(dnd: DndSignals, column: VisualColumn) -> impl Fn(DragEvent) + 'static {
    move |_ev: DragEvent| {
        if dnd.hover_column_read.get_untracked() == Some(column) {
            dnd.hover_column_write.set(None);
        }
    }
}

/// `drop` on a column
pub fn make_on_column_drop(dnd: DndSignals, column: VisualColumn) -> impl Fn(DragEvent) + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        let payload = ev.data_transfer().and_then(|dt| dt.get_data(TRANSFER_FORMAT).ok());
        resolve(&dnd, Some(column), payload);
    }
}

// ========================
// Touch emulation pipeline
// ========================

fn first_point(list: &TouchList) -> Option<Point> {
    list.get(0)
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
}

/// Column under a viewport point, found by walking up to `[data-column]`
pub fn column_at_point(at: Point) -> Option<VisualColumn> {
    let document = web_sys::window()?.document()?;
    let hit = document.element_from_point(at.x as f32, at.y as f32)?;
    let column = hit.closest(&format!("[{}]", DATA_COLUMN_ATTR)).ok()??;
    VisualColumn::parse(&column.get_attribute(DATA_COLUMN_ATTR)?)
}

/// `touchstart` on a card: arm the gesture
pub fn make_on_touchstart(dnd: DndSignals, task_id: String, source: VisualColumn) -> impl Fn(TouchEvent) + 'static {
    move |ev: TouchEvent| {
        if let Some(at) = first_point(&ev.touches()) {
            dnd.machine.update_value(|m| m.start(task_id.clone(), source, at, InputKind::Touch));
        }
    }
}

/// `touchmove` on a card: start or continue the emulated drag
pub fn make_on_touchmove(dnd: DndSignals, element_id: String) -> impl Fn(TouchEvent) + 'static {
    move |ev: TouchEvent| {
        if !dnd.is_touch() {
            return;
        }
        let Some(at) = first_point(&ev.touches()) else { return };
        let step = dnd.machine.try_update_value(|m| m.move_to(at)).unwrap_or(GestureStep::Ignored);
        match step {
            GestureStep::Began(offset) => {
                ev.prevent_default();
                let active = dnd.machine.with_value(|m| m.active_task().map(str::to_string));
                dnd.dragging_id_write.set(active);
                place_ghost(&element_id, offset);
            }
            GestureStep::Dragged(offset) => {
                ev.prevent_default();
                place_ghost(&element_id, offset);
                let over = column_at_point(at);
                if dnd.hover_column_read.get_untracked() != over {
                    dnd.hover_column_write.set(over);
                }
            }
            GestureStep::Pending | GestureStep::Ignored => {}
        }
    }
}

/// `touchend` on a card: hit-test the release point and resolve
pub fn make_on_touchend(dnd: DndSignals, element_id: String) -> impl Fn(TouchEvent) + 'static {
    move |ev: TouchEvent| {
        if !dnd.is_touch() {
            return;
        }
        let dragging = dnd.is_dragging();
        clear_ghost(&element_id);
        let target = if dragging {
            first_point(&ev.changed_touches()).and_then(column_at_point)
        } else {
            None
        };
        resolve(&dnd, target, None);
    }
}

/// `touchcancel` on a card: drop the gesture without side effects
pub fn make_on_touchcancel(dnd: DndSignals, element_id: String) -> impl Fn(TouchEvent) + 'static {
    move |_ev: TouchEvent| {
        clear_ghost(&element_id);
        dnd.machine.update_value(GestureMachine::cancel);
        end_drag(&dnd);
    }
}
