//! Touch drag ghost
//!
//! During an emulated drag the card itself is translated under the finger,
//! scaled up and faded. `pointer-events: none` lets hit-testing see the
//! column underneath.

use board_core::Point;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

const GHOST_SCALE: f64 = 1.05;
const GHOST_OPACITY: &str = "0.7";
const GHOST_PROPERTIES: [&str; 4] = ["transform", "opacity", "pointer-events", "z-index"];

fn card_element(element_id: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(element_id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Move the ghost to `offset` from where the touch started
pub fn place_ghost(element_id: &str, offset: Point) {
    let Some(el) = card_element(element_id) else { return };
    let style = el.style();
    let _ = style.set_property(
        "transform",
        &format!("translate({}px, {}px) scale({})", offset.x, offset.y, GHOST_SCALE),
    );
    let _ = style.set_property("opacity", GHOST_OPACITY);
    let _ = style.set_property("pointer-events", "none");
    let _ = style.set_property("z-index", "1000");
}

/// Restore the card's normal look
pub fn clear_ghost(element_id: &str) {
    let Some(el) = card_element(element_id) else { return };
    let style = el.style();
    for prop in GHOST_PROPERTIES {
        let _ = style.remove_property(prop);
    }
}
