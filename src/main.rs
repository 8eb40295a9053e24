#![allow(warnings)]
//! Task Board Frontend Entry Point

mod settings;
mod commands;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;
use log::Level;
use wasm_bindgen::JsValue;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger(
        "taskboard",
        rolling_logger::DEFAULT_CAPACITY,
        log::LevelFilter::Info,
        console_sink(),
    ) {
        web_sys::console::warn_1(&format!("[APP] logger already set: {}", e).into());
    }
    mount_to_body(App);
}

/// Forward formatted log lines to the browser console
fn console_sink() -> rolling_logger::Sink {
    Box::new(|level, line| {
        let msg = JsValue::from_str(line);
        match level {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    })
}
