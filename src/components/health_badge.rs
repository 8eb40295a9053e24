//! Health Badge Component
//!
//! Shows the outcome of the last store probe.

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn HealthBadge() -> impl IntoView {
    let store = use_app_store();

    let label = move || match store.health().get() {
        None => ("health-badge pending", "Checking store...".to_string()),
        Some(report) if report.ok => ("health-badge ok", format!("Store online ({})", report.status)),
        Some(report) if report.timed_out => ("health-badge timeout", "Store timed out".to_string()),
        Some(report) if report.status == 0 => ("health-badge down", format!("Store unreachable: {}", report.status_text)),
        Some(report) => ("health-badge down", format!("Store error {} {}", report.status, report.status_text)),
    };

    view! {
        <span class=move || label().0>{move || label().1}</span>
    }
}
