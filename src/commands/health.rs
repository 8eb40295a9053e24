use std::rc::Rc;

use board_core::{BoardSync, HealthReport, StoreConfig};
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;

/// Probe the store now and then every `health_interval_ms`
pub fn spawn_health_loop<F>(sync: &Rc<BoardSync>, config: &StoreConfig, on_report: F)
where
    F: Fn(HealthReport) + 'static,
{
    let sync = Rc::clone(sync);
    let timeout = config.health_timeout();
    let interval = u32::try_from(config.health_interval_ms).unwrap_or(u32::MAX);
    spawn_local(async move {
        loop {
            let report = sync.probe(timeout).await;
            if !report.ok {
                log::warn!("[APP] store health: {} {}", report.status, report.status_text);
            }
            on_report(report);
            TimeoutFuture::new(interval).await;
        }
    });
}
