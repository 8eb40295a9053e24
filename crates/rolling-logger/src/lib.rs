//! Rolling Logger
//!
//! `log` backend that keeps the most recent lines in a circular buffer and
//! forwards every line to a sink (browser console, stderr, ...). The buffer
//! backs the diagnostics tail in the UI.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Receives each formatted line
pub type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// Default number of lines kept
pub const DEFAULT_CAPACITY: usize = 200;

pub struct RollingLogger {
    app_name: String,
    capacity: usize,
    level: LevelFilter,
    lines: Mutex<VecDeque<String>>,
    sink: Sink,
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

impl RollingLogger {
    pub fn new(app_name: impl Into<String>, capacity: usize, sink: Sink) -> Self {
        Self {
            app_name: app_name.into(),
            capacity: capacity.max(1),
            level: LevelFilter::Info,
            lines: Mutex::new(VecDeque::new()),
            sink,
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Sink writing to stderr
    pub fn stderr_sink() -> Sink {
        Box::new(|_, line| eprintln!("{}", line))
    }

    /// Oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }

    fn format(&self, record: &Record) -> String {
        format!(
            "[{}] {:<5} {} {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            self.app_name,
            record.args()
        )
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            while lines.len() >= self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        (self.sink)(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

/// Install the global logger once. Later calls fail with `SetLoggerError`.
pub fn init_logger(app_name: &str, capacity: usize, level: LevelFilter, sink: Sink) -> Result<&'static RollingLogger, SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity, sink).with_level(level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(logger)
}

/// The installed logger, if any
pub fn logger() -> Option<&'static RollingLogger> {
    LOGGER.get()
}
