//! Process logger.
//!
//! Formatting and level filtering are delegated to `env_logger` (driven by
//! `RUST_LOG`, default `info`). Every emitted line is also kept in a bounded
//! in-memory ring so recent ingestion warnings can be read back over HTTP.

use crate::constants::LOG_BUFFER_CAPACITY;
use log::{Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct RecentLogger {
    inner: env_logger::Logger,
    buffer: Mutex<VecDeque<String>>,
}

impl RecentLogger {
    fn new() -> Self {
        let inner = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .build();
        Self {
            inner,
            buffer: Mutex::new(VecDeque::with_capacity(LOG_BUFFER_CAPACITY)),
        }
    }

    fn remember(&self, line: String) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.push_back(line);
            if buf.len() > LOG_BUFFER_CAPACITY {
                buf.pop_front();
            }
        }
    }
}

static LOGGER: OnceCell<RecentLogger> = OnceCell::new();

impl Log for RecentLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.inner.matches(record) {
            self.remember(format!("{} - {}", record.level(), record.args()));
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the process logger. Fails if another logger is already set.
pub fn init() -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(RecentLogger::new);
    log::set_logger(logger)?;
    log::set_max_level(logger.inner.filter());
    Ok(())
}

/// Most recent log lines, oldest first. Empty when [`init`] was never called.
pub fn recent_logs() -> Vec<String> {
    LOGGER
        .get()
        .and_then(|l| l.buffer.lock().ok().map(|buf| buf.iter().cloned().collect()))
        .unwrap_or_default()
}
