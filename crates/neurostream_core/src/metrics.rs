//! Frame and ingestion metrics, plus logging setup.
//!
//! Provides structured logging and counters for monitoring the render loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::LoggingConfig;
use crate::instance::FrameStats;
use tracing_subscriber::EnvFilter;

/// Counters for the render loop.
pub struct Metrics {
    frame_count: AtomicU64,
    visible_instances: AtomicU64,
    firing_instances: AtomicU64,
    notifications: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: AtomicU64::new(0),
            visible_instances: AtomicU64::new(0),
            firing_instances: AtomicU64::new(0),
            notifications: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed instance update.
    pub fn record_frame(&self, duration: Duration, stats: FrameStats) {
        self.frame_count.fetch_add(1, Ordering::Relaxed);
        self.visible_instances
            .store(stats.visible as u64, Ordering::Relaxed);
        self.firing_instances
            .store(stats.firing as u64, Ordering::Relaxed);

        let frames = self.frame_count.load(Ordering::Relaxed);
        if frames % 500 == 0 {
            tracing::debug!(
                frames = frames,
                visible = stats.visible,
                firing = stats.firing,
                duration_us = duration.as_micros() as u64,
                "Instance update"
            );
        }
    }

    pub fn record_notification(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn visible_instances(&self) -> u64 {
        self.visible_instances.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn firing_instances(&self) -> u64 {
        self.firing_instances.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.notifications.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `LoggingConfig::file`; used while the terminal UI is active.
    File,
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &LoggingConfig, target: LogTarget) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.file)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
