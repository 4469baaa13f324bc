use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

use neurostream_core::config::AppConfig;
use neurostream_core::instance::{FrameStats, InstancedRenderer};
use neurostream_core::metrics::Metrics;
use neurostream_data::StreamStatus;
use neurostream_io::network::transport::{SseTransport, Transport};
use neurostream_io::{fetch_brain_status, IngestSettings, StreamIngestor};

use crate::app::shutdown::ShutdownManager;

/// Result of reading the config file; `warning` is reported once logging is up.
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warning: Option<String>,
}

/// Viewer state for one pet's brain stream.
pub struct App<T: Transport = SseTransport> {
    pub running: bool,
    pub pet_id: String,
    pub config: AppConfig,
    pub session: StreamIngestor<T>,
    pub renderer: InstancedRenderer,
    pub metrics: Metrics,
    pub shutdown: ShutdownManager,
    probe_client: Option<reqwest::Client>,
    // FPS & Timing
    pub fps: f64,
    pub frame_count: u64,
    pub last_fps_update: Instant,
    pub last_stats: FrameStats,
    pub show_legend: bool,
}

impl App {
    /// Loads `path`, writing the defaults out when it does not exist.
    /// An unreadable or invalid file falls back to defaults.
    pub fn load_config(path: &str) -> LoadedConfig {
        if let Ok(content) = std::fs::read_to_string(path) {
            return match AppConfig::from_toml(&content) {
                Ok(config) => LoadedConfig {
                    config,
                    warning: None,
                },
                Err(e) => LoadedConfig {
                    config: AppConfig::default(),
                    warning: Some(format!("Failed to load {path}: {e}; using defaults")),
                },
            };
        }

        let default = AppConfig::default();
        let mut warning = None;
        if !Path::new(path).exists() {
            if let Ok(toml_str) = toml::to_string(&default) {
                if let Err(e) = std::fs::write(path, toml_str) {
                    warning = Some(format!("Could not write default config to {path}: {e}"));
                }
            }
        }
        LoadedConfig {
            config: default,
            warning,
        }
    }

    /// Viewer backed by the SSE transport, probing with the same HTTP client.
    pub fn new(config: AppConfig, pet_id: impl Into<String>) -> Result<Self> {
        let transport = SseTransport::from_config(&config)?;
        let probe_client = transport.client().clone();
        Ok(Self::with_transport(
            config,
            pet_id,
            transport,
            Some(probe_client),
        ))
    }
}

impl<T: Transport> App<T> {
    pub fn with_transport(
        config: AppConfig,
        pet_id: impl Into<String>,
        transport: T,
        probe_client: Option<reqwest::Client>,
    ) -> Self {
        let session = StreamIngestor::new(transport, IngestSettings::from_config(&config));
        Self {
            running: true,
            pet_id: pet_id.into(),
            config,
            session,
            renderer: InstancedRenderer::new(),
            metrics: Metrics::new(),
            shutdown: ShutdownManager::new(),
            probe_client,
            fps: 0.0,
            frame_count: 0,
            last_fps_update: Instant::now(),
            last_stats: FrameStats::default(),
            show_legend: false,
        }
    }

    /// Probes the pet's brain status (when enabled) and opens the stream.
    pub async fn start(&mut self) -> Result<()> {
        if self.config.stream.probe_before_connect {
            if let Some(client) = &self.probe_client {
                let url = self.config.status_url(&self.pet_id);
                match fetch_brain_status(client, &url).await {
                    Ok(brain) if !brain.available => {
                        tracing::warn!(pet_id = %self.pet_id, message = %brain.message, "Brain not available");
                        self.session.terminate(brain.message);
                        return Ok(());
                    }
                    Ok(brain) => tracing::info!(
                        pet_id = %self.pet_id,
                        stage = brain.stage.as_deref().unwrap_or("unknown"),
                        "Brain available"
                    ),
                    Err(e) => tracing::warn!(
                        error = %e,
                        "Brain status probe failed; opening stream anyway"
                    ),
                }
            }
        }

        let endpoint = self.config.stream_url(&self.pet_id);
        self.session.open(&endpoint)?;
        Ok(())
    }

    /// Applies queued stream events and refreshes the instance pool when a
    /// render notification fires. Returns whether the pool was updated.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut notified = self.session.pump(now);

        if let Some(grid) = self.session.grid() {
            if self.renderer.establish(grid) {
                self.metrics.increment_counter("grid_established");
                notified = true;
            }
        }
        if !notified || !self.renderer.is_established() {
            return false;
        }

        let started = Instant::now();
        self.last_stats = self.renderer.update(self.session.store());
        self.metrics.record_frame(started.elapsed(), self.last_stats);
        self.metrics.record_notification();
        true
    }

    pub fn status(&self) -> StreamStatus {
        self.session.status()
    }

    /// Counts a drawn frame and refreshes the FPS figure once a second.
    pub fn record_draw(&mut self) {
        self.frame_count += 1;
        if self.last_fps_update.elapsed() >= Duration::from_secs(1) {
            self.fps = self.frame_count as f64 / self.last_fps_update.elapsed().as_secs_f64();
            self.frame_count = 0;
            self.last_fps_update = Instant::now();
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.shutdown.request_shutdown();
    }
}
