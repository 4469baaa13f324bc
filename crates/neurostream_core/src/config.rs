//! Configuration management for the stream client.
//!
//! Strongly-typed configuration structures mapping to `neurostream.toml`.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `neurostream.toml` (overrides defaults, sections may be partial)
//! 3. `NEUROSTREAM_API_BASE_URL` environment variable
//! 4. Command line flags
//!
//! ## Example `neurostream.toml`
//!
//! ```toml
//! [stream]
//! api_base_url = "http://localhost:8080/api"
//! probe_before_connect = true
//!
//! [stream.reconnect]
//! initial_delay_ms = 500
//! max_delay_ms = 10000
//!
//! [ingest]
//! snapshot_threshold = 100
//! max_grid_cells = 1048576
//!
//! [render]
//! min_interval_ms = 50
//! target_fps = 30
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_BASE_URL_ENV: &str = "NEUROSTREAM_API_BASE_URL";
const PET_ID_PLACEHOLDER: &str = "{pet_id}";

/// Where the brain stream lives and how to reach it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    pub api_base_url: String,
    /// Path template of the event stream; `{pet_id}` is substituted.
    pub stream_path: String,
    /// Path template of the availability probe.
    pub status_path: String,
    /// Ask the status endpoint whether the subject is alive before opening.
    pub probe_before_connect: bool,
    pub connect_timeout_ms: u64,
    pub reconnect: ReconnectConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            stream_path: "/pets/{pet_id}/brain/stream".to_string(),
            status_path: "/pets/{pet_id}/brain/status".to_string(),
            probe_before_connect: true,
            connect_timeout_ms: 5_000,
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Exponential backoff used after a previously healthy stream drops.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReconnectConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            multiplier: 2.0,
            max_attempts: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// A batch must carry more records than this to size the grid.
    pub snapshot_threshold: usize,
    /// Snapshots describing a larger grid are ignored.
    pub max_grid_cells: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            snapshot_threshold: crate::dimension::DEFAULT_SNAPSHOT_THRESHOLD,
            max_grid_cells: crate::dimension::DEFAULT_MAX_GRID_CELLS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Minimum spacing between render notifications.
    pub min_interval_ms: u64,
    pub target_fps: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 50,
            target_fps: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file used while the terminal UI owns stdout.
    pub file: String,
    /// Fallback filter when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "neurostream.log".to_string(),
            filter: "neurostream=info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub stream: StreamConfig,
    pub ingest: IngestConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.stream.api_base_url.starts_with("http://")
                || self.stream.api_base_url.starts_with("https://"),
            "API base URL must be http(s)"
        );
        anyhow::ensure!(
            self.stream.stream_path.contains(PET_ID_PLACEHOLDER),
            "Stream path must contain a pet id placeholder"
        );
        anyhow::ensure!(
            self.stream.status_path.contains(PET_ID_PLACEHOLDER),
            "Status path must contain a pet id placeholder"
        );
        anyhow::ensure!(
            self.stream.connect_timeout_ms > 0,
            "Connect timeout must be positive"
        );

        let reconnect = &self.stream.reconnect;
        anyhow::ensure!(
            reconnect.initial_delay_ms > 0,
            "Initial reconnect delay must be positive"
        );
        anyhow::ensure!(
            reconnect.max_delay_ms >= reconnect.initial_delay_ms,
            "Max reconnect delay must not be below the initial delay"
        );
        anyhow::ensure!(
            reconnect.multiplier >= 1.0,
            "Reconnect multiplier must be at least 1.0"
        );

        anyhow::ensure!(
            self.ingest.snapshot_threshold > 0,
            "Snapshot threshold must be positive"
        );
        anyhow::ensure!(
            self.ingest.max_grid_cells > self.ingest.snapshot_threshold,
            "Max grid cells must exceed the snapshot threshold"
        );

        anyhow::ensure!(
            self.render.min_interval_ms > 0,
            "Render interval must be positive"
        );
        anyhow::ensure!(self.render.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.render.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates configuration from TOML.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
        {
            self.stream.api_base_url = url;
        }
    }

    pub fn stream_url(&self, pet_id: &str) -> String {
        self.endpoint(&self.stream.stream_path, pet_id)
    }

    pub fn status_url(&self, pet_id: &str) -> String {
        self.endpoint(&self.stream.status_path, pet_id)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render.min_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.render.target_fps.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.stream.connect_timeout_ms)
    }

    fn endpoint(&self, template: &str, pet_id: &str) -> String {
        format!(
            "{}{}",
            self.stream.api_base_url.trim_end_matches('/'),
            template.replace(PET_ID_PLACEHOLDER, pet_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stream_url() {
        let mut config = AppConfig::default();
        config.stream.api_base_url = "http://brain.local/api/".to_string();
        assert_eq!(
            config.stream_url("abc-123"),
            "http://brain.local/api/pets/abc-123/brain/stream"
        );
        assert_eq!(
            config.status_url("abc-123"),
            "http://brain.local/api/pets/abc-123/brain/status"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml("[render]\nmin_interval_ms = 100\n").unwrap();
        assert_eq!(config.render.min_interval_ms, 100);
        assert_eq!(config.render.target_fps, 30);
        assert_eq!(config.ingest.snapshot_threshold, 100);
        assert_eq!(config.ingest.max_grid_cells, 1 << 20);
    }

    #[test]
    fn test_invalid_multiplier() {
        let mut config = AppConfig::default();
        config.stream.reconnect.multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_grid_cells() {
        let content = "[ingest]\nsnapshot_threshold = 100\nmax_grid_cells = 50\n";
        assert!(AppConfig::from_toml(content).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let content = "[stream]\napi_base_url = \"ftp://nowhere\"\n";
        assert!(AppConfig::from_toml(content).is_err());
    }

    #[test]
    fn test_invalid_target_fps() {
        let config = AppConfig {
            render: RenderConfig {
                target_fps: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let text = toml::to_string(&AppConfig::default()).unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), AppConfig::default());
    }
}
