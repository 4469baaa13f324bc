use serde::{Deserialize, Serialize};

use super::grid::GridConfig;

/// Lifecycle of the ingestion channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    /// Was connected at least once and lost the channel; reconnecting.
    Degraded,
    /// Terminal for the session.
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Degraded => "Reconnecting...",
            Self::Error => "Disconnected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Status signal published to display surfaces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamStatus {
    pub status: ConnectionStatus,
    pub error_message: Option<String>,
    pub cells_updated_count: u64,
    pub messages_received: u64,
    pub parse_failures: u64,
    pub dropped_out_of_range: u64,
    pub reconnect_attempts: u32,
    pub grid: Option<GridConfig>,
}

/// Answer of the producer's brain status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainStatus {
    pub pet_id: String,
    pub available: bool,
    pub message: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub evolution_path: Option<String>,
}
