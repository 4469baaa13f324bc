//! Stream session: owns the transport channel, applies batches to the grid
//! store and tracks connection health.
//!
//! The transport task never touches the store. It queues [`TransportEvent`]s
//! which the owner drains with [`StreamIngestor::pump`] from its own loop, so
//! a batch is always fully applied before the renderer reads the store.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, error::TryRecvError};

use neurostream_core::config::AppConfig;
use neurostream_core::dimension::{DEFAULT_MAX_GRID_CELLS, DEFAULT_SNAPSHOT_THRESHOLD};
use neurostream_core::throttle::DEFAULT_MIN_INTERVAL;
use neurostream_core::{Detection, DimensionDetector, GridStateStore, GridView, RenderThrottle};
use neurostream_data::{ConnectionStatus, GridConfig, StreamStatus};

use crate::error::{IoError, Result};
use crate::network::transport::{
    EventReceiver, SseTransport, Transport, TransportEvent, TransportHandle,
};
use crate::serialization::{decode_batch, preview};

/// Tunables of one ingestion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSettings {
    pub snapshot_threshold: usize,
    pub max_grid_cells: usize,
    pub min_render_interval: Duration,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            snapshot_threshold: DEFAULT_SNAPSHOT_THRESHOLD,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
            min_render_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl IngestSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            snapshot_threshold: config.ingest.snapshot_threshold,
            max_grid_cells: config.ingest.max_grid_cells,
            min_render_interval: config.render_interval(),
        }
    }
}

struct Channel {
    _handle: TransportHandle,
    events: EventReceiver,
}

/// One subject's ingestion session.
pub struct StreamIngestor<T: Transport = SseTransport> {
    transport: T,
    store: GridStateStore,
    detector: DimensionDetector,
    throttle: RenderThrottle,
    status: StreamStatus,
    channel: Option<Channel>,
    has_connected: bool,
    closed: bool,
}

impl<T: Transport> StreamIngestor<T> {
    pub fn new(transport: T, settings: IngestSettings) -> Self {
        Self {
            transport,
            store: GridStateStore::new(),
            detector: DimensionDetector::new(settings.snapshot_threshold)
                .with_max_cells(settings.max_grid_cells),
            throttle: RenderThrottle::new(settings.min_render_interval),
            status: StreamStatus::default(),
            channel: None,
            has_connected: false,
            closed: false,
        }
    }

    /// Opens the event channel. A no-op while a channel exists.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SessionClosed`] once the session was closed or
    /// failed terminally.
    pub fn open(&mut self, endpoint: &str) -> Result<()> {
        if self.closed {
            return Err(IoError::SessionClosed);
        }
        if self.channel.is_some() {
            tracing::debug!(endpoint, "Brain stream already open");
            return Ok(());
        }

        let (sender, events) = mpsc::unbounded_channel();
        let handle = self.transport.connect(endpoint, sender);
        self.channel = Some(Channel {
            _handle: handle,
            events,
        });
        tracing::info!(endpoint, "Opening brain stream");
        Ok(())
    }

    /// Drains every queued transport event in delivery order, then releases
    /// a trailing render notification if one is due.
    ///
    /// Returns whether at least one render notification was emitted.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut notified = false;
        loop {
            let Some(channel) = self.channel.as_mut() else {
                break;
            };
            match channel.events.try_recv() {
                Ok(event) => notified |= self.handle_event(event, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    notified |= self.handle_event(
                        TransportEvent::Closed("Brain stream transport stopped".to_string()),
                        now,
                    );
                    break;
                }
            }
        }
        if !self.closed {
            notified |= self.throttle.flush(now);
        }
        notified
    }

    /// Applies one transport callback. Returns whether a render
    /// notification was emitted.
    pub fn handle_event(&mut self, event: TransportEvent, now: Instant) -> bool {
        if self.closed {
            tracing::trace!(?event, "Ignoring event for closed session");
            return false;
        }

        match event {
            TransportEvent::Open => {
                self.on_open();
                false
            }
            TransportEvent::Message(payload) => self.on_message(&payload, now),
            TransportEvent::Error(reason) => {
                self.on_error(&reason);
                false
            }
            TransportEvent::Reconnecting { attempt, delay } => {
                self.status.reconnect_attempts = attempt;
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnecting to brain stream"
                );
                false
            }
            TransportEvent::Closed(reason) => {
                self.fail(reason);
                false
            }
        }
    }

    /// Ends the session with a terminal error without waiting for the
    /// transport, e.g. when the subject is known to be gone.
    pub fn terminate(&mut self, reason: impl Into<String>) {
        if self.closed {
            return;
        }
        self.fail(reason.into());
    }

    /// Stops the transport and drops the event queue. Idempotent.
    pub fn close(&mut self) {
        if self.channel.take().is_some() {
            tracing::info!("Brain stream closed");
        }
        self.closed = true;
    }

    /// Snapshot of the connection health and counters.
    pub fn status(&self) -> StreamStatus {
        self.status.clone()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status.status
    }

    pub fn store(&self) -> &GridStateStore {
        &self.store
    }

    pub fn grid(&self) -> Option<GridConfig> {
        self.status.grid
    }

    pub fn has_connected(&self) -> bool {
        self.has_connected
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn throttle(&self) -> &RenderThrottle {
        &self.throttle
    }

    fn on_open(&mut self) {
        match self.status.status {
            ConnectionStatus::Degraded => tracing::info!(
                attempts = self.status.reconnect_attempts,
                "Brain stream reconnected"
            ),
            _ => tracing::info!("Brain stream connected"),
        }
        self.has_connected = true;
        self.status.status = ConnectionStatus::Connected;
        self.status.error_message = None;
        self.status.reconnect_attempts = 0;
    }

    fn on_message(&mut self, payload: &str, now: Instant) -> bool {
        self.status.messages_received += 1;

        let batch = match decode_batch(payload) {
            Ok(batch) => batch,
            Err(e) => {
                self.status.parse_failures += 1;
                tracing::warn!(error = %e, payload = %preview(payload), "Skipping malformed brain batch");
                return false;
            }
        };

        if batch.rejected > 0 {
            self.status.dropped_out_of_range += batch.rejected as u64;
            tracing::trace!(rejected = batch.rejected, "Dropped records with negative coordinates");
        }

        if self.status.grid.is_none() {
            match self.detector.inspect(&batch.states) {
                Detection::Grid(grid) => {
                    let pruned = self.store.retain_within(grid);
                    self.status.dropped_out_of_range += pruned as u64;
                    self.status.grid = Some(grid);
                    tracing::info!(
                        width = grid.width,
                        height = grid.height,
                        records = batch.len(),
                        pruned,
                        "Grid dimensions detected"
                    );
                }
                Detection::Oversized(grid) => tracing::warn!(
                    width = grid.width,
                    height = grid.height,
                    max_cells = self.detector.max_cells(),
                    "Ignoring snapshot with oversized grid bounds"
                ),
                Detection::Incremental => {}
            }
        }

        let mut applied = 0u64;
        for state in batch.states {
            if let Some(grid) = self.status.grid {
                if !grid.contains(state.coordinate) {
                    self.status.dropped_out_of_range += 1;
                    tracing::trace!(
                        x = state.coordinate.x,
                        y = state.coordinate.y,
                        "Dropped out-of-range cell"
                    );
                    continue;
                }
            }
            self.store.set(state);
            applied += 1;
        }
        self.status.cells_updated_count += applied;
        tracing::debug!(applied, stored = self.store.len(), "Applied brain batch");

        applied > 0 && self.throttle.request(now)
    }

    fn on_error(&mut self, reason: &str) {
        if !self.has_connected {
            tracing::warn!(reason, "Brain stream failed before connecting");
            self.fail(format!(
                "Unable to connect to brain stream. The pet may not exist, may have died, \
                 or the server is unavailable. ({reason})"
            ));
            return;
        }

        if self.status.status != ConnectionStatus::Degraded {
            tracing::warn!(reason, stored = self.store.len(), "Brain stream disrupted");
        }
        self.status.status = ConnectionStatus::Degraded;
        self.status.error_message = Some(reason.to_string());
    }

    fn fail(&mut self, reason: String) {
        tracing::warn!(reason = %reason, "Brain stream session ended");
        self.status.status = ConnectionStatus::Error;
        self.status.error_message = Some(reason);
        self.close();
    }
}

impl<T: Transport> Drop for StreamIngestor<T> {
    fn drop(&mut self) {
        self.close();
    }
}
