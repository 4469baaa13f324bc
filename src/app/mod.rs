pub mod input;
pub mod render;
pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::{App, LoadedConfig};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::{Duration, Instant};

use neurostream_core::GridView;
use neurostream_io::network::transport::Transport;
use neurostream_tui::Tui;

const SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

impl<T: Transport> App<T> {
    /// Interactive loop: pump, update instances, draw, then wait for input
    /// until the next frame is due.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let frame_interval = self.config.frame_interval();
        self.shutdown.listen_for_ctrl_c();

        while self.running && !self.shutdown.is_shutdown_requested() {
            let frame_start = Instant::now();
            self.tick(frame_start);

            tui.terminal.draw(|f| {
                self.draw(f);
            })?;
            self.record_draw();

            // Wait out the rest of the frame on the runtime so the transport
            // task keeps reading while we idle.
            let remaining = frame_interval.saturating_sub(frame_start.elapsed());
            tokio::time::sleep(remaining).await;

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        let shutdown = self.shutdown.clone();
        shutdown.cleanup(self);
        Ok(())
    }

    /// Loop without a terminal: logs a summary every second and stops when
    /// the session fails for good or Ctrl+C arrives.
    pub async fn run_headless(&mut self) -> Result<()> {
        let frame_interval = self.config.frame_interval();
        self.shutdown.listen_for_ctrl_c();
        let mut last_summary = Instant::now();

        while self.running && !self.shutdown.is_shutdown_requested() {
            let now = Instant::now();
            self.tick(now);

            if now.duration_since(last_summary) >= SUMMARY_INTERVAL {
                self.log_summary();
                last_summary = now;
            }

            let status = self.session.status();
            if status.status.is_terminal() {
                tracing::error!(
                    reason = status.error_message.as_deref().unwrap_or("unknown"),
                    "Brain stream session ended"
                );
                self.log_summary();
                break;
            }

            tokio::time::sleep(frame_interval).await;
        }

        let shutdown = self.shutdown.clone();
        shutdown.cleanup(self);
        Ok(())
    }

    fn log_summary(&self) {
        let status = self.session.status();
        let grid = status
            .grid
            .map(|g| format!("{}x{}", g.width, g.height))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::info!(
            status = status.status.label(),
            grid = %grid,
            cells = self.session.store().len(),
            visible = self.metrics.visible_instances(),
            firing = self.metrics.firing_instances(),
            messages = status.messages_received,
            updates = status.cells_updated_count,
            parse_failures = status.parse_failures,
            frames = self.metrics.frame_count(),
            notifications = self.metrics.notifications(),
            uptime_secs = self.metrics.elapsed().as_secs(),
            "Brain stream summary"
        );
    }
}
