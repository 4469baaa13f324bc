//! Graceful shutdown handling for the application.
//!
//! Provides signal handling and cleanup procedures for graceful shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use neurostream_io::network::transport::Transport;

/// Manages graceful shutdown of the application.
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests shutdown.
    pub fn request_shutdown(&self) {
        if !self.shutdown_requested.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutdown requested");
        }
    }

    /// Checks if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Requests shutdown when Ctrl+C arrives.
    pub fn listen_for_ctrl_c(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                manager.request_shutdown();
            }
        });
    }

    /// Closes the stream session. Runs before the terminal is restored.
    pub fn cleanup<T: Transport>(&self, app: &mut crate::app::App<T>) {
        tracing::info!("Performing shutdown cleanup...");
        app.session.close();
        tracing::info!(
            frames = app.metrics.frame_count(),
            notifications = app.metrics.notifications(),
            "Cleanup complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_manager_new() {
        let manager = ShutdownManager::new();
        assert!(!manager.is_shutdown_requested());
    }

    #[test]
    fn test_shutdown_request_is_shared() {
        let manager = ShutdownManager::new();
        let handle = manager.clone();
        handle.request_shutdown();
        handle.request_shutdown();
        assert!(manager.is_shutdown_requested());
    }
}
