//! # Neurostream Core
//!
//! State reconstruction and rendering pipeline for a streamed brain grid.
//!
//! This crate contains the I/O-free parts of the client:
//! - Sparse last-known-state store with a read-only view for renderers
//! - One-shot grid dimension inference from snapshot batches
//! - Render notification throttling
//! - Cell state to height/color encoding
//! - Fixed-size instance pool updated in place every frame
//! - Configuration, metrics and logging setup
//!
//! ## Example
//!
//! ```
//! use neurostream_core::{GridStateStore, InstancedRenderer};
//! use neurostream_data::{CellCoordinate, CellState, CellType, CorticalLayer, GridConfig};
//!
//! let mut store = GridStateStore::new();
//! store.set(
//!     CellState::new(CellCoordinate::new(1, 1), CellType::Excitatory, CorticalLayer::L4)
//!         .with_firing(true),
//! );
//!
//! let mut renderer = InstancedRenderer::new();
//! renderer.establish(GridConfig::new(4, 4));
//! let stats = renderer.update(&store);
//! assert_eq!(stats.visible, 1);
//! ```

/// Configuration management for stream, ingest and render parameters
pub mod config;
/// Grid dimension inference from snapshot batches
pub mod dimension;
/// Cell state to visual (height, color) mapping
pub mod encoder;
/// Fixed-size render instance pool
pub mod instance;
/// Metrics collection and logging setup
pub mod metrics;
/// Sparse per-coordinate state store
pub mod store;
/// Render notification rate limiting
pub mod throttle;

pub use config::AppConfig;
pub use dimension::{Detection, DimensionDetector};
pub use encoder::{encode, Rgb, Visual};
pub use instance::{FrameStats, Instance, InstancedRenderer, Transform};
pub use metrics::{init_logging, LogTarget, Metrics};
pub use store::{GridStateStore, GridView};
pub use throttle::RenderThrottle;
