//! # Neurostream Data
//!
//! Wire and domain types shared by every crate of the brain stream client.

pub mod data;

pub use data::cell::{CellCoordinate, CellRecord, CellState, CellType, CorticalLayer, NeuronPhase};
pub use data::grid::GridConfig;
pub use data::status::{BrainStatus, ConnectionStatus, StreamStatus};
