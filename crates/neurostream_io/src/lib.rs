//! # Neurostream IO
//!
//! Network side of the brain stream client.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Batch payload decoding
//! - Server-Sent Events framing and the reqwest based transport
//! - Reconnect backoff and the brain status probe
//! - The stream ingestor that applies batches to the grid store

/// Error types and result aliases for I/O operations
pub mod error;
/// Stream session lifecycle and batch application
pub mod ingestor;
/// SSE transport, reconnect policy and status probe
pub mod network;
/// Batch payload decoding and encoding
pub mod serialization;

pub use error::{IoError, Result};
pub use ingestor::{IngestSettings, StreamIngestor};
pub use network::{
    fetch_brain_status, Backoff, SseTransport, Transport, TransportEvent, TransportHandle,
};
pub use serialization::{decode_batch, encode_batch, DecodedBatch};
