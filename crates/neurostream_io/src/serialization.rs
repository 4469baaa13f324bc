//! Batch payload decoding.
//!
//! Every stream message is a JSON array of cell records. A payload either
//! decodes completely or is rejected as a whole; records whose coordinates
//! cannot address a grid slot are counted and left out.

use crate::error::{IoError, Result};
use neurostream_data::{CellRecord, CellState};

/// Cell states decoded from one message, in delivery order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedBatch {
    pub states: Vec<CellState>,
    /// Records with negative coordinates.
    pub rejected: usize,
}

impl DecodedBatch {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Decodes one message payload.
pub fn decode_batch(payload: &str) -> Result<DecodedBatch> {
    if payload.trim().is_empty() {
        return Err(IoError::validation("Empty payload"));
    }

    let records: Vec<CellRecord> = serde_json::from_str(payload)
        .map_err(|e| IoError::parse(format!("Batch deserialization failed: {}", e)))?;

    let total = records.len();
    let states: Vec<CellState> = records
        .into_iter()
        .filter_map(CellRecord::into_state)
        .collect();
    let rejected = total - states.len();

    Ok(DecodedBatch { states, rejected })
}

/// Encodes states as a message payload, the inverse of [`decode_batch`].
pub fn encode_batch(states: &[CellState]) -> Result<String> {
    let records: Vec<CellRecord> = states.iter().map(CellRecord::from).collect();
    serde_json::to_string(&records)
        .map_err(|e| IoError::parse(format!("Batch serialization failed: {}", e)))
}

/// First characters of a payload, for log lines.
pub fn preview(payload: &str) -> String {
    const PREVIEW_CHARS: usize = 100;
    payload.chars().take(PREVIEW_CHARS).collect()
}
