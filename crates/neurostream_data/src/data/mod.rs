//! Core data structures for the brain stream.

pub mod cell;
pub mod grid;
pub mod status;
