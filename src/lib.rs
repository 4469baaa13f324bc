//! Terminal viewer for a pet's live brain activity stream.

pub mod app;

pub use app::{App, ShutdownManager};
