pub mod failure;
pub mod legend;
pub mod status;

pub use failure::FailureWidget;
pub use legend::LegendWidget;
pub use status::StatusWidget;
