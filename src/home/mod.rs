//! Home screen presentation logic

pub mod chart;
pub mod state;

pub use chart::filter_for_range;
pub use state::{HomeOptions, HomeStateHolder, UiState};
