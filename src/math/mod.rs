//! Mathematical utilities: descriptive statistics for the chart renderer.

pub mod stats;

pub use stats::*;
