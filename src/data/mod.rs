//! Synthetic data generation.

pub mod generate;

pub use generate::*;
