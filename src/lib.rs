//! `sales-pulse` library crate.
//!
//! The binary (`pulse`) is a thin wrapper around this library so that:
//!
//! - the analysis pipeline is testable without spawning processes
//! - the report runner and the dashboard share one implementation of
//!   loading, cleaning, and KPI computation instead of re-deriving them

pub mod agg;
pub mod app;
pub mod charts;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod insights;
pub mod io;
pub mod kpi;
pub mod math;
pub mod query;
pub mod tui;
