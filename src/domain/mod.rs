//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and cleaned order rows (`RawRecord`, `SalesRecord`)
//! - the cleaned table (`SalesTable`)
//! - run configuration (`RunConfig`) and the freshness manifest (`RunManifest`)
//! - the fixed artifact names the pipeline produces

pub mod types;

pub use types::*;
