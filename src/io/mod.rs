//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - cleaning + calendar derivation (`clean`)
//! - filtered-table CSV export (`export`)
//! - freshness manifest read/write (`manifest`)

pub mod clean;
pub mod export;
pub mod ingest;
pub mod manifest;

pub use clean::*;
pub use export::*;
pub use ingest::*;
pub use manifest::*;
