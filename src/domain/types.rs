//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - held in-memory during aggregation and rendering
//! - cloned freely between the pipeline and the dashboard
//! - compared structurally in tests

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current pipeline version; bumping it invalidates existing artifacts.
pub const PIPELINE_VERSION: u32 = 1;

/// Chart artifacts in their fixed render order.
pub const CHART_FILES: [&str; 7] = [
    "01_monthly_revenue.png",
    "02_category_contribution.png",
    "03_top_products.png",
    "04_day_heatmap.png",
    "05_correlation.png",
    "06_revenue_distribution.png",
    "07_category_pie.png",
];

/// The textual insights report.
pub const INSIGHTS_FILE: &str = "INSIGHTS_PROFESSIONAL.txt";

/// Freshness manifest written next to the artifacts.
pub const MANIFEST_FILE: &str = ".pulse_manifest.json";

/// All eight expected output artifacts (seven charts + report).
pub fn artifact_files() -> impl Iterator<Item = &'static str> {
    CHART_FILES.iter().copied().chain(std::iter::once(INSIGHTS_FILE))
}

/// One row of the source dataset, exactly as read from CSV.
///
/// Numeric fields stay as raw strings here: the cleaner owns all coercion so
/// that bad cells are repaired (not rejected) in a single place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub brand: String,
    pub sub_category: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub sales_channel: String,
    pub payment_method: String,
    pub price: String,
    pub quantity: String,
    pub revenue: String,
    pub discount_percent: String,
    pub discount_amount: String,
    pub final_revenue: String,
    pub order_date: String,
}

/// A cleaned order row.
///
/// Invariants after cleaning:
/// - `price`, `quantity`, `revenue` are always finite (bad input becomes 0)
/// - `month`, `year`, `weekday` are `None` exactly when `order_date` failed
///   to parse; rows are retained either way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesRecord {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub brand: String,
    pub sub_category: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub sales_channel: String,
    pub payment_method: String,
    pub price: f64,
    pub quantity: f64,
    pub revenue: f64,
    /// Carried through untyped; the pipeline never aggregates discounts.
    pub discount_percent: String,
    pub discount_amount: String,
    pub final_revenue: String,
    pub order_date: Option<NaiveDate>,
    /// `YYYY-MM` month bucket derived from `order_date`.
    pub month: Option<String>,
    pub year: Option<i32>,
    /// Full weekday name ("Monday" .. "Sunday").
    pub weekday: Option<String>,
}

/// The cleaned table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    pub rows: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A full run's configuration (CLI flags plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dataset_path: PathBuf,
    pub report_dir: PathBuf,
    /// Regenerate artifacts even when the fingerprint matches.
    pub force: bool,
}

/// Freshness fingerprint recorded alongside the artifacts.
///
/// Artifact presence alone cannot detect a stale report, so the gate also
/// compares a digest of the source file and the pipeline version; charts
/// rendered from an older dataset get regenerated instead of trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub pipeline_version: u32,
    pub source_sha256: String,
}
