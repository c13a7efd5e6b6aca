//! Data cleaning and calendar derivation.
//!
//! Cleaning is a silent-repair step, never a filter:
//!
//! - the three measure columns (price, quantity, revenue) are coerced to
//!   numbers; anything unparseable becomes `0.0`
//! - the order date is parsed; anything unparseable becomes `None`
//! - three calendar attributes are derived from the parsed date: a
//!   `YYYY-MM` month bucket, the calendar year, and the full weekday name
//!
//! Rows are retained no matter how malformed their cells are.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::domain::{RawRecord, SalesRecord, SalesTable};
use crate::io::ingest::RawTable;

/// Clean a raw table. The input is consumed; no row is dropped.
pub fn clean_table(raw: RawTable) -> SalesTable {
    let rows = raw.records.iter().map(clean_record).collect::<Vec<_>>();
    info!(rows = rows.len(), "data cleaned");
    SalesTable { rows }
}

/// Clean a single row.
pub fn clean_record(raw: &RawRecord) -> SalesRecord {
    let order_date = parse_order_date(&raw.order_date);
    SalesRecord {
        order_id: raw.order_id.clone(),
        product_id: raw.product_id.clone(),
        customer_id: raw.customer_id.clone(),
        product_name: raw.product_name.clone(),
        category: raw.category.clone(),
        brand: raw.brand.clone(),
        sub_category: raw.sub_category.clone(),
        city: raw.city.clone(),
        state: raw.state.clone(),
        region: raw.region.clone(),
        sales_channel: raw.sales_channel.clone(),
        payment_method: raw.payment_method.clone(),
        price: coerce_numeric(&raw.price),
        quantity: coerce_numeric(&raw.quantity),
        revenue: coerce_numeric(&raw.revenue),
        discount_percent: raw.discount_percent.clone(),
        discount_amount: raw.discount_amount.clone(),
        final_revenue: raw.final_revenue.clone(),
        order_date,
        month: order_date.map(month_bucket),
        year: order_date.map(|d| d.year()),
        weekday: order_date.map(|d| d.format("%A").to_string()),
    }
}

/// Coerce a numeric cell; unparseable or non-finite input becomes 0.
pub fn coerce_numeric(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the order date.
///
/// ISO dates are the norm, but spreadsheet exports often carry `DD/MM/YYYY`
/// or `DD-MM-YYYY`; a small fixed format set keeps parsing deterministic.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `YYYY-MM` month bucket (month-granularity truncation of a date).
pub fn month_bucket(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}
