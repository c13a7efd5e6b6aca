//! CSV ingest.
//!
//! Turns the sales CSV into `RawRecord`s with no interpretation beyond
//! header lookup. The one fatal startup error in the whole tool lives here:
//! a missing dataset terminates with exit code 1 and no retry. Everything
//! else about a cell is left for the cleaner to repair.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::domain::RawRecord;
use crate::error::{AppError, EXIT_DATASET_MISSING, EXIT_IO};

/// The raw table as loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
}

/// Fail fast when the dataset file is absent.
pub fn require_dataset(path: &Path) -> Result<(), AppError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::new(
            EXIT_DATASET_MISSING,
            format!("Dataset not found: {}", path.display()),
        ))
    }
}

/// Load the source dataset.
pub fn load_orders(path: &Path) -> Result<RawTable, AppError> {
    require_dataset(path)?;

    let file = File::open(path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to open dataset '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            AppError::new(EXIT_IO, format!("CSV parse error in '{}': {e}", path.display()))
        })?;
        records.push(raw_record(&record, &header_map));
    }

    info!(rows = records.len(), "loaded dataset");
    Ok(RawTable { records })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿OrderID"). If we don't strip it, that column
    // silently goes missing.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Fetch a cell by normalized header name; absent columns read as empty.
fn field(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn raw_record(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawRecord {
    RawRecord {
        order_id: field(record, header_map, "orderid"),
        product_id: field(record, header_map, "productid"),
        customer_id: field(record, header_map, "customerid"),
        product_name: field(record, header_map, "productname"),
        category: field(record, header_map, "category"),
        brand: field(record, header_map, "brand"),
        sub_category: field(record, header_map, "subcategory"),
        city: field(record, header_map, "city"),
        state: field(record, header_map, "state"),
        region: field(record, header_map, "region"),
        sales_channel: field(record, header_map, "saleschannel"),
        payment_method: field(record, header_map, "paymentmethod"),
        price: field(record, header_map, "price"),
        quantity: field(record, header_map, "quantity"),
        revenue: field(record, header_map, "revenue"),
        discount_percent: field(record, header_map, "discountpercent"),
        discount_amount: field(record, header_map, "discountamount"),
        final_revenue: field(record, header_map, "finalrevenue"),
        order_date: field(record, header_map, "orderdate"),
    }
}
