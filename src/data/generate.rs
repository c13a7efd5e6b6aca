//! Synthetic dataset generation.
//!
//! Produces a realistic Indian e-commerce order file for demos and tests.
//! Generation is deterministic for a given seed, so two runs with the same
//! arguments produce byte-identical CSVs.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{AppError, EXIT_IO};

/// (product_id, product_name, brand, category, sub_category)
const PRODUCTS: [(&str, &str, &str, &str, &str); 10] = [
    ("P001", "Wireless Earphones", "boAt", "Electronics", "Audio"),
    ("P002", "Bluetooth Speaker", "JBL", "Electronics", "Audio"),
    ("P003", "Smart Watch", "Noise", "Electronics", "Wearable"),
    ("P004", "Power Bank", "Mi", "Electronics", "Accessories"),
    ("P005", "Laptop Bag", "Dell", "Accessories", "Bags"),
    ("P006", "Running Shoes", "Nike", "Fashion", "Footwear"),
    ("P007", "Water Bottle", "Decathlon", "Fitness", "Accessories"),
    ("P008", "Office Chair", "GreenSoul", "Furniture", "Office"),
    ("P009", "LED Monitor", "Samsung", "Electronics", "Display"),
    ("P010", "Keyboard Mouse Combo", "Logitech", "Electronics", "Accessories"),
];

const STATES: [(&str, &[&str]); 7] = [
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik"]),
    ("Karnataka", &["Bengaluru", "Mysuru"]),
    ("Delhi", &["New Delhi"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore"]),
    ("West Bengal", &["Kolkata"]),
    ("Uttar Pradesh", &["Lucknow", "Noida"]),
];

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const CHANNELS: [&str; 5] = ["Amazon", "Flipkart", "Meesho", "JioMart", "Website"];
const PAYMENTS: [&str; 6] = [
    "UPI",
    "Paytm",
    "PhonePe",
    "Credit Card",
    "Debit Card",
    "Cash on Delivery",
];

const HEADER: [&str; 20] = [
    "OrderID",
    "OrderDate",
    "ProductID",
    "ProductName",
    "Category",
    "Brand",
    "SubCategory",
    "Price",
    "Quantity",
    "Revenue",
    "DiscountPercent",
    "DiscountAmount",
    "FinalRevenue",
    "CustomerID",
    "CustomerName",
    "City",
    "State",
    "Region",
    "SalesChannel",
    "PaymentMethod",
];

/// Write a `rows`-row synthetic dataset to `path`.
pub fn write_dataset(path: &Path, rows: usize, seed: u64) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(EXIT_IO, format!("Failed to create '{}': {e}", parent.display()))
        })?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to create dataset '{}': {e}", path.display()))
    })?;
    let io_err = |e: csv::Error| AppError::new(EXIT_IO, format!("Failed to write dataset: {e}"));

    writer.write_record(HEADER).map_err(io_err)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();

    for i in 0..rows {
        let (product_id, product_name, brand, category, sub_category) =
            PRODUCTS[rng.gen_range(0..PRODUCTS.len())];

        let price = round2(rng.gen_range(300.0..5000.0));
        let quantity: u32 = rng.gen_range(1..=4);
        let revenue = price * quantity as f64;

        let discount_percent: u32 = rng.gen_range(5..=40);
        let discount_amount = round2(revenue * discount_percent as f64 / 100.0);
        let final_revenue = round2(revenue - discount_amount);

        let (state, state_cities) = STATES[rng.gen_range(0..STATES.len())];
        let city = state_cities[rng.gen_range(0..state_cities.len())];

        let order_date = start + Duration::days(rng.gen_range(0..365));

        writer
            .write_record([
                format!("O{i}"),
                order_date.to_string(),
                product_id.to_string(),
                product_name.to_string(),
                category.to_string(),
                brand.to_string(),
                sub_category.to_string(),
                format!("{price:.2}"),
                quantity.to_string(),
                format!("{revenue:.2}"),
                discount_percent.to_string(),
                format!("{discount_amount:.2}"),
                format!("{final_revenue:.2}"),
                format!("CUST{}", rng.gen_range(1000..=9999)),
                format!("Customer_{}", rng.gen_range(1..=9999)),
                city.to_string(),
                state.to_string(),
                REGIONS[rng.gen_range(0..REGIONS.len())].to_string(),
                CHANNELS[rng.gen_range(0..CHANNELS.len())].to_string(),
                PAYMENTS[rng.gen_range(0..PAYMENTS.len())].to_string(),
            ])
            .map_err(io_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to flush dataset: {e}")))?;
    info!(rows, path = %path.display(), "synthetic dataset written");
    Ok(())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
