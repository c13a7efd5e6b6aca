//! Export a (filtered) table to CSV.
//!
//! Used by the dashboard's preview export; the output mirrors the source
//! schema plus the derived calendar columns, so it is easy to consume in
//! spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::SalesTable;
use crate::error::{AppError, EXIT_IO};

const EXPORT_HEADER: [&str; 22] = [
    "OrderID",
    "ProductID",
    "CustomerID",
    "ProductName",
    "Category",
    "Brand",
    "SubCategory",
    "City",
    "State",
    "Region",
    "SalesChannel",
    "PaymentMethod",
    "Price",
    "Quantity",
    "Revenue",
    "DiscountPercent",
    "DiscountAmount",
    "FinalRevenue",
    "OrderDate",
    "Month",
    "Year",
    "Weekday",
];

/// Write the table to a CSV file, overwriting any existing file.
pub fn write_table_csv(path: &Path, table: &SalesTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export header: {e}")))?;

    for r in &table.rows {
        let record = [
            r.order_id.clone(),
            r.product_id.clone(),
            r.customer_id.clone(),
            r.product_name.clone(),
            r.category.clone(),
            r.brand.clone(),
            r.sub_category.clone(),
            r.city.clone(),
            r.state.clone(),
            r.region.clone(),
            r.sales_channel.clone(),
            r.payment_method.clone(),
            format!("{:.2}", r.price),
            format!("{}", r.quantity),
            format!("{:.2}", r.revenue),
            r.discount_percent.clone(),
            r.discount_amount.clone(),
            r.final_revenue.clone(),
            r.order_date.map(|d| d.to_string()).unwrap_or_default(),
            r.month.clone().unwrap_or_default(),
            r.year.map(|y| y.to_string()).unwrap_or_default(),
            r.weekday.clone().unwrap_or_default(),
        ];
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.csv");
        let table = SalesTable {
            rows: vec![SalesRecord {
                order_id: "O1".to_string(),
                product_name: "Speaker".to_string(),
                category: "Electronics".to_string(),
                revenue: 100.0,
                ..SalesRecord::default()
            }],
        };

        write_table_csv(&path, &table).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("OrderID,"));
        assert!(body.contains("O1"));
        assert!(body.contains("Speaker"));
        assert!(body.contains("100.00"));
    }
}
