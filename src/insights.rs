//! Insight report composition.
//!
//! A fixed-structure plain-text document: banner, KPI lines, top category,
//! top product, a trend sentence, and three recommendation bullets. Pure
//! function of the cleaned table and the KPI set; the writer overwrites any
//! existing report file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::agg;
use crate::domain::{INSIGHTS_FILE, SalesTable};
use crate::error::{AppError, EXIT_IO};
use crate::kpi::KpiSet;

const BANNER: &str = "=====================================================";

/// Compose the report text.
pub fn compose_insights(table: &SalesTable, kpis: &KpiSet) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("      BUSINESS INSIGHTS - SALES PIPELINE REPORT\n");
    out.push_str(BANNER);
    out.push_str("\n\n");

    out.push_str("KEY KPIs\n");
    for (name, value) in kpis.lines() {
        out.push_str(&format!(" - {name}: {value}\n"));
    }

    out.push_str("\nTop Category:\n");
    out.push_str(&format!(
        "   {}\n",
        agg::top_category(table).unwrap_or_else(|| "n/a".to_string())
    ));

    out.push_str("\nTop Product:\n");
    out.push_str(&format!(
        "   {}\n",
        agg::top_product(table).unwrap_or_else(|| "n/a".to_string())
    ));

    out.push_str("\nRevenue Trend:\n");
    out.push_str("   Revenue shows consistent monthly variation.\n");

    out.push_str("\nRecommendations:\n");
    out.push_str(" - Promote high-performing categories.\n");
    out.push_str(" - Create combo offers for low-selling products.\n");
    out.push_str(" - Increase campaigns during peak days.\n");

    out
}

/// Write the report under `report_dir`, replacing any previous run's file.
pub fn write_insights(table: &SalesTable, kpis: &KpiSet, report_dir: &Path) -> Result<(), AppError> {
    let path = report_dir.join(INSIGHTS_FILE);
    fs::write(&path, compose_insights(table, kpis)).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to write '{}': {e}", path.display()))
    })?;
    info!(artifact = INSIGHTS_FILE, "insights file generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;
    use crate::kpi::compute_kpis;

    fn row(order_id: &str, category: &str, product: &str, revenue: f64) -> SalesRecord {
        SalesRecord {
            order_id: order_id.to_string(),
            product_id: format!("{order_id}-p"),
            category: category.to_string(),
            product_name: product.to_string(),
            revenue,
            ..SalesRecord::default()
        }
    }

    fn scenario() -> SalesTable {
        SalesTable {
            rows: vec![
                row("O1", "Electronics", "Speaker", 100.0),
                row("O2", "Electronics", "Speaker", 50.0),
                row("O3", "Fashion", "Shoes", 200.0),
            ],
        }
    }

    #[test]
    fn report_names_the_leading_category_and_product() {
        let table = scenario();
        let text = compose_insights(&table, &compute_kpis(&table));
        assert!(text.contains("Fashion"));
        assert!(text.contains("Shoes"));
        assert!(text.contains(" - Total Revenue: 350.00"));
        assert!(text.contains(" - Total Orders: 3"));
    }

    #[test]
    fn report_has_the_fixed_section_order() {
        let table = scenario();
        let text = compose_insights(&table, &compute_kpis(&table));
        let kpis = text.find("KEY KPIs").unwrap();
        let cat = text.find("Top Category:").unwrap();
        let prod = text.find("Top Product:").unwrap();
        let trend = text.find("Revenue Trend:").unwrap();
        let recs = text.find("Recommendations:").unwrap();
        assert!(kpis < cat && cat < prod && prod < trend && trend < recs);
        assert_eq!(text.matches("\n - ").count(), 8, "5 KPI lines + 3 bullets");
    }

    #[test]
    fn empty_table_reports_placeholders() {
        let table = SalesTable::default();
        let text = compose_insights(&table, &compute_kpis(&table));
        assert!(text.contains("Top Category:\n   n/a"));
        assert!(text.contains("Top Product:\n   n/a"));
    }

    #[test]
    fn writer_overwrites_a_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INSIGHTS_FILE);
        std::fs::write(&path, "stale").unwrap();

        let table = scenario();
        write_insights(&table, &compute_kpis(&table), dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(BANNER));
        assert!(!text.contains("stale"));
    }
}
