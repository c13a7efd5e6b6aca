//! KPI computation.
//!
//! Exactly five headline figures, computed once over the full cleaned table
//! (never over a filtered view). Both the static report and the dashboard's
//! metric cards read from this one implementation.

use std::collections::HashSet;

use tracing::info;

use crate::domain::SalesTable;

/// The five KPIs in their fixed report order.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
    pub total_products: usize,
    /// `None` when the dataset carries no category values at all.
    pub total_categories: Option<usize>,
}

impl KpiSet {
    /// `(name, formatted value)` pairs in the fixed report order.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Revenue", format!("{:.2}", self.total_revenue)),
            ("Total Orders", self.total_orders.to_string()),
            ("Average Order Value", format!("{:.2}", self.average_order_value)),
            ("Total Products", self.total_products.to_string()),
            (
                "Total Categories",
                self.total_categories
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
        ]
    }
}

/// Compute the KPI set over the full cleaned table.
pub fn compute_kpis(table: &SalesTable) -> KpiSet {
    let total_revenue: f64 = table.rows.iter().map(|r| r.revenue).sum();
    let total_orders = distinct_nonempty(table.rows.iter().map(|r| r.order_id.as_str()));
    let total_products = distinct_nonempty(table.rows.iter().map(|r| r.product_id.as_str()));
    let category_count = distinct_nonempty(table.rows.iter().map(|r| r.category.as_str()));

    let kpis = KpiSet {
        total_revenue,
        total_orders,
        // max(orders, 1) guards the empty table; with zero orders the revenue
        // sum is also zero, so this yields 0 rather than a division fault.
        average_order_value: total_revenue / total_orders.max(1) as f64,
        total_products,
        total_categories: (category_count > 0).then_some(category_count),
    };
    info!(
        total_revenue = kpis.total_revenue,
        total_orders = kpis.total_orders,
        "KPIs computed"
    );
    kpis
}

fn distinct_nonempty<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.filter(|v| !v.is_empty()).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;

    fn row(order_id: &str, product_id: &str, category: &str, revenue: f64) -> SalesRecord {
        SalesRecord {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            category: category.to_string(),
            revenue,
            ..SalesRecord::default()
        }
    }

    #[test]
    fn kpis_over_the_reference_scenario() {
        let table = SalesTable {
            rows: vec![
                row("O1", "P1", "Electronics", 100.0),
                row("O2", "P1", "Electronics", 50.0),
                row("O3", "P2", "Fashion", 200.0),
            ],
        };
        let kpis = compute_kpis(&table);
        assert_eq!(kpis.total_revenue, 350.0);
        assert_eq!(kpis.total_orders, 3);
        assert!((kpis.average_order_value - 350.0 / 3.0).abs() < 1e-9);
        assert_eq!(kpis.total_products, 2);
        assert_eq!(kpis.total_categories, Some(2));
    }

    #[test]
    fn empty_table_has_zero_average_order_value() {
        let kpis = compute_kpis(&SalesTable::default());
        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.total_orders, 0);
        assert_eq!(kpis.average_order_value, 0.0);
        assert_eq!(kpis.total_categories, None);
    }

    #[test]
    fn duplicate_order_ids_count_once() {
        let table = SalesTable {
            rows: vec![row("O1", "P1", "C", 10.0), row("O1", "P2", "C", 15.0)],
        };
        let kpis = compute_kpis(&table);
        assert_eq!(kpis.total_orders, 1);
        assert_eq!(kpis.total_revenue, 25.0);
    }

    #[test]
    fn kpi_lines_keep_the_fixed_order() {
        let names: Vec<&str> = compute_kpis(&SalesTable::default())
            .lines()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Total Revenue",
                "Total Orders",
                "Average Order Value",
                "Total Products",
                "Total Categories",
            ]
        );
    }
}
