//! Group-by aggregations over the cleaned table.
//!
//! Every chart and the insight report read through these helpers, so the
//! dashboard and the static artifacts cannot drift apart.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::SalesTable;

/// Weekday names in calendar order, used to order heatmap rows.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Sum of revenue per month bucket, in chronological order.
///
/// Buckets are ordered by the calendar date they imply, not by string
/// comparison; a dataset spanning a year boundary must place December of
/// year Y before January of year Y+1.
pub fn revenue_by_month(table: &SalesTable) -> Vec<(String, f64)> {
    let mut sums: HashMap<String, f64> = HashMap::new();
    for row in &table.rows {
        if let Some(month) = &row.month {
            *sums.entry(month.clone()).or_default() += row.revenue;
        }
    }
    let mut out: Vec<(String, f64)> = sums.into_iter().collect();
    out.sort_by_key(|(bucket, _)| bucket_start(bucket));
    out
}

/// First day of the month a `YYYY-MM` bucket refers to.
pub fn bucket_start(bucket: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{bucket}-01"), "%Y-%m-%d").ok()
}

/// Sum of revenue per category, descending. Empty categories are skipped.
pub fn revenue_by_category(table: &SalesTable) -> Vec<(String, f64)> {
    grouped_revenue_desc(table, |r| (!r.category.is_empty()).then(|| r.category.clone()))
}

/// Top `n` products by summed revenue, descending.
pub fn top_products(table: &SalesTable, n: usize) -> Vec<(String, f64)> {
    let mut out =
        grouped_revenue_desc(table, |r| (!r.product_name.is_empty()).then(|| r.product_name.clone()));
    out.truncate(n);
    out
}

fn grouped_revenue_desc(
    table: &SalesTable,
    key: impl Fn(&crate::domain::SalesRecord) -> Option<String>,
) -> Vec<(String, f64)> {
    let mut sums: HashMap<String, f64> = HashMap::new();
    for row in &table.rows {
        if let Some(k) = key(row) {
            *sums.entry(k).or_default() += row.revenue;
        }
    }
    let mut out: Vec<(String, f64)> = sums.into_iter().collect();
    out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Category with the highest summed revenue, if any.
pub fn top_category(table: &SalesTable) -> Option<String> {
    revenue_by_category(table).into_iter().next().map(|(name, _)| name)
}

/// Product with the highest summed revenue, if any.
pub fn top_product(table: &SalesTable) -> Option<String> {
    top_products(table, 1).into_iter().next().map(|(name, _)| name)
}

/// Weekday-by-month revenue grid; cells with no orders are zero-filled.
#[derive(Debug, Clone, Default)]
pub struct WeekdayMonthGrid {
    /// Row labels, calendar order, only weekdays present in the data.
    pub weekdays: Vec<String>,
    /// Column labels, chronological order.
    pub months: Vec<String>,
    /// `cells[row][col]` = summed revenue for (weekday, month).
    pub cells: Vec<Vec<f64>>,
}

pub fn weekday_month_grid(table: &SalesTable) -> WeekdayMonthGrid {
    let months: Vec<String> = revenue_by_month(table).into_iter().map(|(m, _)| m).collect();

    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    for row in &table.rows {
        if let (Some(day), Some(month)) = (&row.weekday, &row.month) {
            *sums.entry((day.clone(), month.clone())).or_default() += row.revenue;
        }
    }

    let weekdays: Vec<String> = WEEKDAYS
        .iter()
        .filter(|day| months.iter().any(|m| sums.contains_key(&(day.to_string(), m.clone()))))
        .map(|day| day.to_string())
        .collect();

    let cells = weekdays
        .iter()
        .map(|day| {
            months
                .iter()
                .map(|month| sums.get(&(day.clone(), month.clone())).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    WeekdayMonthGrid { weekdays, months, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesRecord, SalesTable};
    use crate::io::clean::month_bucket;
    use chrono::{Datelike, NaiveDate};

    fn row(order_id: &str, category: &str, product: &str, revenue: f64, date: &str) -> SalesRecord {
        let order_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        SalesRecord {
            order_id: order_id.to_string(),
            category: category.to_string(),
            product_name: product.to_string(),
            revenue,
            order_date,
            month: order_date.map(month_bucket),
            year: order_date.map(|d| d.year()),
            weekday: order_date.map(|d| d.format("%A").to_string()),
            ..SalesRecord::default()
        }
    }

    fn table(rows: Vec<SalesRecord>) -> SalesTable {
        SalesTable { rows }
    }

    #[test]
    fn monthly_series_is_chronological_across_year_boundary() {
        // Lexicographic order would put "2025-01" before "2024-12".
        let t = table(vec![
            row("O1", "A", "X", 10.0, "2025-01-15"),
            row("O2", "A", "X", 20.0, "2024-12-05"),
            row("O3", "A", "X", 5.0, "2025-01-20"),
        ]);
        let monthly = revenue_by_month(&t);
        assert_eq!(monthly[0], ("2024-12".to_string(), 20.0));
        assert_eq!(monthly[1], ("2025-01".to_string(), 15.0));
    }

    #[test]
    fn categories_sort_descending_by_revenue() {
        let t = table(vec![
            row("O1", "Electronics", "Speaker", 100.0, "2025-01-05"),
            row("O2", "Electronics", "Speaker", 50.0, "2025-01-20"),
            row("O3", "Fashion", "Shoes", 200.0, "2025-02-10"),
        ]);
        let cats = revenue_by_category(&t);
        assert_eq!(cats[0], ("Fashion".to_string(), 200.0));
        assert_eq!(cats[1], ("Electronics".to_string(), 150.0));
        assert_eq!(top_category(&t).as_deref(), Some("Fashion"));
        assert_eq!(top_product(&t).as_deref(), Some("Shoes"));
    }

    #[test]
    fn top_products_truncates_to_n() {
        let rows: Vec<SalesRecord> = (0..15)
            .map(|i| row(&format!("O{i}"), "C", &format!("P{i}"), i as f64, "2025-03-01"))
            .collect();
        let top = top_products(&table(rows), 10);
        assert_eq!(top.len(), 10);
        for pair in top.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // The cutoff keeps the highest-revenue names.
        assert_eq!(top[0].0, "P14");
    }

    #[test]
    fn heatmap_grid_zero_fills_missing_cells() {
        let t = table(vec![
            row("O1", "A", "X", 10.0, "2025-01-06"), // Monday
            row("O2", "A", "X", 20.0, "2025-02-11"), // Tuesday
        ]);
        let grid = weekday_month_grid(&t);
        assert_eq!(grid.months, vec!["2025-01".to_string(), "2025-02".to_string()]);
        assert_eq!(grid.weekdays, vec!["Monday".to_string(), "Tuesday".to_string()]);
        assert_eq!(grid.cells[0], vec![10.0, 0.0]);
        assert_eq!(grid.cells[1], vec![0.0, 20.0]);
    }

    #[test]
    fn rows_without_dates_are_excluded_from_calendar_groupings() {
        let mut undated = row("O1", "A", "X", 99.0, "2025-01-06");
        undated.order_date = None;
        undated.month = None;
        undated.weekday = None;
        let t = table(vec![undated]);
        assert!(revenue_by_month(&t).is_empty());
        assert!(weekday_month_grid(&t).months.is_empty());
    }
}
