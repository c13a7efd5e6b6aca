//! Filter queries and the dashboard's dataset cache.
//!
//! The dashboard filters by category and year and previews the resulting
//! sub-table. The cache keys on the dataset file's modification time so an
//! edited CSV is picked up on the next reload without restarting.

use std::collections::BTreeSet;
use std::time::SystemTime;

use tracing::debug;

use crate::app::pipeline::{self, Dataset};
use crate::domain::{RunConfig, SalesTable};
use crate::error::{AppError, EXIT_EMPTY_DATA};

/// Distinct non-empty category values, sorted.
pub fn categories(table: &SalesTable) -> Vec<String> {
    table
        .rows
        .iter()
        .filter(|r| !r.category.is_empty())
        .map(|r| r.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, ascending. Rows with an unparsed date contribute nothing.
pub fn years(table: &SalesTable) -> Vec<i32> {
    table
        .rows
        .iter()
        .filter_map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows whose category is in `cats` and whose year is in `yrs`.
///
/// A row with no parsed date has no year, so it never satisfies the year
/// predicate and is excluded from every filtered view.
pub fn filter(table: &SalesTable, cats: &[String], yrs: &[i32]) -> SalesTable {
    let rows = table
        .rows
        .iter()
        .filter(|r| cats.iter().any(|c| *c == r.category))
        .filter(|r| r.year.is_some_and(|y| yrs.contains(&y)))
        .cloned()
        .collect();
    SalesTable { rows }
}

/// Cached dataset keyed on the source file's mtime.
#[derive(Debug)]
pub struct DatasetCache {
    config: RunConfig,
    modified: Option<SystemTime>,
    dataset: Option<Dataset>,
}

impl DatasetCache {
    pub fn new(config: RunConfig) -> Self {
        Self { config, modified: None, dataset: None }
    }

    /// The cached dataset, reloading when the file changed on disk.
    pub fn load(&mut self) -> Result<&Dataset, AppError> {
        let modified = std::fs::metadata(&self.config.dataset_path)
            .and_then(|m| m.modified())
            .ok();

        if self.dataset.is_none() || modified != self.modified {
            debug!(dataset = %self.config.dataset_path.display(), "reloading dataset cache");
            self.dataset = Some(pipeline::load_dataset(&self.config)?);
            self.modified = modified;
        }

        match &self.dataset {
            Some(dataset) => Ok(dataset),
            None => Err(AppError::new(EXIT_EMPTY_DATA, "Dataset cache is empty")),
        }
    }

    /// Drop the cached copy; the next `load` rereads from disk.
    pub fn invalidate(&mut self) {
        self.dataset = None;
        self.modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;
    use std::io::Write;

    fn row(category: &str, year: Option<i32>, revenue: f64) -> SalesRecord {
        SalesRecord {
            order_id: format!("{category}-{revenue}"),
            category: category.to_string(),
            year,
            revenue,
            ..SalesRecord::default()
        }
    }

    #[test]
    fn distinct_values_are_sorted_and_skip_blanks() {
        let table = SalesTable {
            rows: vec![
                row("Fashion", Some(2025), 1.0),
                row("Electronics", Some(2024), 2.0),
                row("", Some(2025), 3.0),
                row("Fashion", None, 4.0),
            ],
        };
        assert_eq!(categories(&table), vec!["Electronics", "Fashion"]);
        assert_eq!(years(&table), vec![2024, 2025]);
    }

    #[test]
    fn filter_intersects_category_and_year() {
        let table = SalesTable {
            rows: vec![
                row("Fashion", Some(2025), 1.0),
                row("Fashion", Some(2024), 2.0),
                row("Electronics", Some(2025), 3.0),
            ],
        };
        let sub = filter(&table, &["Fashion".to_string()], &[2025]);
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.rows[0].revenue, 1.0);
    }

    #[test]
    fn undated_rows_never_pass_the_year_filter() {
        let table = SalesTable { rows: vec![row("Fashion", None, 1.0)] };
        let sub = filter(&table, &["Fashion".to_string()], &[2024, 2025]);
        assert!(sub.is_empty());
    }

    #[test]
    fn cache_reloads_when_the_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "OrderID,Category,Revenue,OrderDate\nO1,A,10,2025-01-05\n").unwrap();

        let config = RunConfig {
            dataset_path: path.clone(),
            report_dir: dir.path().join("report"),
            force: false,
        };
        let mut cache = DatasetCache::new(config);
        assert_eq!(cache.load().unwrap().table.len(), 1);

        // Append a row and push the mtime forward past filesystem granularity.
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "O2,B,20,2025-02-06").unwrap();
        drop(file);
        let later = SystemTime::now() + std::time::Duration::from_secs(2);
        file_set_mtime(&path, later);

        assert_eq!(cache.load().unwrap().table.len(), 2);
    }

    #[test]
    fn invalidate_forces_a_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "OrderID,Category,Revenue,OrderDate\nO1,A,10,2025-01-05\n").unwrap();

        let config = RunConfig {
            dataset_path: path.clone(),
            report_dir: dir.path().join("report"),
            force: false,
        };
        let mut cache = DatasetCache::new(config);
        cache.load().unwrap();
        // Rewrite in place; mtime granularity may hide the change, so force it.
        std::fs::write(&path, "OrderID,Category,Revenue,OrderDate\nO1,A,10,2025-01-05\nO2,B,20,2025-02-06\n")
            .unwrap();
        cache.invalidate();
        assert_eq!(cache.load().unwrap().table.len(), 2);
    }

    fn file_set_mtime(path: &std::path::Path, to: SystemTime) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(to).unwrap();
    }
}
