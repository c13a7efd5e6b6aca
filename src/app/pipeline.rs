//! The report pipeline shared by the CLI and the dashboard.
//!
//! One entry point, `run_report`, owns the whole artifact lifecycle:
//! freshness gate, directory setup, load, clean, KPIs, charts, insights,
//! manifest. Callers on either surface get the same behavior.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::charts;
use crate::domain::{RunConfig, RunManifest, SalesTable, artifact_files};
use crate::error::{AppError, EXIT_EMPTY_DATA, EXIT_IO};
use crate::insights;
use crate::io::{clean, ingest, manifest};
use crate::kpi::{self, KpiSet};

/// A loaded and cleaned dataset plus its KPIs.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: SalesTable,
    pub kpis: KpiSet,
}

/// Outcome of a gated report run.
#[derive(Debug, Clone)]
pub enum ReportRun {
    /// Artifacts were already fresh; nothing was touched.
    UpToDate,
    /// Artifacts were (re)generated from this dataset.
    Generated(Dataset),
}

/// Load, clean and summarize the dataset without touching the report dir.
pub fn load_dataset(config: &RunConfig) -> Result<Dataset, AppError> {
    let raw = ingest::load_orders(&config.dataset_path)?;
    let table = clean::clean_table(raw);
    if table.is_empty() {
        return Err(AppError::new(
            EXIT_EMPTY_DATA,
            format!("Dataset '{}' contains no rows", config.dataset_path.display()),
        ));
    }
    let kpis = kpi::compute_kpis(&table);
    Ok(Dataset { table, kpis })
}

/// Run the full report pipeline, honoring the freshness gate.
pub fn run_report(config: &RunConfig) -> Result<ReportRun, AppError> {
    // Surface a missing dataset before any directory or manifest work.
    ingest::require_dataset(&config.dataset_path)?;

    let current = manifest::current_manifest(&config.dataset_path)?;
    if !config.force && artifacts_fresh(&config.report_dir, &current) {
        info!(report_dir = %config.report_dir.display(), "artifacts up to date, skipping");
        return Ok(ReportRun::UpToDate);
    }

    init_report_dir(&config.report_dir)?;
    let dataset = load_dataset(config)?;

    charts::render_all(&dataset.table, &config.report_dir)?;
    insights::write_insights(&dataset.table, &dataset.kpis, &config.report_dir)?;
    manifest::write_manifest(&config.report_dir, &current)?;

    info!(
        rows = dataset.table.len(),
        report_dir = %config.report_dir.display(),
        "report generated"
    );
    Ok(ReportRun::Generated(dataset))
}

/// True when every artifact exists and the recorded manifest matches the
/// dataset's current fingerprint. Presence alone is not enough; a report
/// built from an older dataset must be rebuilt.
pub fn artifacts_fresh(report_dir: &Path, current: &RunManifest) -> bool {
    let all_present = artifact_files().all(|f| report_dir.join(f).exists());
    all_present && manifest::read_manifest(report_dir).as_ref() == Some(current)
}

/// Create the report directory (and parents) if missing.
pub fn init_report_dir(report_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(report_dir).map_err(|e| {
        AppError::new(
            EXIT_IO,
            format!("Failed to create report directory '{}': {e}", report_dir.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CHART_FILES, INSIGHTS_FILE};
    use std::path::PathBuf;

    const SCENARIO_CSV: &str = "\
OrderID,ProductID,ProductName,Category,Price,Quantity,Revenue,OrderDate
O1,P1,Speaker,Electronics,50,2,100,2025-01-05
O2,P1,Speaker,Electronics,50,1,50,2025-01-20
O3,P2,Shoes,Fashion,100,2,200,2025-02-10
";

    fn setup(csv: &str) -> (tempfile::TempDir, RunConfig) {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.csv");
        fs::write(&dataset_path, csv).unwrap();
        let config = RunConfig {
            dataset_path,
            report_dir: dir.path().join("report"),
            force: false,
        };
        (dir, config)
    }

    fn assert_generated(run: &ReportRun) -> &Dataset {
        match run {
            ReportRun::Generated(dataset) => dataset,
            ReportRun::UpToDate => panic!("expected a generated report"),
        }
    }

    #[test]
    fn full_run_writes_every_artifact() {
        let (_dir, config) = setup(SCENARIO_CSV);
        let run = run_report(&config).unwrap();
        let dataset = assert_generated(&run);

        assert_eq!(dataset.kpis.total_revenue, 350.0);
        assert_eq!(dataset.kpis.total_orders, 3);
        assert_eq!(dataset.kpis.total_categories, Some(2));

        for file in artifact_files() {
            assert!(config.report_dir.join(file).exists(), "missing {file}");
        }
        let insights = fs::read_to_string(config.report_dir.join(INSIGHTS_FILE)).unwrap();
        assert!(insights.contains("Fashion"));
        assert!(insights.contains("Shoes"));
    }

    #[test]
    fn rerun_on_unchanged_dataset_is_a_no_op() {
        let (_dir, config) = setup(SCENARIO_CSV);
        run_report(&config).unwrap();

        // Plant sentinel content; a true no-op leaves it untouched.
        let sentinel = config.report_dir.join(CHART_FILES[0]);
        fs::write(&sentinel, b"sentinel").unwrap();

        assert!(matches!(run_report(&config).unwrap(), ReportRun::UpToDate));
        assert_eq!(fs::read(&sentinel).unwrap(), b"sentinel");
    }

    #[test]
    fn changed_dataset_defeats_the_gate() {
        let (_dir, config) = setup(SCENARIO_CSV);
        run_report(&config).unwrap();

        let mut csv = SCENARIO_CSV.to_string();
        csv.push_str("O4,P3,Watch,Electronics,500,1,500,2025-03-01\n");
        fs::write(&config.dataset_path, csv).unwrap();

        let run = run_report(&config).unwrap();
        assert_eq!(assert_generated(&run).table.len(), 4);
    }

    #[test]
    fn missing_artifact_defeats_the_gate() {
        let (_dir, config) = setup(SCENARIO_CSV);
        run_report(&config).unwrap();

        fs::remove_file(config.report_dir.join(CHART_FILES[3])).unwrap();
        let run = run_report(&config).unwrap();
        assert!(matches!(run, ReportRun::Generated(_)));
        assert!(config.report_dir.join(CHART_FILES[3]).exists());
    }

    #[test]
    fn force_regenerates_fresh_artifacts() {
        let (_dir, config) = setup(SCENARIO_CSV);
        run_report(&config).unwrap();

        let sentinel = config.report_dir.join(CHART_FILES[0]);
        fs::write(&sentinel, b"sentinel").unwrap();

        let forced = RunConfig { force: true, ..config };
        assert!(matches!(run_report(&forced).unwrap(), ReportRun::Generated(_)));
        assert_ne!(fs::read(&sentinel).unwrap(), b"sentinel");
    }

    #[test]
    fn garbage_cells_are_repaired_not_fatal() {
        let csv = "\
OrderID,ProductID,ProductName,Category,Price,Quantity,Revenue,OrderDate
O1,P1,Speaker,Electronics,abc,two,N/A,2025-01-05
";
        let (_dir, config) = setup(csv);
        let dataset = load_dataset(&config).unwrap();
        assert_eq!(dataset.table.len(), 1);
        assert_eq!(dataset.table.rows[0].revenue, 0.0);
        assert_eq!(dataset.kpis.total_revenue, 0.0);
    }

    #[test]
    fn missing_dataset_reports_exit_code_one() {
        let config = RunConfig {
            dataset_path: PathBuf::from("definitely/not/here.csv"),
            report_dir: PathBuf::from("unused"),
            force: false,
        };
        assert_eq!(run_report(&config).unwrap_err().exit_code(), 1);
    }

    #[test]
    fn header_only_dataset_reports_empty_data() {
        let (_dir, config) = setup("OrderID,Revenue,OrderDate\n");
        assert_eq!(run_report(&config).unwrap_err().exit_code(), 3);
    }
}
