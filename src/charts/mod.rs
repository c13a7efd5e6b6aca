//! Chart rendering.
//!
//! Seven fixed PNG artifacts, each a pure function of the cleaned table,
//! each written to a dedicated file under the report directory. Rendering
//! happens in a fixed order and a failure aborts the whole run (exit code
//! 4); there is no partial-success mode.

use std::error::Error;
use std::path::Path;

use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::agg;
use crate::domain::{CHART_FILES, SalesTable};
use crate::error::{AppError, EXIT_RENDER};
use crate::math::stats;

pub mod style;

use style::{diverging_color, heat_color, slice_color};

type DrawResult = Result<(), Box<dyn Error>>;

/// Render all seven charts into `report_dir`, in their fixed order.
pub fn render_all(table: &SalesTable, report_dir: &Path) -> Result<(), AppError> {
    let renders: [(&str, fn(&SalesTable, &Path) -> DrawResult); 7] = [
        (CHART_FILES[0], draw_monthly_revenue),
        (CHART_FILES[1], draw_category_contribution),
        (CHART_FILES[2], draw_top_products),
        (CHART_FILES[3], draw_day_heatmap),
        (CHART_FILES[4], draw_correlation),
        (CHART_FILES[5], draw_revenue_distribution),
        (CHART_FILES[6], draw_category_pie),
    ];

    for (file, draw) in renders {
        let path = report_dir.join(file);
        draw(table, &path).map_err(|e| {
            AppError::new(EXIT_RENDER, format!("Failed to render '{}': {e}", path.display()))
        })?;
        info!(artifact = file, "saved visualization");
    }
    Ok(())
}

/// 01: revenue summed by month bucket, chronological, line + markers.
fn draw_monthly_revenue(table: &SalesTable, path: &Path) -> DrawResult {
    let monthly = agg::revenue_by_month(table);
    let root = BitMapBackend::new(path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if monthly.is_empty() {
        return draw_placeholder(&root, "Monthly Revenue Trend");
    }

    let n = monthly.len();
    let y_max = monthly.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Revenue Trend", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(0usize..n, 0f64..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Revenue")
        .x_labels(n.min(12))
        .x_label_formatter(&|idx| {
            monthly.get(*idx).map(|(m, _)| m.clone()).unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        monthly.iter().enumerate().map(|(i, &(_, v))| (i, v)),
        &BLUE,
    ))?;
    chart.draw_series(
        monthly
            .iter()
            .enumerate()
            .map(|(i, &(_, v))| Circle::new((i, v), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// 02: revenue summed by category, descending, horizontal bars (full set).
fn draw_category_contribution(table: &SalesTable, path: &Path) -> DrawResult {
    let cats = agg::revenue_by_category(table);
    horizontal_bars(path, (1000, 600), "Revenue Contribution by Category", &cats)
}

/// 03: revenue summed by product name, descending, truncated to the top 10.
fn draw_top_products(table: &SalesTable, path: &Path) -> DrawResult {
    let prods = agg::top_products(table, 10);
    horizontal_bars(path, (1200, 600), "Top 10 Products by Revenue", &prods)
}

/// Shared horizontal bar layout; `rows` arrive descending, the largest bar
/// is drawn at the top.
fn horizontal_bars(
    path: &Path,
    size: (u32, u32),
    title: &str,
    rows: &[(String, f64)],
) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    if rows.is_empty() {
        return draw_placeholder(&root, title);
    }

    let n = rows.len();
    let x_max = rows.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(240)
        .build_cartesian_2d(0f64..x_max * 1.05, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Revenue")
        .y_labels(n)
        .y_label_formatter(&|seg| {
            let idx = match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i,
                SegmentValue::Last => return String::new(),
            };
            // Row 0 renders at the bottom; flip so the largest sits on top.
            n.checked_sub(idx + 1)
                .and_then(|j| rows.get(j))
                .map(|(name, _)| name.clone())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(j, &(_, v))| {
        let row = n - 1 - j;
        Rectangle::new(
            [
                (0.0, SegmentValue::Exact(row)),
                (v, SegmentValue::Exact(row + 1)),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// 04: weekday-by-month revenue grid, zero-filled, color intensity.
fn draw_day_heatmap(table: &SalesTable, path: &Path) -> DrawResult {
    let grid = agg::weekday_month_grid(table);
    let root = BitMapBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    if grid.months.is_empty() || grid.weekdays.is_empty() {
        return draw_placeholder(&root, "Sales Distribution by Day & Month");
    }

    let max = grid
        .cells
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Sales Distribution by Day & Month", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(110)
        .build_cartesian_2d(
            (0..grid.months.len()).into_segmented(),
            (0..grid.weekdays.len()).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(grid.months.len())
        .y_labels(grid.weekdays.len())
        .x_label_formatter(&|seg| segment_label(seg, &grid.months))
        .y_label_formatter(&|seg| segment_label(seg, &grid.weekdays))
        .draw()?;

    chart.draw_series(grid.cells.iter().enumerate().flat_map(|(r, row)| {
        row.iter().enumerate().map(move |(c, &v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(c), SegmentValue::Exact(r)),
                    (SegmentValue::Exact(c + 1), SegmentValue::Exact(r + 1)),
                ],
                heat_color(v / max).filled(),
            )
        })
    }))?;

    root.present()?;
    Ok(())
}

/// 05: Pearson correlation among price, quantity, revenue, annotated grid.
fn draw_correlation(table: &SalesTable, path: &Path) -> DrawResult {
    const LABELS: [&str; 3] = ["Price", "Quantity", "Revenue"];

    let price: Vec<f64> = table.rows.iter().map(|r| r.price).collect();
    let quantity: Vec<f64> = table.rows.iter().map(|r| r.quantity).collect();
    let revenue: Vec<f64> = table.rows.iter().map(|r| r.revenue).collect();
    let matrix = stats::correlation_matrix(&[&price, &quantity, &revenue]);

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d((0..3usize).into_segmented(), (0..3usize).into_segmented())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_label_formatter(&|seg| segment_name(seg, &LABELS))
        .y_label_formatter(&|seg| segment_name(seg, &LABELS))
        .draw()?;

    chart.draw_series(matrix.iter().enumerate().flat_map(|(r, row)| {
        row.iter().enumerate().map(move |(c, &v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(c), SegmentValue::Exact(r)),
                    (SegmentValue::Exact(c + 1), SegmentValue::Exact(r + 1)),
                ],
                diverging_color((v + 1.0) / 2.0).filled(),
            )
        })
    }))?;

    let annotation = ("sans-serif", 20)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(matrix.iter().enumerate().flat_map(|(r, row)| {
        let annotation = annotation.clone();
        row.iter().enumerate().map(move |(c, &v)| {
            Text::new(
                format!("{v:.2}"),
                (SegmentValue::CenterOf(c), SegmentValue::CenterOf(r)),
                annotation.clone(),
            )
        })
    }))?;

    root.present()?;
    Ok(())
}

/// 06: revenue histogram with a Gaussian KDE overlay.
fn draw_revenue_distribution(table: &SalesTable, path: &Path) -> DrawResult {
    let values: Vec<f64> = table.rows.iter().map(|r| r.revenue).collect();
    let hist = stats::histogram(&values, 30);

    let root = BitMapBackend::new(path, (900, 450)).into_drawing_area();
    root.fill(&WHITE)?;

    if hist.counts.is_empty() {
        return draw_placeholder(&root, "Revenue Distribution");
    }

    let x_min = hist.edges[0];
    let x_max = hist.edges[hist.edges.len() - 1];
    let y_max = hist.max_count().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Revenue Distribution", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.1)?;

    chart.configure_mesh().x_desc("Revenue").y_desc("Count").draw()?;

    chart.draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(edge, &count)| {
        Rectangle::new(
            [(edge[0], 0.0), (edge[1], count as f64)],
            BLUE.mix(0.5).filled(),
        )
    }))?;

    // KDE is a density; rescale to count space so the overlay is comparable.
    let scale = values.len() as f64 * hist.bin_width();
    chart.draw_series(LineSeries::new(
        stats::gaussian_kde(&values, 200)
            .into_iter()
            .map(|(x, d)| (x, d * scale)),
        RED.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// 07: category revenue share pie with percentage labels.
fn draw_category_pie(table: &SalesTable, path: &Path) -> DrawResult {
    let cats: Vec<(String, f64)> = agg::revenue_by_category(table)
        .into_iter()
        .filter(|&(_, v)| v > 0.0)
        .collect();

    let root = BitMapBackend::new(path, (700, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    if cats.is_empty() {
        return draw_placeholder(&root, "Category Revenue Share");
    }

    let sizes: Vec<f64> = cats.iter().map(|&(_, v)| v).collect();
    let labels: Vec<String> = cats.iter().map(|(name, _)| name.clone()).collect();
    let colors: Vec<RGBColor> = (0..cats.len()).map(slice_color).collect();

    let center = (350, 370);
    let radius = 240.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 20).into_font());
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));

    root.draw(&Text::new(
        "Category Revenue Share",
        (230, 24),
        ("sans-serif", 28).into_font(),
    ))?;
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

/// Blank artifact for degenerate inputs (e.g. every order date unparseable).
fn draw_placeholder(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    title: &str,
) -> DrawResult {
    root.draw(&Text::new(
        format!("{title} (no data)"),
        (40, 40),
        ("sans-serif", 24).into_font(),
    ))?;
    root.present()?;
    Ok(())
}

fn segment_label(seg: &SegmentValue<usize>, labels: &[String]) -> String {
    match seg {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

fn segment_name(seg: &SegmentValue<usize>, labels: &[&str]) -> String {
    match seg {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;
    use crate::io::clean::month_bucket;
    use chrono::{Datelike, NaiveDate};

    fn sample_table() -> SalesTable {
        let rows = (0..8)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2025, 1 + (i % 3) as u32, 5 + i as u32).unwrap();
                SalesRecord {
                    order_id: format!("O{i}"),
                    product_id: format!("P{}", i % 3),
                    product_name: format!("Product {}", i % 3),
                    category: if i % 2 == 0 { "Electronics" } else { "Fashion" }.to_string(),
                    price: 100.0 + i as f64,
                    quantity: 1.0 + (i % 3) as f64,
                    revenue: 100.0 * (1 + i) as f64,
                    order_date: Some(date),
                    month: Some(month_bucket(date)),
                    year: Some(date.year()),
                    weekday: Some(date.format("%A").to_string()),
                    ..SalesRecord::default()
                }
            })
            .collect();
        SalesTable { rows }
    }

    #[test]
    fn render_all_writes_seven_files() {
        let dir = tempfile::tempdir().unwrap();
        render_all(&sample_table(), dir.path()).unwrap();
        for file in CHART_FILES {
            let path = dir.path().join(file);
            assert!(path.exists(), "missing {file}");
            assert!(std::fs::metadata(&path).unwrap().len() > 0, "empty {file}");
        }
    }

    #[test]
    fn render_all_tolerates_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        render_all(&SalesTable::default(), dir.path()).unwrap();
        for file in CHART_FILES {
            assert!(dir.path().join(file).exists(), "missing {file}");
        }
    }
}
