//! Plotters-powered revenue trend widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - the same drawing vocabulary as the PNG artifacts
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the monthly series is computed
/// outside the render call, so `render()` stays focused on drawing.
pub struct TrendChart<'a> {
    /// Monthly revenue, chronological, as (month index, revenue).
    pub series: &'a [(f64, f64)],
    /// Month bucket labels parallel to `series`.
    pub months: &'a [String],
    pub y_label: &'a str,
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.series.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No dated rows match the current filters.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x1 = (self.series.len() as f64 - 1.0).max(1.0);
        let y_max = self
            .series
            .iter()
            .map(|&(_, y)| y)
            .fold(0.0_f64, f64::max)
            .max(1.0);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(0.0..x1, 0.0..y_max * 1.05)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("month")
                .y_desc(self.y_label)
                .x_labels(self.months.len().min(6))
                .y_labels(5)
                .x_label_formatter(&|v| {
                    self.months
                        .get(v.round() as usize)
                        .cloned()
                        .unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            chart.draw_series(LineSeries::new(self.series.iter().copied(), &line_color))?;

            // `Circle` radii map poorly through the terminal backend, so mark
            // the observations with plain pixels.
            chart.draw_series(
                self.series
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), RGBColor(255, 255, 0))),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
