//! Ratatui-based sales dashboard.
//!
//! The dashboard opens after the gated report pipeline has run, so the PNG
//! artifacts on disk and the interactive view always describe the same
//! dataset. Filters (category, year) apply to the charts and the row
//! preview; the KPI cards always summarize the full dataset.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::agg;
use crate::app::pipeline::{self, Dataset, ReportRun};
use crate::domain::{INSIGHTS_FILE, RunConfig, SalesTable};
use crate::error::{AppError, EXIT_RENDER};
use crate::query::{self, DatasetCache};

mod plotters_chart;

use plotters_chart::TrendChart;

/// Rows shown in the preview table.
const PREVIEW_ROWS: usize = 100;

/// Start the dashboard.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    // Make sure the on-disk report matches the dataset before going
    // interactive; a fresh report is a no-op here.
    pipeline::run_report(&config)?;

    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RENDER, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RENDER, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RENDER,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Categories,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Trend,
    Categories,
    Insights,
    Preview,
}

struct App {
    config: RunConfig,
    cache: DatasetCache,
    kpi_lines: Vec<(&'static str, String)>,
    categories: Vec<String>,
    years: Vec<i32>,
    cat_selected: Vec<bool>,
    year_selected: Vec<bool>,
    focus: Panel,
    cat_cursor: usize,
    year_cursor: usize,
    view: View,
    filtered: SalesTable,
    insights_text: String,
    status: String,
}

impl App {
    fn new(config: RunConfig) -> Result<Self, AppError> {
        let mut cache = DatasetCache::new(config.clone());
        let dataset = cache.load()?.clone();

        let categories = query::categories(&dataset.table);
        let years = query::years(&dataset.table);
        let insights_text = read_insights(&config);

        let mut app = Self {
            config,
            cache,
            kpi_lines: dataset.kpis.lines(),
            cat_selected: vec![true; categories.len()],
            year_selected: vec![true; years.len()],
            categories,
            years,
            focus: Panel::Categories,
            cat_cursor: 0,
            year_cursor: 0,
            view: View::Trend,
            filtered: SalesTable::default(),
            insights_text,
            status: "Ready.".to_string(),
        };
        app.apply_filters(&dataset);
        Ok(app)
    }

    fn apply_filters(&mut self, dataset: &Dataset) {
        let cats: Vec<String> = self
            .categories
            .iter()
            .zip(&self.cat_selected)
            .filter(|&(_, sel)| *sel)
            .map(|(c, _)| c.clone())
            .collect();
        let yrs: Vec<i32> = self
            .years
            .iter()
            .zip(&self.year_selected)
            .filter(|&(_, sel)| *sel)
            .map(|(y, _)| *y)
            .collect();
        self.filtered = query::filter(&dataset.table, &cats, &yrs);
    }

    fn refilter(&mut self) -> Result<(), AppError> {
        let dataset = self.cache.load()?.clone();
        self.apply_filters(&dataset);
        Ok(())
    }

    fn reload(&mut self) -> Result<(), AppError> {
        self.cache.invalidate();
        let dataset = self.cache.load()?.clone();
        self.kpi_lines = dataset.kpis.lines();
        self.categories = query::categories(&dataset.table);
        self.years = query::years(&dataset.table);
        self.cat_selected = vec![true; self.categories.len()];
        self.year_selected = vec![true; self.years.len()];
        self.cat_cursor = 0;
        self.year_cursor = 0;
        self.apply_filters(&dataset);
        self.insights_text = read_insights(&self.config);
        self.status = format!("Reloaded {} rows.", dataset.table.len());
        Ok(())
    }

    fn regenerate(&mut self) -> Result<(), AppError> {
        let config = RunConfig { force: true, ..self.config.clone() };
        match pipeline::run_report(&config)? {
            ReportRun::Generated(_) => {
                self.status = format!("Report regenerated in '{}'.", config.report_dir.display());
            }
            ReportRun::UpToDate => {
                self.status = "Report already up to date.".to_string();
            }
        }
        self.insights_text = read_insights(&self.config);
        Ok(())
    }

    fn export_preview(&mut self) {
        let path = self.config.report_dir.join("preview_export.csv");
        match crate::io::export::write_table_csv(&path, &self.filtered) {
            Ok(()) => {
                self.status = format!("Exported {} rows to '{}'.", self.filtered.len(), path.display());
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RENDER, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RENDER, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(EXIT_RENDER, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Panel::Categories => Panel::Years,
                    Panel::Years => Panel::Categories,
                };
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Char(' ') => {
                self.toggle_selected();
                self.refilter()?;
            }
            KeyCode::Char('a') => {
                self.select_all();
                self.refilter()?;
            }
            KeyCode::Char('1') => self.view = View::Trend,
            KeyCode::Char('2') => self.view = View::Categories,
            KeyCode::Char('3') => self.view = View::Insights,
            KeyCode::Char('4') => self.view = View::Preview,
            KeyCode::Char('r') => self.reload()?,
            KeyCode::Char('g') => self.regenerate()?,
            KeyCode::Char('e') => self.export_preview(),
            _ => {}
        }
        Ok(false)
    }

    fn move_cursor(&mut self, delta: i32) {
        let (cursor, len) = match self.focus {
            Panel::Categories => (&mut self.cat_cursor, self.categories.len()),
            Panel::Years => (&mut self.year_cursor, self.years.len()),
        };
        if len == 0 {
            return;
        }
        if delta < 0 {
            *cursor = cursor.saturating_sub(1);
        } else {
            *cursor = (*cursor + 1).min(len - 1);
        }
    }

    fn toggle_selected(&mut self) {
        match self.focus {
            Panel::Categories => {
                if let Some(sel) = self.cat_selected.get_mut(self.cat_cursor) {
                    *sel = !*sel;
                }
            }
            Panel::Years => {
                if let Some(sel) = self.year_selected.get_mut(self.year_cursor) {
                    *sel = !*sel;
                }
            }
        }
    }

    fn select_all(&mut self) {
        match self.focus {
            Panel::Categories => self.cat_selected.iter_mut().for_each(|s| *s = true),
            Panel::Years => self.year_selected.iter_mut().for_each(|s| *s = true),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("pulse", Style::default().fg(Color::Cyan)),
            Span::raw(" — sales analytics dashboard | "),
            Span::styled(
                format!(
                    "dataset: {} | filtered rows: {}",
                    self.config.dataset_path.display(),
                    self.filtered.len()
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(20); 5])
            .split(area);

        for (i, (name, value)) in self.kpi_lines.iter().enumerate().take(cards.len()) {
            let text = Text::from(vec![
                Line::from(Span::styled(
                    value.clone(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
            ]);
            let card = Paragraph::new(text)
                .block(Block::default().title(*name).borders(Borders::ALL));
            frame.render_widget(card, cards[i]);
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);

        self.draw_filters(frame, chunks[0]);
        self.draw_view(frame, chunks[1]);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.draw_filter_list(
            frame,
            chunks[0],
            "Categories",
            Panel::Categories,
            self.categories.iter().map(String::as_str),
            &self.cat_selected,
            self.cat_cursor,
        );
        let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
        self.draw_filter_list(
            frame,
            chunks[1],
            "Years",
            Panel::Years,
            years.iter().map(String::as_str),
            &self.year_selected,
            self.year_cursor,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_filter_list<'a>(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        panel: Panel,
        values: impl Iterator<Item = &'a str>,
        selected: &[bool],
        cursor: usize,
    ) {
        let items: Vec<ListItem> = values
            .enumerate()
            .map(|(i, value)| {
                let mark = if selected.get(i).copied().unwrap_or(false) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {value}"))
            })
            .collect();

        let focused = self.focus == panel;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if focused {
            state.select(Some(cursor));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_view(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.view {
            View::Trend => self.draw_trend(frame, area),
            View::Categories => self.draw_categories(frame, area),
            View::Insights => self.draw_insights(frame, area),
            View::Preview => self.draw_preview(frame, area),
        }
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Monthly Revenue Trend").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let monthly = agg::revenue_by_month(&self.filtered);
        let months: Vec<String> = monthly.iter().map(|(m, _)| m.clone()).collect();
        let series: Vec<(f64, f64)> = monthly
            .iter()
            .enumerate()
            .map(|(i, &(_, v))| (i as f64, v))
            .collect();

        let widget = TrendChart {
            series: &series,
            months: &months,
            y_label: "revenue",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_categories(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cats = agg::revenue_by_category(&self.filtered);
        let bars: Vec<Bar> = cats
            .iter()
            .map(|(name, value)| {
                Bar::default()
                    .label(Line::from(name.clone()))
                    .value(value.round() as u64)
            })
            .collect();

        let chart = BarChart::default()
            .block(Block::default().title("Revenue by Category").borders(Borders::ALL))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_insights(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(self.insights_text.clone())
            .block(Block::default().title("Insights").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(["OrderID", "Date", "Product", "Category", "Qty", "Revenue"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .filtered
            .rows
            .iter()
            .take(PREVIEW_ROWS)
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.order_id.clone()),
                    Cell::from(r.order_date.map(|d| d.to_string()).unwrap_or_default()),
                    Cell::from(r.product_name.clone()),
                    Cell::from(r.category.clone()),
                    Cell::from(format!("{}", r.quantity)),
                    Cell::from(format!("{:.2}", r.revenue)),
                ])
            })
            .collect();

        let title = format!(
            "Preview (first {} of {} rows)",
            self.filtered.len().min(PREVIEW_ROWS),
            self.filtered.len()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Min(20),
                Constraint::Length(14),
                Constraint::Length(6),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "Tab panel  ↑/↓ move  space toggle  a all  1-4 views  r reload  g regenerate  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn read_insights(config: &RunConfig) -> String {
    std::fs::read_to_string(config.report_dir.join(INSIGHTS_FILE))
        .unwrap_or_else(|_| "Insights file not found. Press 'g' to regenerate the report.".to_string())
}
