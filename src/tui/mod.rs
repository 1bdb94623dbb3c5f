//! Ratatui-based terminal UI.
//!
//! The dashboard owns the immutable dataset handle plus the session's
//! `SelectionState`; every interaction mutates the selection through its
//! methods and then re-runs the full view pipeline before redrawing. Nothing
//! is patched incrementally, so the chart tabs and tables always agree.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row,
        Table, Tabs,
    },
    Terminal,
};

use crate::agg::{GroupStats, TrendSeries};
use crate::app::pipeline::{self, ViewOutput};
use crate::cli::ViewArgs;
use crate::domain::{ChartTab, Dataset, Page, RiskLevel, SelectionState, BIN_MAX, BIN_MIN};
use crate::error::AppError;
use crate::io::ingest::IngestReport;

mod plotters_chart;

use plotters_chart::{RiskMixChart, TrendChart};

/// Series palette shared between the Plotters chart and the legend line.
const SERIES_COLORS: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 255, 0),
    (0, 255, 128),
    (255, 0, 255),
    (255, 165, 0),
    (135, 206, 250),
];

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    let config = crate::app::view_config_from_args(&args);
    let (dataset, ingest) = pipeline::load(&config)?;
    let selection = SelectionState::from_config(&dataset, &config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, ingest, selection);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

/// One settings-panel row the cursor can land on.
enum SettingsField {
    Rate(String),
    Risk(RiskLevel),
    YearMin,
    YearMax,
    CompareYear,
    HistRate,
    Bins,
}

struct App {
    dataset: Dataset,
    ingest: IngestReport,
    selection: SelectionState,
    page: Page,
    tab: ChartTab,
    selected_field: usize,
    status: String,
    view: ViewOutput,
}

impl App {
    fn new(dataset: Dataset, ingest: IngestReport, selection: SelectionState) -> Self {
        let view = pipeline::build_view(&dataset, &selection);
        let status = match_status(&view);
        Self {
            dataset,
            ingest,
            selection,
            page: Page::Dashboard,
            tab: ChartTab::Trends,
            selected_field: 0,
            status,
            view,
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
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('p') => {
                self.page = self.page.next();
                self.status = format!("page: {}", self.page.display_name());
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.status = format!("chart: {}", self.tab.display_name());
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                self.status = format!("chart: {}", self.tab.display_name());
            }
            KeyCode::Char('a') => {
                self.selection.all_rates = !self.selection.all_rates;
                self.refresh_view();
                self.status = if self.selection.all_rates {
                    "select-all ON (rate list overridden)".to_string()
                } else {
                    "select-all off".to_string()
                };
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(
                    &self.dataset,
                    &self.ingest,
                    &self.selection,
                    &self.view,
                ) {
                    Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => self.status = format!("Debug write failed: {err}"),
                }
            }
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.field_count() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_field(),
            _ => {}
        }

        false
    }

    fn field_count(&self) -> usize {
        self.dataset.descriptions().len() + RiskLevel::ALL.len() + 5
    }

    fn field_at(&self, idx: usize) -> SettingsField {
        let n_rates = self.dataset.descriptions().len();
        if idx < n_rates {
            return SettingsField::Rate(self.dataset.descriptions()[idx].clone());
        }
        let idx = idx - n_rates;
        if idx < RiskLevel::ALL.len() {
            return SettingsField::Risk(RiskLevel::ALL[idx]);
        }
        match idx - RiskLevel::ALL.len() {
            0 => SettingsField::YearMin,
            1 => SettingsField::YearMax,
            2 => SettingsField::CompareYear,
            3 => SettingsField::HistRate,
            _ => SettingsField::Bins,
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.field_at(self.selected_field) {
            SettingsField::Rate(description) => {
                self.selection.toggle_rate(&description);
                self.refresh_view();
            }
            SettingsField::Risk(level) => {
                self.selection.toggle_risk(level);
                self.refresh_view();
            }
            SettingsField::YearMin => {
                let candidate = (self.selection.year_min + delta)
                    .clamp(self.dataset.year_min(), self.selection.year_max);
                // The clamp keeps the pair ordered, so this cannot be rejected.
                if self
                    .selection
                    .set_year_range(candidate, self.selection.year_max)
                {
                    self.refresh_view();
                }
            }
            SettingsField::YearMax => {
                let candidate = (self.selection.year_max + delta)
                    .clamp(self.selection.year_min, self.dataset.year_max());
                if self
                    .selection
                    .set_year_range(self.selection.year_min, candidate)
                {
                    self.refresh_view();
                }
            }
            SettingsField::CompareYear => {
                self.selection.compare_year = (self.selection.compare_year + delta)
                    .clamp(self.dataset.year_min(), self.dataset.year_max());
                self.refresh_view();
            }
            SettingsField::HistRate => {
                self.cycle_hist_rate(delta);
                self.refresh_view();
            }
            SettingsField::Bins => {
                let step = if delta >= 0 { 5 } else { -5 };
                let next = self.selection.bins as i64 + step;
                self.selection.bins = next.clamp(BIN_MIN as i64, BIN_MAX as i64) as usize;
                self.refresh_view();
            }
        }
    }

    fn toggle_field(&mut self) {
        match self.field_at(self.selected_field) {
            SettingsField::Rate(description) => {
                self.selection.toggle_rate(&description);
                self.refresh_view();
            }
            SettingsField::Risk(level) => {
                self.selection.toggle_risk(level);
                self.refresh_view();
            }
            _ => {}
        }
    }

    /// Cycle the histogram focus through: all selected -> each rate -> back.
    fn cycle_hist_rate(&mut self, delta: i32) {
        let descriptions = self.dataset.descriptions();
        let n = descriptions.len() as i32;
        // -1 encodes "all selected rates".
        let current = self
            .selection
            .hist_rate
            .as_deref()
            .and_then(|d| descriptions.iter().position(|x| x == d))
            .map(|i| i as i32)
            .unwrap_or(-1);

        let mut next = current + if delta >= 0 { 1 } else { -1 };
        if next >= n {
            next = -1;
        }
        if next < -1 {
            next = n - 1;
        }

        self.selection.hist_rate = if next < 0 {
            None
        } else {
            Some(descriptions[next as usize].clone())
        };
    }

    fn refresh_view(&mut self) {
        self.view = pipeline::build_view(&self.dataset, &self.selection);
        self.status = match_status(&self.view);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.page {
            Page::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Page::Summary => self.draw_summary(frame, chunks[1]),
            Page::About => self.draw_about(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("rates", Style::default().fg(Color::Cyan)),
            Span::raw(" — historical interest-rate explorer"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | rows: {} used / {} read | page: {}",
                self.dataset.source(),
                self.ingest.rows_used,
                self.ingest.rows_read,
                self.page.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let rates_label = if self.selection.all_rates {
            "all (toggle)".to_string()
        } else {
            format!(
                "{}/{}",
                self.selection.rates.len(),
                self.dataset.descriptions().len()
            )
        };
        let hist_label = self
            .selection
            .hist_rate
            .as_deref()
            .unwrap_or("all selected");
        lines.push(Line::from(Span::styled(
            format!(
                "rates: {rates_label} | risk: {}/3 | years: {}-{} | hist: {} | bins: {}",
                self.selection.risk_levels.len(),
                self.selection.year_min,
                self.selection.year_max,
                truncate(hist_label, 28),
                self.selection.bins,
            ),
            Style::default().fg(Color::Gray),
        )));

        let filtered_line = match &self.view.stats {
            Some(stats) => format!(
                "filtered: n={} | years=[{}, {}] | value=[{:.2}, {:.2}]%",
                stats.n_records, stats.year_min, stats.year_max, stats.value_min, stats.value_max
            ),
            None => "filtered: no records match the current filters".to_string(),
        };
        lines.push(Line::from(Span::styled(
            filtered_line,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_dashboard(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        let chart_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(chunks[0]);

        self.draw_chart_tabs(frame, chart_chunks[0]);
        match self.tab {
            ChartTab::Trends => self.draw_trends(frame, chart_chunks[1]),
            ChartTab::Heatmap => self.draw_heatmap(frame, chart_chunks[1]),
            ChartTab::Compare => self.draw_compare(frame, chart_chunks[1]),
            ChartTab::RiskMix => self.draw_risk_mix(frame, chart_chunks[1]),
            ChartTab::Distribution => self.draw_distribution(frame, chart_chunks[1]),
            ChartTab::Records => self.draw_records(frame, chart_chunks[1]),
        }

        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = ChartTab::ALL
            .iter()
            .map(|t| Line::from(format!(" {} ", t.display_name())))
            .collect();
        let selected = ChartTab::ALL
            .iter()
            .position(|t| *t == self.tab)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn draw_trends(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Trends — mean value by year")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = self.view.trend.series_by_col();
        let Some((x_bounds, y_bounds)) = trend_bounds(&series) else {
            draw_empty_notice(frame, inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(Paragraph::new(trend_legend(&series)), rows[0]);
        frame.render_widget(
            TrendChart {
                series: &series,
                colors: &SERIES_COLORS,
                x_bounds,
                y_bounds,
                x_label: "year",
                y_label: "rate (%)",
            },
            rows[1],
        );
    }

    fn draw_heatmap(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Heatmap — mean value (year × rate type)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let table = &self.view.trend;
        let Some((lo, hi)) = table.value_range() else {
            draw_empty_notice(frame, inner);
            return;
        };

        let mut header_cells: Vec<Cell> = vec![Cell::from("year")];
        for key in &table.col_keys {
            header_cells.push(Cell::from(truncate(key, 10)));
        }
        let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = table
            .row_keys
            .iter()
            .enumerate()
            .map(|(i, year)| {
                let mut cells: Vec<Cell> = vec![Cell::from(year.clone())];
                for j in 0..table.col_keys.len() {
                    if table.count(i, j) == 0 {
                        cells.push(
                            Cell::from("   ·").style(Style::default().fg(Color::DarkGray)),
                        );
                    } else {
                        let v = table.get(i, j);
                        cells.push(
                            Cell::from(format!("{v:>6.1}"))
                                .style(Style::default().fg(Color::Black).bg(heat_color(v, lo, hi))),
                        );
                    }
                }
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(6)];
        widths.extend(std::iter::repeat(Constraint::Length(10)).take(table.col_keys.len()));

        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }

    fn draw_compare(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("By year — mean value per rate type, {}", self.view.compare_year);
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.compare.is_empty() {
            draw_empty_notice(frame, inner);
            return;
        }

        // BarChart values are integers; scale by 100 and show the real mean as
        // the bar text so two decimals survive.
        let bars: Vec<Bar> = self
            .view
            .compare
            .iter()
            .map(|s| {
                Bar::default()
                    .value((s.mean * 100.0).round().max(0.0) as u64)
                    .text_value(format!("{:.2}", s.mean))
                    .label(Line::from(truncate(&s.key, 14)))
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(15)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Magenta))
            .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));

        frame.render_widget(chart, inner);
    }

    fn draw_risk_mix(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Risk mix — record counts by risk band")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let table = &self.view.risk_mix;
        if table.is_empty() {
            draw_empty_notice(frame, inner);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let legend = Line::from(vec![
            Span::styled("■ Low  ", Style::default().fg(Color::Rgb(0, 255, 128))),
            Span::styled("■ Medium  ", Style::default().fg(Color::Rgb(255, 255, 0))),
            Span::styled("■ High", Style::default().fg(Color::Rgb(255, 80, 80))),
        ]);
        frame.render_widget(Paragraph::new(legend), rows[0]);

        let x0 = table.years[0] as f64;
        let x1 = table.years[table.years.len() - 1] as f64;
        let x_bounds = if x1 > x0 { [x0, x1] } else { [x0, x0 + 1.0] };
        let y_top = (table.max_total() as f64 * 1.05).max(1.0);

        frame.render_widget(
            RiskMixChart {
                table,
                x_bounds,
                y_bounds: [0.0, y_top],
            },
            rows[1],
        );
    }

    fn draw_distribution(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!(
            "Distribution — {} ({} bins)",
            truncate(&self.view.hist_label, 32),
            self.selection.bins
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.histogram.is_empty() {
            draw_empty_notice(frame, inner);
            return;
        }

        let bars: Vec<Bar> = self
            .view
            .histogram
            .iter()
            .map(|bin| {
                Bar::default()
                    .value(bin.count as u64)
                    .label(Line::from(format!("{:.0}", bin.lower)))
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(4)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

        frame.render_widget(chart, inner);
    }

    fn draw_records(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Records — sorted by year, rate type")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.filtered.is_empty() {
            draw_empty_notice(frame, inner);
            return;
        }

        let sorted = crate::report::sort_for_display(&self.view.filtered);
        let header = Row::new(vec!["year", "description", "value", "risk", "sector"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = sorted
            .iter()
            .map(|r| {
                Row::new(vec![
                    r.year.to_string(),
                    truncate(&r.description, 36),
                    format!("{:.2}", r.value),
                    r.risk.display_name().to_string(),
                    r.sector.display_name().to_string(),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items: Vec<ListItem> = Vec::new();

        let rate_style = if self.selection.all_rates {
            // The explicit list is overridden while the toggle is on.
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        for description in self.dataset.descriptions() {
            let marker = if self.selection.rates.contains(description) {
                "[x]"
            } else {
                "[ ]"
            };
            items.push(
                ListItem::new(format!("{marker} {}", truncate(description, 40))).style(rate_style),
            );
        }

        for level in RiskLevel::ALL {
            let marker = if self.selection.risk_selected(level) {
                "[x]"
            } else {
                "[ ]"
            };
            items.push(ListItem::new(format!("{marker} {} risk", level.display_name())));
        }

        items.push(ListItem::new(format!("Year min: {}", self.selection.year_min)));
        items.push(ListItem::new(format!("Year max: {}", self.selection.year_max)));
        items.push(ListItem::new(format!(
            "Compare year: {}",
            self.selection.compare_year
        )));
        items.push(ListItem::new(format!(
            "Histogram: {}",
            self.selection
                .hist_rate
                .as_deref()
                .map(|d| truncate(d, 36))
                .unwrap_or_else(|| "all selected rates".to_string())
        )));
        items.push(ListItem::new(format!("Bins: {}", self.selection.bins)));

        let title = if self.selection.all_rates {
            "Filters (select-all ON)"
        } else {
            "Filters"
        };
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.view.filtered.is_empty() {
            let block = Block::default().title("Summary").borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            draw_empty_notice(frame, inner);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(chunks[0]);

        frame.render_widget(stats_table("By rate type", &self.view.rate_stats, 22), top[0]);
        frame.render_widget(stats_table("By risk level", &self.view.risk_stats, 8), top[1]);
        frame.render_widget(stats_table("By year", &self.view.year_stats, 6), top[2]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let mut risk_lines: Vec<Line> = Vec::new();
        for c in &self.view.risk_counts {
            risk_lines.push(Line::from(format!(
                "{:<8} {:>6}  {:>5.1}%",
                c.key,
                c.count,
                c.share * 100.0
            )));
        }
        frame.render_widget(
            Paragraph::new(Text::from(risk_lines))
                .block(Block::default().title("Risk counts").borders(Borders::ALL)),
            bottom[0],
        );

        let mut sector_lines: Vec<Line> = Vec::new();
        for c in &self.view.sector_counts {
            sector_lines.push(Line::from(format!(
                "{:<8} {:>6}  {:>5.1}%",
                c.key,
                c.count,
                c.share * 100.0
            )));
        }
        frame.render_widget(
            Paragraph::new(Text::from(sector_lines))
                .block(Block::default().title("Sector counts").borders(Borders::ALL)),
            bottom[1],
        );
    }

    fn draw_about(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let stats = self.dataset.stats();
        let text = Text::from(vec![
            Line::from("Historical interest-rates explorer."),
            Line::from(""),
            Line::from(format!(
                "The dataset ({}) holds {} observations of (country, year, rate",
                self.dataset.source(),
                stats.n_records
            )),
            Line::from(format!(
                "description, value) covering {}-{}. Two categories are derived on",
                stats.year_min, stats.year_max
            )),
            Line::from("load and never change afterwards:"),
            Line::from(""),
            Line::from("  Risk level  — Low below 10%, Medium from 10% to below 20%,"),
            Line::from("                High at 20% and above."),
            Line::from("  Sector      — Public when the description mentions TREASURY or"),
            Line::from("                BILL, Private otherwise."),
            Line::from(""),
            Line::from("The Dashboard page charts the filtered subset (trends, heatmap,"),
            Line::from("by-year comparison, risk mix, value distribution); the Summary"),
            Line::from("page shows descriptive statistics per rate type, risk level, and"),
            Line::from("year. Filters apply everywhere and survive page switches."),
            Line::from(""),
            Line::from("Keys: ↑/↓ select a filter row, ←/→ adjust it, Space toggles,"),
            Line::from("a flips select-all, Tab cycles charts, p cycles pages, d writes"),
            Line::from("a debug bundle, q quits."),
        ]);

        let p = Paragraph::new(text).block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Space toggle  a all rates  Tab chart  p page  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn match_status(view: &ViewOutput) -> String {
    match &view.stats {
        Some(stats) => format!("{} records match", stats.n_records),
        None => "no records match the current filters".to_string(),
    }
}

fn draw_empty_notice(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let msg = Paragraph::new("No data for the current filters.")
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(msg, area);
}

/// Chart bounds for the trend series; `None` when nothing is plottable.
fn trend_bounds(series: &[TrendSeries]) -> Option<([f64; 2], [f64; 2])> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for &(x, y) in &s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }

    if x_max <= x_min {
        // A single-year selection still needs a non-degenerate axis.
        x_max = x_min + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(0.5);
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

fn trend_legend(series: &[TrendSeries]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (idx, s) in series.iter().filter(|s| !s.points.is_empty()).enumerate() {
        let (r, g, b) = SERIES_COLORS[idx % SERIES_COLORS.len()];
        spans.push(Span::styled(
            "■ ",
            Style::default().fg(Color::Rgb(r, g, b)),
        ));
        spans.push(Span::raw(format!("{}  ", truncate(&s.label, 24))));
    }
    Line::from(spans)
}

/// Shade a heatmap cell from cool (low) to warm (high).
fn heat_color(value: f64, lo: f64, hi: f64) -> Color {
    let t = if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let r = (40.0 + 180.0 * t) as u8;
    let b = (200.0 - 160.0 * t) as u8;
    Color::Rgb(r, 48, b)
}

fn stats_table<'a>(title: &'a str, stats: &'a [GroupStats], key_width: u16) -> Table<'a> {
    let header = Row::new(vec!["group", "n", "mean", "med", "std", "min", "max"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = stats
        .iter()
        .map(|s| {
            Row::new(vec![
                truncate(&s.key, key_width as usize),
                s.n.to_string(),
                format!("{:.2}", s.mean),
                format!("{:.2}", s.median),
                fmt_stat(s.std_dev),
                format!("{:.2}", s.min),
                format!("{:.2}", s.max),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(key_width),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
}

/// Undefined statistics (NaN std-dev of a singleton group) print as `-`.
fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
