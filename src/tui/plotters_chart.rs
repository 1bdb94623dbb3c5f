//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
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

use crate::agg::{RiskCountTable, TrendSeries};

/// Multi-series line chart of mean rate value per year.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct TrendChart<'a> {
    pub series: &'a [TrendSeries],
    /// One RGB triple per series, shared with the legend rendering.
    pub colors: &'a [(u8, u8, u8)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((x0, x1, y0, y1)) = checked_bounds(area, buf, self.x_bounds, self.y_bounds)
        else {
            return;
        };

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; the axes + labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (idx, s) in self.series.iter().filter(|s| !s.points.is_empty()).enumerate() {
                let (r, g, b) = self.colors[idx % self.colors.len()];
                let color = RGBColor(r, g, b);
                chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
                // Mark the observations themselves; a bare line can hide how
                // sparse a series is after filtering.
                chart.draw_series(
                    s.points.iter().map(|&(x, y)| Pixel::new((x, y), color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Stacked area chart of record counts per year by risk band.
pub struct RiskMixChart<'a> {
    pub table: &'a RiskCountTable,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for RiskMixChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((x0, x1, y0, y1)) = checked_bounds(area, buf, self.x_bounds, self.y_bounds)
        else {
            return;
        };

        // Cumulative layers, drawn tallest first so the later (smaller) areas
        // overlay them: the visible bands end up Low at the bottom, then
        // Medium, then High.
        let mut low = Vec::with_capacity(self.table.years.len());
        let mut low_med = Vec::with_capacity(self.table.years.len());
        let mut total = Vec::with_capacity(self.table.years.len());
        for (year, counts) in self.table.years.iter().zip(&self.table.counts) {
            let x = *year as f64;
            low.push((x, counts[0] as f64));
            low_med.push((x, (counts[0] + counts[1]) as f64));
            total.push((x, (counts[0] + counts[1] + counts[2]) as f64));
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("year")
                .y_desc("records")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let high_color = RGBColor(255, 80, 80);
            let medium_color = RGBColor(255, 255, 0);
            let low_color = RGBColor(0, 255, 128);

            chart.draw_series(AreaSeries::new(total.iter().copied(), 0.0, high_color))?;
            chart.draw_series(AreaSeries::new(low_med.iter().copied(), 0.0, medium_color))?;
            chart.draw_series(AreaSeries::new(low.iter().copied(), 0.0, low_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Shared guard: bail out (with a hint) on tiny areas or degenerate bounds.
fn checked_bounds(
    area: Rect,
    buf: &mut Buffer,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) -> Option<(f64, f64, f64, f64)> {
    // When the available area is too small, Plotters may fail to build a chart.
    // In that case, we render a small hint rather than panicking.
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return None;
    }

    let [x0, x1] = x_bounds;
    let [y0, y1] = y_bounds;
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
        || x1 <= x0
        || y1 <= y0
    {
        return None;
    }

    Some((x0, x1, y0, y1))
}
