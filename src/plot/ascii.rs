//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one glyph per series (`1`, `2`, ... in series order)
//! - line segments between consecutive points of a series
//! - a legend mapping glyphs back to rate descriptions

use crate::agg::TrendSeries;

const SERIES_GLYPHS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Render the multi-series trend chart (mean value per year per rate type).
pub fn render_trend_plot(series: &[TrendSeries], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let drawable: Vec<&TrendSeries> = series.iter().filter(|s| !s.points.is_empty()).collect();
    if drawable.is_empty() {
        return "No data to plot.\n".to_string();
    }

    let (x_min, x_max) = x_range(&drawable);
    let (y_min, y_max) = pad_range(y_range(&drawable), 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (idx, s) in drawable.iter().enumerate() {
        let glyph = SERIES_GLYPHS[idx % SERIES_GLYPHS.len()];
        let mut prev: Option<(usize, usize)> = None;
        for &(x, y) in &s.points {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            if let Some((c0, r0)) = prev {
                draw_line(&mut grid, c0, r0, col, row, glyph);
            } else {
                grid[row][col] = glyph;
            }
            prev = Some((col, row));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Trend: year=[{x_min:.0}, {x_max:.0}] | mean=[{y_min:.2}, {y_max:.2}]%\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (idx, s) in drawable.iter().enumerate() {
        let glyph = SERIES_GLYPHS[idx % SERIES_GLYPHS.len()];
        out.push_str(&format!("{glyph} = {}\n", s.label));
    }

    out
}

fn x_range(series: &[&TrendSeries]) -> (f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for s in series {
        for &(x, _) in &s.points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if max_x > min_x {
        (min_x, max_x)
    } else {
        // A single-year selection still needs a non-degenerate axis.
        (min_x, min_x + 1.0)
    }
}

fn y_range(series: &[&TrendSeries]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        for &(_, y) in &s.points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    (min_y, max_y)
}

fn pad_range((min, max): (f64, f64), frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier series keep precedence where lines cross.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = vec![TrendSeries {
            label: "T-BILL".to_string(),
            points: vec![(2000.0, 0.0), (2004.0, 10.0)],
        }];

        let txt = render_trend_plot(&series, 10, 5);
        let expected = concat!(
            "Trend: year=[2000, 2004] | mean=[-0.50, 10.50]%\n",
            "         1\n",
            "       11 \n",
            "    111   \n",
            "  11      \n",
            "11        \n",
            "1 = T-BILL\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_render_notice() {
        let series = vec![TrendSeries {
            label: "T-BILL".to_string(),
            points: Vec::new(),
        }];
        assert_eq!(render_trend_plot(&series, 40, 10), "No data to plot.\n");
        assert_eq!(render_trend_plot(&[], 40, 10), "No data to plot.\n");
    }
}
