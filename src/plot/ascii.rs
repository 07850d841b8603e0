//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each sample is drawn as a connected line using its own marker character.
//! On log-log axes both coordinates are mapped through `log10` first; points
//! with non-positive coordinates are skipped there.

use crate::domain::{AxisScale, CurveFile, ModelParams, RheologyPoint};

/// One curve to draw.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub marker: char,
    pub label: String,
    /// `(shear_rate, viscosity)` in physical units.
    pub points: Vec<(f64, f64)>,
}

impl PlotSeries {
    pub fn from_curve(params: &ModelParams, points: &[RheologyPoint], fallback: usize) -> Self {
        Self {
            marker: marker_for(params, fallback),
            label: params.name.clone(),
            points: points.iter().map(|p| (p.shear_rate, p.viscosity)).collect(),
        }
    }
}

/// Series for every sample stored in a saved curve file.
pub fn series_from_curve_file(curve: &CurveFile) -> Vec<PlotSeries> {
    curve
        .samples
        .iter()
        .enumerate()
        .map(|(i, s)| PlotSeries::from_curve(&s.params, &s.points, i))
        .collect()
}

/// Render several flow curves on one grid, followed by a legend.
pub fn render_flow_plot(series: &[PlotSeries], scale: AxisScale, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mapped: Vec<(char, Vec<(f64, f64)>)> = series
        .iter()
        .map(|s| (s.marker, to_axis(&s.points, scale)))
        .collect();

    let (x_min, x_max) = x_range(&mapped).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&mapped).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (marker, pts) in &mapped {
        draw_curve(&mut grid, pts, *marker, (x_min, x_max), (y_min, y_max));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot ({}): shear rate=[{:.3}, {:.3}] 1/s | viscosity=[{:.3}, {:.3}]\n",
        scale.display_name(),
        from_axis(x_min, scale),
        from_axis(x_max, scale),
        from_axis(y_min, scale),
        from_axis(y_max, scale),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for s in series {
        out.push_str(&format!("  {} = {}\n", s.marker, s.label));
    }

    out
}

/// First character of the short label (`sample-c` -> `C`), else a digit.
fn marker_for(params: &ModelParams, fallback: usize) -> char {
    let label = params.short_label();
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => c,
        _ => char::from_digit((fallback % 10) as u32, 10).unwrap_or('*'),
    }
}

fn to_axis(points: &[(f64, f64)], scale: AxisScale) -> Vec<(f64, f64)> {
    match scale {
        AxisScale::Linear => points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect(),
        AxisScale::Log => points
            .iter()
            .filter(|(x, y)| *x > 0.0 && *y > 0.0 && x.is_finite() && y.is_finite())
            .map(|&(x, y)| (x.log10(), y.log10()))
            .collect(),
    }
}

fn from_axis(v: f64, scale: AxisScale) -> f64 {
    match scale {
        AxisScale::Linear => v,
        AxisScale::Log => 10f64.powf(v),
    }
}

fn x_range(series: &[(char, Vec<(f64, f64)>)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for (_, pts) in series {
        for &(x, _) in pts {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(series: &[(char, Vec<(f64, f64)>)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, pts) in series {
        for &(_, y) in pts {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat curves (Newtonian) still get a visible band.
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
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

fn draw_curve(grid: &mut [Vec<char>], pts: &[(f64, f64)], marker: char, x: (f64, f64), y: (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(px, py) in pts {
        let cx = map_x(px, x.0, x.1, width);
        let cy = map_y(py, y.0, y.1, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, cx, cy, marker);
        } else if grid[cy][cx] == ' ' {
            grid[cy][cx] = marker;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites an earlier series.
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
