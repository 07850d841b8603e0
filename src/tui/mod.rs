//! Ratatui-based terminal UI.
//!
//! Left column: per-sample controls (η₀ and λ) and the metrics table. Right
//! column: all flow curves on one Plotters chart above the insight panel.
//! Every parameter change regenerates and re-analyzes the whole batch.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::{RunOutput, run_batch};
use crate::domain::{AxisScale, DEFAULT_NOISE_AMPLITUDE, GenerationSettings, ModelParams, NoiseConfig};
use crate::error::AppError;
use crate::report::{InsightClient, behavior_label};

mod plotters_chart;

use plotters_chart::{ChartSeries, ViscosityChart};

/// Start the TUI.
pub fn run(samples: Vec<ModelParams>, settings: GenerationSettings) -> Result<(), AppError> {
    let mut app = App::new(samples, settings)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

/// Editable parameter of the selected sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ZeroShearViscosity,
    RelaxationTime,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::ZeroShearViscosity => Field::RelaxationTime,
            Field::RelaxationTime => Field::ZeroShearViscosity,
        }
    }

    /// `(min, max, step)` of the control for `p`. η₀ never drops below η∞.
    fn bounds(self, p: &ModelParams) -> (f64, f64, f64) {
        match self {
            Field::ZeroShearViscosity => {
                let min = p.infinite_shear_viscosity.max(1.0);
                (min, min.max(100.0), 1.0)
            }
            Field::RelaxationTime => (0.01, 5.0, 0.01),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::ZeroShearViscosity => "η₀",
            Field::RelaxationTime => "λ",
        }
    }

    fn get(self, p: &ModelParams) -> f64 {
        match self {
            Field::ZeroShearViscosity => p.zero_shear_viscosity,
            Field::RelaxationTime => p.relaxation_time,
        }
    }

    fn set(self, p: &mut ModelParams, value: f64) {
        match self {
            Field::ZeroShearViscosity => p.zero_shear_viscosity = value,
            Field::RelaxationTime => p.relaxation_time = value,
        }
    }
}

/// Move `field` of `p` by `delta` steps, snapped to the step grid and clamped.
fn step_value(p: &ModelParams, field: Field, delta: i32) -> f64 {
    let (min, max, step) = field.bounds(p);
    let snapped = (field.get(p) / step).round() + f64::from(delta);
    (snapped * step).clamp(min, max)
}

struct App {
    samples: Vec<ModelParams>,
    settings: GenerationSettings,
    /// Amplitude restored when noise is toggled back on.
    noise_amplitude: f64,
    scale: AxisScale,
    selected_sample: usize,
    field: Field,
    status: String,
    run: Option<RunOutput>,
    insight: Option<String>,
    insight_stale: bool,
    insight_requested: bool,
}

impl App {
    fn new(samples: Vec<ModelParams>, settings: GenerationSettings) -> Result<Self, AppError> {
        let noise_amplitude = if settings.noise.is_enabled() {
            settings.noise.amplitude
        } else {
            DEFAULT_NOISE_AMPLITUDE
        };
        let mut app = Self {
            samples,
            settings,
            noise_amplitude,
            scale: AxisScale::Log,
            selected_sample: 0,
            field: Field::ZeroShearViscosity,
            status: String::new(),
            run: None,
            insight: None,
            insight_stale: false,
            insight_requested: false,
        };
        app.regenerate()?;
        app.status = format!("seed {}", app.settings.seed);
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // The request blocks, so it runs after the "requesting" frame is on screen.
            if self.insight_requested {
                self.insight_requested = false;
                self.fetch_insight();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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
            KeyCode::Up => {
                self.selected_sample = self.selected_sample.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_sample + 1 < self.samples.len() {
                    self.selected_sample += 1;
                }
            }
            KeyCode::Tab => {
                self.field = self.field.next();
            }
            KeyCode::Left => self.adjust_field(-1)?,
            KeyCode::Right => self.adjust_field(1)?,
            KeyCode::Char('l') => {
                self.scale = self.scale.toggle();
                self.status = format!("axes: {}", self.scale.display_name());
            }
            KeyCode::Char('n') => {
                self.settings.noise = if self.settings.noise.is_enabled() {
                    NoiseConfig::disabled()
                } else {
                    NoiseConfig {
                        amplitude: self.noise_amplitude,
                    }
                };
                self.regenerate()?;
                self.status = format!("noise: {}", if self.settings.noise.is_enabled() { "on" } else { "off" });
            }
            KeyCode::Char('r') => {
                self.settings.seed = self.settings.seed.wrapping_add(1);
                self.regenerate()?;
                self.status = format!("reseeded: seed {}", self.settings.seed);
            }
            KeyCode::Char('g') => {
                self.insight_requested = true;
                self.status = "Requesting insight...".to_string();
            }
            KeyCode::Char('d') => {
                if let Some(run) = &self.run {
                    match crate::debug::write_debug_bundle(Path::new("debug"), run) {
                        Ok(path) => {
                            self.status = format!("Wrote debug bundle: {}", path.display());
                        }
                        Err(err) => {
                            self.status = format!("Debug write failed: {err}");
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) -> Result<(), AppError> {
        let field = self.field;
        let Some(sample) = self.samples.get_mut(self.selected_sample) else {
            return Ok(());
        };
        let before = field.get(sample);
        let after = step_value(sample, field, delta);
        if after == before {
            if delta < 0 && field == Field::ZeroShearViscosity && before <= sample.infinite_shear_viscosity {
                self.status = format!(
                    "{} η₀ cannot go below η∞ ({}).",
                    sample.short_label(),
                    fmt_param(sample.infinite_shear_viscosity)
                );
            }
            return Ok(());
        }
        field.set(sample, after);
        self.status = format!("{} {}: {}", sample.short_label(), field.label(), fmt_param(after));
        self.regenerate()
    }

    fn regenerate(&mut self) -> Result<(), AppError> {
        let run = run_batch(&self.samples, &self.settings)?;
        self.run = Some(run);
        if self.insight.is_some() {
            self.insight_stale = true;
        }
        Ok(())
    }

    fn fetch_insight(&mut self) {
        let Some(run) = &self.run else {
            return;
        };
        let result = InsightClient::from_env().and_then(|client| {
            let text = client.summarize(&run.results())?;
            Ok((client.model().to_string(), text))
        });
        match result {
            Ok((model, text)) => {
                info!(chars = text.len(), "insight received");
                self.insight = Some(text);
                self.insight_stale = false;
                self.status = format!("Insight updated ({model}).");
            }
            Err(err) => {
                warn!(error = %err, "insight failed");
                self.status = format!("Insight failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let noise = if self.settings.noise.is_enabled() {
            format!("{:.1}%", self.settings.noise.amplitude * 100.0)
        } else {
            "off".to_string()
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("visco", Style::default().fg(Color::Cyan)),
                Span::raw(" - synthetic viscometry"),
            ]),
            Line::from(Span::styled(
                format!(
                    "samples: {} | points: {} | noise: {noise} | seed: {} | axes: {}",
                    self.samples.len(),
                    self.settings.point_count,
                    self.settings.seed,
                    self.scale.display_name(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.samples.len() as u16 * 2 + 2),
                Constraint::Min(0),
            ])
            .split(columns[0]);
        self.draw_controls(frame, left[0]);
        self.draw_metrics(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(columns[1]);
        self.draw_chart(frame, right[0]);
        self.draw_insight(frame, right[1]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = Vec::new();
        for (i, s) in self.samples.iter().enumerate() {
            let selected = i == self.selected_sample;
            let marker = if selected { "» " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled("● ", Style::default().fg(sample_color(s, i))),
                Span::styled(
                    s.name.clone(),
                    if selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
            ]));

            let field_style = |f: Field| {
                if selected && f == self.field {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                }
            };
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    format!("η₀ {} cP", fmt_param(s.zero_shear_viscosity)),
                    field_style(Field::ZeroShearViscosity),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("λ {} s", fmt_param(s.relaxation_time)),
                    field_style(Field::RelaxationTime),
                ),
            ]));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Sample Configuration").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            format!("{:<4} {:>6} {:>8}  {}", "id", "n_hat", "cluster", "behavior"),
            Style::default().fg(Color::Gray),
        ))];

        if let Some(run) = &self.run {
            for (i, r) in run.runs.iter().enumerate() {
                let a = &r.analysis;
                let n_color = if a.flow_behavior_index < 0.9 {
                    Color::Yellow
                } else {
                    Color::Green
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<4} ", r.curve.params.short_label()),
                        Style::default().fg(sample_color(&r.curve.params, i)),
                    ),
                    Span::styled(format!("{:>6.2}", a.flow_behavior_index), Style::default().fg(n_color)),
                    Span::raw(format!(" {:>8.1}  {}", a.cluster_length_scale, behavior_label(a))),
                ]));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Calculated Metrics").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Flow Curves ({})", self.scale.display_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (series, x_bounds, y_bounds) = chart_series(run, self.scale);
        let fmt = axis_formatter(self.scale);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = ViscosityChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: "shear rate (1/s)",
            y_label: "viscosity (cP)".to_string(),
            fmt_x: fmt,
            fmt_y: fmt,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, fmt);
        }
    }

    fn draw_insight(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = if self.insight_stale {
            "AI Rheologist Insight (stale, press g)"
        } else {
            "AI Rheologist Insight"
        };
        let body = match &self.insight {
            Some(text) => Paragraph::new(text.as_str()),
            None => Paragraph::new("Press g to have Gemini analyze the flow curves and cluster metrics.")
                .style(Style::default().fg(Color::Gray)),
        };
        let p = body
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ sample  Tab field  ←/→ adjust  l axes  n noise  r reseed  g insight  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

const FALLBACK_PALETTE: [(u8, u8, u8); 4] = [(0, 255, 255), (255, 0, 255), (0, 255, 0), (255, 255, 0)];

/// `#rrggbb` (leading `#` optional).
fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn sample_rgb(p: &ModelParams, index: usize) -> (u8, u8, u8) {
    parse_hex_color(&p.color).unwrap_or(FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()])
}

fn sample_color(p: &ModelParams, index: usize) -> Color {
    let (r, g, b) = sample_rgb(p, index);
    Color::Rgb(r, g, b)
}

/// Build chart series (axis coordinates) and bounds for Plotters.
fn chart_series(run: &RunOutput, scale: AxisScale) -> (Vec<ChartSeries>, [f64; 2], [f64; 2]) {
    let series: Vec<ChartSeries> = run
        .runs
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let points = r
                .curve
                .points
                .iter()
                .filter(|p| scale == AxisScale::Linear || (p.shear_rate > 0.0 && p.viscosity > 0.0))
                .map(|p| match scale {
                    AxisScale::Log => (p.shear_rate.log10(), p.viscosity.log10()),
                    AxisScale::Linear => (p.shear_rate, p.viscosity),
                })
                .collect();
            let (cr, cg, cb) = sample_rgb(&r.curve.params, i);
            ChartSeries {
                points,
                color: RGBColor(cr, cg, cb),
            }
        })
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    } else if y_max <= y_min {
        // Flat (Newtonian-only) chart.
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (series, [x_min, x_max], [y_min - pad, y_max + pad])
}

fn axis_formatter(scale: AxisScale) -> fn(f64) -> String {
    match scale {
        AxisScale::Log => fmt_axis_log,
        AxisScale::Linear => fmt_axis_linear,
    }
}

fn fmt_axis_linear(v: f64) -> String {
    format!("{v:.1}")
}

/// Tick label for a `log10` coordinate, in physical units.
fn fmt_axis_log(v: f64) -> String {
    let x = 10f64.powf(v);
    if x >= 100.0 {
        format!("{x:.0}")
    } else if x >= 1.0 {
        format!("{x:.1}")
    } else {
        format!("{x:.2}")
    }
}

fn fmt_param(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt: fn(f64) -> String,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt(x_val);
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("shear rate (1/s)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("η (cP)").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_samples;

    fn app_with(noise: NoiseConfig) -> App {
        let settings = GenerationSettings {
            noise,
            seed: 4,
            ..GenerationSettings::default()
        };
        App::new(default_samples(), settings).unwrap()
    }

    fn app() -> App {
        app_with(NoiseConfig::default())
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#ef4444"), Some((0xef, 0x44, 0x44)));
        assert_eq!(parse_hex_color("3b82f6"), Some((0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn steps_snap_and_clamp() {
        let mut p = default_samples().remove(0);
        p.infinite_shear_viscosity = 0.0;
        p.zero_shear_viscosity = 45.0;
        assert_eq!(step_value(&p, Field::ZeroShearViscosity, 1), 46.0);
        p.zero_shear_viscosity = 100.0;
        assert_eq!(step_value(&p, Field::ZeroShearViscosity, 1), 100.0);
        p.zero_shear_viscosity = 1.2;
        assert_eq!(step_value(&p, Field::ZeroShearViscosity, -1), 1.0);

        p.relaxation_time = 2.5;
        assert!((step_value(&p, Field::RelaxationTime, 1) - 2.51).abs() < 1e-12);
        p.relaxation_time = 0.01;
        assert_eq!(step_value(&p, Field::RelaxationTime, -1), 0.01);
        p.relaxation_time = 5.0;
        assert_eq!(step_value(&p, Field::RelaxationTime, 3), 5.0);
    }

    #[test]
    fn zero_shear_viscosity_stops_at_plateau() {
        let mut p = default_samples().remove(0);
        p.infinite_shear_viscosity = 12.5;
        p.zero_shear_viscosity = 13.0;
        assert_eq!(step_value(&p, Field::ZeroShearViscosity, -1), 12.5);

        p.infinite_shear_viscosity = 150.0;
        p.zero_shear_viscosity = 150.0;
        assert_eq!(step_value(&p, Field::ZeroShearViscosity, 1), 150.0);
    }

    #[test]
    fn lowering_eta0_keeps_sample_valid() {
        let mut app = app_with(NoiseConfig::disabled());
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        for _ in 0..60 {
            app.handle_key(KeyCode::Left).unwrap();
        }

        let c = &app.samples[2];
        assert_eq!(c.zero_shear_viscosity, 12.0);
        assert!(crate::io::validate_params(c).is_ok());
        assert!(app.status.contains("cannot go below"));

        let result = &app.run.as_ref().unwrap().results()[2];
        assert!(result.flow_behavior_index <= 1.0 + 1e-9);
        assert!(result.is_newtonian);
    }

    #[test]
    fn adjusting_a_field_regenerates_that_sample() {
        let mut app = app_with(NoiseConfig::disabled());
        let before = app.run.as_ref().unwrap().results();

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Right).unwrap();

        assert!((app.samples[2].relaxation_time - 2.51).abs() < 1e-12);
        let after = app.run.as_ref().unwrap().results();
        assert_eq!(before[0], after[0]);
        assert!(after[2].cluster_length_scale > before[2].cluster_length_scale);
    }

    #[test]
    fn selection_stays_in_range() {
        let mut app = app();
        app.handle_key(KeyCode::Up).unwrap();
        assert_eq!(app.selected_sample, 0);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down).unwrap();
        }
        assert_eq!(app.selected_sample, 2);
    }

    #[test]
    fn toggles_and_reseed() {
        let mut app = app();
        app.handle_key(KeyCode::Char('l')).unwrap();
        assert_eq!(app.scale, AxisScale::Linear);

        app.handle_key(KeyCode::Char('n')).unwrap();
        assert!(!app.settings.noise.is_enabled());
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.settings.noise.amplitude, 0.02);

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.settings.seed, 5);
        assert_eq!(app.run.as_ref().unwrap().settings.seed, 5);

        app.handle_key(KeyCode::Char('g')).unwrap();
        assert!(app.insight_requested);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn log_chart_spans_shear_decades() {
        let app = app();
        let (series, x, y) = chart_series(app.run.as_ref().unwrap(), AxisScale::Log);
        assert_eq!(series.len(), 3);
        assert!((x[0] - -1.0).abs() < 1e-9);
        assert!((x[1] - 3.0).abs() < 1e-9);
        assert!(y[0] < 0.0 && y[1] > 45f64.log10());
        assert_eq!(series[2].color, RGBColor(0xef, 0x44, 0x44));
    }

    #[test]
    fn log_ticks_show_physical_units() {
        assert_eq!(fmt_axis_log(-1.0), "0.10");
        assert_eq!(fmt_axis_log(0.0), "1.0");
        assert_eq!(fmt_axis_log(3.0), "1000");
        assert_eq!(fmt_param(0.5), "0.5");
        assert_eq!(fmt_param(45.0), "45");
    }
}
