//! SVG bar chart generation.
//!
//! Two layouts:
//! - detailed: one panel per metric stacked vertically; one bar group per
//!   trace, one bar per configuration, legend on the right
//! - average: one panel per metric side by side; one bar per configuration
//!
//! The SVG markup is written directly; there is no plotting dependency.

use crate::aggregator::{MetricTable, SummaryVector};
use crate::utils::config::ChartConfig;
use crate::utils::error::ChartError;
use log::info;

/// matplotlib's default cycle, so charts look like the usual paper figures
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_RIGHT: f64 = 15.0;
const LEGEND_WIDTH: f64 = 160.0;
const BAR_FILL: f64 = 0.7;
const TICKS: usize = 5;

/// Data of one chart panel
#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub title: String,
    /// Categories along the x axis
    pub groups: Vec<String>,
    /// One bar per series inside every group
    pub series: Vec<String>,
    /// `values[group][series]`; `None` leaves a gap
    pub values: Vec<Vec<Option<f64>>>,
}

impl BarPanel {
    /// Traces on the x axis, one bar per configuration
    pub fn detailed(table: &MetricTable) -> Self {
        let series: Vec<String> = table.configs().map(str::to_string).collect();
        let groups: Vec<String> = table.traces().map(str::to_string).collect();
        let values = groups
            .iter()
            .map(|trace| series.iter().map(|config| table.get(trace, config)).collect())
            .collect();

        Self {
            title: table.kind().title().to_string(),
            groups,
            series,
            values,
        }
    }

    /// Configurations on the x axis, one bar each
    pub fn average(summary: &SummaryVector) -> Self {
        Self {
            title: summary.metric.title().to_string(),
            groups: summary.values.keys().cloned().collect(),
            series: vec![summary.metric.title().to_string()],
            values: summary.values.values().map(|v| vec![*v]).collect(),
        }
    }

    fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

/// Render panels stacked vertically, with legends
pub fn render_detailed(panels: &[BarPanel], config: &ChartConfig) -> Result<String, ChartError> {
    if panels.is_empty() {
        return Err(ChartError::NoPanels);
    }

    let width = config.detailed_width as f64;
    let height = config.panel_height as f64;
    let mut svg = open_svg(width, height * panels.len() as f64);

    for (i, panel) in panels.iter().enumerate() {
        let frame = Frame {
            x: 0.0,
            y: i as f64 * height,
            width,
            height,
        };
        render_panel(&mut svg, panel, &frame, true);
    }

    svg.push_str("</svg>\n");
    info!("Detailed chart generated ({} bytes)", svg.len());
    Ok(svg)
}

/// Render panels side by side, without legends
pub fn render_average(panels: &[BarPanel], config: &ChartConfig) -> Result<String, ChartError> {
    if panels.is_empty() {
        return Err(ChartError::NoPanels);
    }

    let width = config.avg_panel_width as f64;
    let height = config.panel_height as f64;
    let mut svg = open_svg(width * panels.len() as f64, height);

    for (i, panel) in panels.iter().enumerate() {
        let frame = Frame {
            x: i as f64 * width,
            y: 0.0,
            width,
            height,
        };
        render_panel(&mut svg, panel, &frame, false);
    }

    svg.push_str("</svg>\n");
    info!("Average chart generated ({} bytes)", svg.len());
    Ok(svg)
}

/// Panel placement inside the document
struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn open_svg(width: f64, height: f64) -> String {
    let mut svg = String::new();
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));
    svg.push_str(r#"<style>text { font: 9px sans-serif; } .bar:hover { opacity: 0.8; }</style>"#);
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        width, height
    ));
    svg
}

fn render_panel(out: &mut String, panel: &BarPanel, frame: &Frame, legend: bool) {
    let right = if legend { LEGEND_WIDTH } else { MARGIN_RIGHT };
    let plot_x = frame.x + MARGIN_LEFT;
    let plot_y = frame.y + MARGIN_TOP;
    let plot_w = (frame.width - MARGIN_LEFT - right).max(1.0);
    let plot_h = (frame.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

    let (top, step) = nice_scale(panel.max_value());
    let scale = |v: f64| plot_h * (v.max(0.0) / top);

    // Y label, rotated along the axis
    out.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" transform="rotate(-90 {x:.1} {y:.1})">{label}</text>"#,
        x = frame.x + 14.0,
        y = plot_y + plot_h / 2.0,
        label = escape_xml(&panel.title)
    ));

    // Grid and ticks
    for i in 0..=TICKS {
        let value = step * i as f64;
        if value > top + step / 2.0 {
            break;
        }
        let y = plot_y + plot_h - scale(value);
        out.push_str(&format!(
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"##,
            plot_x,
            plot_x + plot_w,
            plot_x - 4.0,
            y + 3.0,
            format_tick(value),
            y = y
        ));
    }

    // Bars
    let groups = panel.groups.len().max(1) as f64;
    let group_w = plot_w / groups;
    let bar_w = group_w * BAR_FILL / panel.series.len().max(1) as f64;

    for (g, group) in panel.groups.iter().enumerate() {
        let group_x = plot_x + g as f64 * group_w + group_w * (1.0 - BAR_FILL) / 2.0;

        for (s, series) in panel.series.iter().enumerate() {
            let Some(value) = panel.values.get(g).and_then(|row| row.get(s)).copied().flatten()
            else {
                continue;
            };
            let h = scale(value);
            out.push_str(&format!(
                r#"<rect class="bar" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{} / {}: {}</title></rect>"#,
                group_x + s as f64 * bar_w,
                plot_y + plot_h - h,
                bar_w,
                h,
                series_color(s),
                escape_xml(group),
                escape_xml(series),
                value
            ));
        }

        // X label, rotated so long trace names fit
        let label_x = plot_x + (g as f64 + 0.5) * group_w;
        let label_y = plot_y + plot_h + 10.0;
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate(-60 {x:.1} {y:.1})">{label}</text>"#,
            x = label_x,
            y = label_y,
            label = escape_xml(group)
        ));
    }

    // Axes
    out.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        plot_x, plot_y, plot_w, plot_h
    ));

    if legend {
        render_legend(out, &panel.series, plot_x + plot_w + 10.0, plot_y + plot_h / 2.0);
    }
}

fn render_legend(out: &mut String, series: &[String], x: f64, center_y: f64) {
    let line_h = 14.0;
    let top = center_y - line_h * series.len() as f64 / 2.0;

    for (i, name) in series.iter().enumerate() {
        let y = top + i as f64 * line_h;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="10" height="10" fill="{}"/><text x="{:.1}" y="{:.1}">{}</text>"#,
            x,
            y,
            series_color(i),
            x + 14.0,
            y + 9.0,
            escape_xml(name)
        ));
    }
}

fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Round the axis top up to a 1/2/5 step multiple
fn nice_scale(max: f64) -> (f64, f64) {
    if max <= 0.0 || !max.is_finite() {
        return (1.0, 1.0 / TICKS as f64);
    }
    let raw = max / TICKS as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    ((max / step).ceil() * step, step)
}

fn format_tick(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
