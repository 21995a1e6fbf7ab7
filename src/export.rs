use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::constants::{CHART_HEIGHT, CHART_WIDTH, EXPORT_METRIC_PRECISION};
use crate::display::format_metrics_lines;
use crate::error::ExportError;
use crate::metrics::{Metrics, calculate_metrics};
use crate::power::PowerReading;
use crate::series::TimeSeries;

// Plot area margins in pixels
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 80.0;

const AXIS_TICKS: usize = 5;
const TOTAL_COLOR: &str = "#1f77b4";
const COMPONENT_COLORS: [&str; 9] = [
	"#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Machine-readable export of a measurement run
#[derive(Debug, Serialize)]
pub struct Report<'a> {
	pub metrics: &'a Metrics,
	pub readings: &'a [PowerReading],
}

/// Writes the series to `path` and returns the format that was used
///
/// A `.json` extension produces a [`Report`]; anything else gets an SVG chart
/// of total and per-component power with a metrics overlay.
pub fn export_plot(series: &TimeSeries, path: &Path) -> Result<ExportFormat, ExportError> {
	let metrics = calculate_metrics(series).ok_or(ExportError::NoData)?;
	let format = ExportFormat::from_path(path);

	let contents = match format {
		ExportFormat::Json => render_json_report(series, &metrics)?,
		ExportFormat::Svg => render_svg(series, &metrics),
	};

	fs::write(path, contents)?;
	log::info!("Exported {} readings to {}", series.len(), path.display());

	Ok(format)
}

/// Output format chosen from the export path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
	Svg,
	Json,
}

impl ExportFormat {
	pub fn from_path(path: &Path) -> Self {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
			_ => ExportFormat::Svg,
		}
	}
}

pub fn render_json_report(series: &TimeSeries, metrics: &Metrics) -> Result<String, serde_json::Error> {
	serde_json::to_string_pretty(&Report {
		metrics,
		readings: series.readings(),
	})
}

/// Maps data coordinates into the plot area
struct Scale {
	x_min: f64,
	x_span: f64,
	y_max: f64,
	plot_width: f64,
	plot_height: f64,
}

impl Scale {
	fn new(series: &TimeSeries) -> Self {
		let timestamps = series.timestamps();
		let x_min = timestamps.first().copied().unwrap_or(0.0);
		let x_max = timestamps.last().copied().unwrap_or(0.0);

		let peak = series
			.readings()
			.iter()
			.flat_map(|reading| {
				std::iter::once(reading.total_power()).chain(reading.component_power.iter().map(|(_, p)| p))
			})
			.fold(0.0_f64, f64::max);

		// A single sample has no time span, and an all-zero run has no height
		let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
		let y_max = if peak > 0.0 { peak * 1.05 } else { 1.0 };

		Self {
			x_min,
			x_span,
			y_max,
			plot_width: f64::from(CHART_WIDTH) - MARGIN_LEFT - MARGIN_RIGHT,
			plot_height: f64::from(CHART_HEIGHT) - MARGIN_TOP - MARGIN_BOTTOM,
		}
	}

	fn x(&self, timestamp: f64) -> f64 {
		MARGIN_LEFT + (timestamp - self.x_min) / self.x_span * self.plot_width
	}

	fn y(&self, power: f64) -> f64 {
		MARGIN_TOP + self.plot_height - power / self.y_max * self.plot_height
	}

	fn points(&self, timestamps: &[f64], values: &[f64]) -> String {
		timestamps
			.iter()
			.zip(values)
			.map(|(&t, &p)| format!("{:.2},{:.2}", self.x(t), self.y(p)))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Renders the power chart as a standalone SVG document
pub fn render_svg(series: &TimeSeries, metrics: &Metrics) -> String {
	let scale = Scale::new(series);
	let timestamps = series.timestamps();
	let components: Vec<&str> = metrics.component_power.names().collect();

	let mut svg = String::new();
	let _ = writeln!(svg, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
	let _ = writeln!(
		svg,
		"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" font-family=\"sans-serif\">"
	);
	let _ = writeln!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");
	let _ = writeln!(
		svg,
		"<text x=\"{:.1}\" y=\"40\" font-size=\"22\" text-anchor=\"middle\">Power Consumption Over Time</text>",
		f64::from(CHART_WIDTH) / 2.0
	);

	write_axes(&mut svg, &scale, timestamps.first().copied().unwrap_or(0.0));

	let _ = writeln!(
		svg,
		"<polyline fill=\"none\" stroke=\"{TOTAL_COLOR}\" stroke-width=\"2\" points=\"{}\"/>",
		scale.points(&timestamps, &series.total_power())
	);

	for (index, component) in components.iter().enumerate() {
		let color = COMPONENT_COLORS[index % COMPONENT_COLORS.len()];
		let _ = writeln!(
			svg,
			"<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"1.5\" stroke-dasharray=\"6 4\" stroke-opacity=\"0.7\" points=\"{}\"/>",
			scale.points(&timestamps, &series.component_history(component))
		);
	}

	write_legend(&mut svg, &components);
	write_metrics_overlay(&mut svg, metrics);

	svg.push_str("</svg>\n");
	svg
}

fn write_axes(svg: &mut String, scale: &Scale, x_min: f64) {
	let left = MARGIN_LEFT;
	let right = MARGIN_LEFT + scale.plot_width;
	let top = MARGIN_TOP;
	let bottom = MARGIN_TOP + scale.plot_height;

	let _ = writeln!(
		svg,
		"<rect x=\"{left}\" y=\"{top}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"black\"/>",
		scale.plot_width, scale.plot_height
	);

	for tick in 0..=AXIS_TICKS {
		let fraction = tick as f64 / AXIS_TICKS as f64;

		let timestamp = x_min + fraction * scale.x_span;
		let x = scale.x(timestamp);
		let _ = writeln!(
			svg,
			"<line x1=\"{x:.2}\" y1=\"{bottom}\" x2=\"{x:.2}\" y2=\"{:.1}\" stroke=\"black\"/><text x=\"{x:.2}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{timestamp:.2}</text>",
			bottom + 5.0,
			bottom + 20.0
		);

		let power = fraction * scale.y_max;
		let y = scale.y(power);
		let _ = writeln!(
			svg,
			"<line x1=\"{:.1}\" y1=\"{y:.2}\" x2=\"{left}\" y2=\"{y:.2}\" stroke=\"black\"/><text x=\"{:.1}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"end\">{power:.2}</text>",
			left - 5.0,
			left - 8.0,
			y + 4.0
		);
	}

	let _ = writeln!(
		svg,
		"<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\">Time (s)</text>",
		(left + right) / 2.0,
		bottom + 50.0
	);
	let _ = writeln!(
		svg,
		"<text x=\"25\" y=\"{0:.1}\" font-size=\"14\" text-anchor=\"middle\" transform=\"rotate(-90 25 {0:.1})\">Power Consumption (W)</text>",
		(top + bottom) / 2.0
	);
}

fn write_legend(svg: &mut String, components: &[&str]) {
	let x = MARGIN_LEFT + 15.0;
	let mut y = MARGIN_TOP + 20.0;

	let _ = writeln!(
		svg,
		"<line x1=\"{x}\" y1=\"{y}\" x2=\"{:.1}\" y2=\"{y}\" stroke=\"{TOTAL_COLOR}\" stroke-width=\"2\"/><text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">Total Power</text>",
		x + 30.0,
		x + 38.0,
		y + 4.0
	);

	for (index, component) in components.iter().enumerate() {
		y += 18.0;
		let color = COMPONENT_COLORS[index % COMPONENT_COLORS.len()];
		let _ = writeln!(
			svg,
			"<line x1=\"{x}\" y1=\"{y}\" x2=\"{:.1}\" y2=\"{y}\" stroke=\"{color}\" stroke-width=\"1.5\" stroke-dasharray=\"6 4\"/><text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{} Power</text>",
			x + 30.0,
			x + 38.0,
			y + 4.0,
			escape_xml(component)
		);
	}
}

fn write_metrics_overlay(svg: &mut String, metrics: &Metrics) {
	let lines = format_metrics_lines(metrics, EXPORT_METRIC_PRECISION);
	let x = f64::from(CHART_WIDTH) * 0.7;
	let y = f64::from(CHART_HEIGHT) * 0.5;
	let height = lines.len() as f64 * 18.0 + 14.0;

	let _ = writeln!(
		svg,
		"<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"320\" height=\"{height:.1}\" fill=\"white\" fill-opacity=\"0.8\" stroke=\"#444444\"/>"
	);
	for (index, line) in lines.iter().enumerate() {
		let _ = writeln!(
			svg,
			"<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\">{}</text>",
			x + 10.0,
			y + 22.0 + index as f64 * 18.0,
			escape_xml(line)
		);
	}
}

fn escape_xml(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
