//! Dashboard rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │      Power Consumption Metrics and Graph     │
//! │  Minimum Power: 2.981204 W                   │
//! │  ...                                         │
//! │  VDD_CORE:         1.130874 W                │
//! │  ...                                         │
//! │        █  █                                  │
//! │     █  █  █  █                               │
//! │  █  █  █  █  █  █                            │
//! │ Max Power: 3.54 W                            │
//! │       Press 'q' to return to the menu.       │
//! └──────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use super::app::Dashboard;
use crate::constants::DASHBOARD_METRIC_PRECISION;
use crate::display::{bar_heights, bar_width, format_metrics_lines};
use crate::metrics::Metrics;

const TITLE: &str = "Power Consumption Metrics and Graph";
const INSTRUCTION: &str = "Press 'q' to return to the menu.";

pub fn draw(f: &mut Frame, dashboard: &Dashboard<'_>) {
	let Some(metrics) = dashboard.metrics() else {
		draw_no_data(f);
		return;
	};

	let metric_rows =
		(format_metrics_lines(metrics, DASHBOARD_METRIC_PRECISION).len() + 1 + metrics.component_power.len()) as u16;

	let rows = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(2),           // title
			Constraint::Length(metric_rows), // metrics + components
			Constraint::Min(3),              // bars
			Constraint::Length(1),           // max power
			Constraint::Length(1),           // keys
		])
		.split(f.area());

	draw_title(f, rows[0]);
	draw_metrics(f, rows[1], metrics);
	draw_bars(f, rows[2], dashboard.total_power(), metrics.max_power);
	draw_max_power(f, rows[3], metrics.max_power);
	draw_keys(f, rows[4]);
}

fn draw_no_data(f: &mut Frame) {
	let rows = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(1), Constraint::Length(1)])
		.split(f.area());

	let p = Paragraph::new("No data available.").style(Style::default().fg(Color::Red));
	f.render_widget(p, rows[0]);
	draw_keys(f, rows[1]);
}

fn draw_title(f: &mut Frame, area: Rect) {
	let p = Paragraph::new(TITLE)
		.style(Style::default().fg(Color::Cyan))
		.alignment(Alignment::Center);
	f.render_widget(p, area);
}

fn draw_metrics(f: &mut Frame, area: Rect, metrics: &Metrics) {
	let highlight = Style::default().fg(Color::Yellow);
	let precision = DASHBOARD_METRIC_PRECISION;

	let mut lines: Vec<Line> = format_metrics_lines(metrics, precision)
		.into_iter()
		.map(|text| Line::from(Span::styled(format!("  {text}"), highlight)))
		.collect();

	lines.push(Line::from(""));
	for (component, power) in metrics.component_power.iter() {
		lines.push(Line::from(vec![
			Span::styled(format!("  {:<18}", format!("{component}:")), highlight),
			Span::styled(format!("{power:.precision$} W"), Style::default().fg(Color::Green)),
		]));
	}

	f.render_widget(Paragraph::new(lines), area);
}

/// Builds the bar chart rows top to bottom
pub fn bar_lines(total_power: &[f64], max_power: f64, area: Rect) -> Vec<String> {
	let heights = bar_heights(total_power, max_power, area.height);
	let width = usize::from(bar_width(area.width, total_power.len()));

	(0..area.height)
		.map(|row| {
			let level = area.height - row;
			heights
				.iter()
				.map(|&height| {
					let cell = if height >= level { "█" } else { " " };
					cell.repeat(width)
				})
				.collect::<String>()
		})
		.collect()
}

fn draw_bars(f: &mut Frame, area: Rect, total_power: &[f64], max_power: f64) {
	let lines: Vec<Line> = bar_lines(total_power, max_power, area).into_iter().map(Line::from).collect();
	let p = Paragraph::new(lines).style(Style::default().fg(Color::Green));
	f.render_widget(p, area);
}

fn draw_max_power(f: &mut Frame, area: Rect, max_power: f64) {
	let p = Paragraph::new(format!("Max Power: {max_power:.2} W")).style(Style::default().fg(Color::Cyan));
	f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
	let p = Paragraph::new(INSTRUCTION)
		.style(Style::default().fg(Color::Cyan))
		.alignment(Alignment::Center);
	f.render_widget(p, area);
}
