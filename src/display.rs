use std::io::{self, Write};

use crate::metrics::Metrics;

/// Renders the metrics as labelled lines
///
/// Power and energy use `precision` decimals; the peak timestamp always uses two.
pub fn format_metrics_lines(metrics: &Metrics, precision: usize) -> Vec<String> {
	vec![
		format!("Minimum Power: {:.precision$} W", metrics.min_power),
		format!("Maximum Power: {:.precision$} W", metrics.max_power),
		format!("Average Power: {:.precision$} W", metrics.avg_power),
		format!("Total Energy: {:.precision$} J", metrics.total_energy),
		format!("Peak Power at: {:.2} s", metrics.peak_timestamp),
		format!(
			"Most Consuming Component: {}",
			metrics.most_consuming_component.as_deref().unwrap_or("none")
		),
	]
}

/// Scales total power values to bar heights of at most `rows`
///
/// A series whose maximum is not positive (no rails, or every rail at 0 W)
/// yields flat bars instead of dividing by zero.
pub fn bar_heights(total_power: &[f64], max_power: f64, rows: u16) -> Vec<u16> {
	if max_power <= 0.0 || !max_power.is_finite() {
		return vec![0; total_power.len()];
	}

	total_power
		.iter()
		.map(|&power| {
			let ratio = (power / max_power).clamp(0.0, 1.0);
			(ratio * f64::from(rows)) as u16
		})
		.collect()
}

/// Column width of each bar when `samples` bars share `width` columns
pub fn bar_width(width: u16, samples: usize) -> u16 {
	if samples == 0 {
		return width.max(1);
	}
	(usize::from(width) / samples).max(1) as u16
}

/// Prints the metrics summary and the last reading's rails to stdout
pub fn print_metrics_summary(metrics: Option<&Metrics>, precision: usize) -> io::Result<()> {
	let mut stdout = io::stdout().lock();

	let Some(metrics) = metrics else {
		writeln!(stdout, "No data available.")?;
		return stdout.flush();
	};

	for line in format_metrics_lines(metrics, precision) {
		writeln!(stdout, "{line}")?;
	}

	if !metrics.component_power.is_empty() {
		writeln!(stdout)?;
	}
	for (component, power) in metrics.component_power.iter() {
		writeln!(stdout, "{:<18}{:.precision$} W", format!("{component}:"), power)?;
	}

	stdout.flush()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::power::ComponentMap;

	fn metrics() -> Metrics {
		Metrics {
			min_power: 1.0,
			max_power: 3.0,
			avg_power: 2.0,
			total_energy: 5.0,
			peak_timestamp: 1.0,
			most_consuming_component: Some("a".to_string()),
			component_power: [("a", 2.0)].into_iter().collect::<ComponentMap>(),
		}
	}

	#[test]
	fn metric_lines_follow_precision() {
		let lines = format_metrics_lines(&metrics(), 2);
		assert_eq!(
			lines,
			vec![
				"Minimum Power: 1.00 W",
				"Maximum Power: 3.00 W",
				"Average Power: 2.00 W",
				"Total Energy: 5.00 J",
				"Peak Power at: 1.00 s",
				"Most Consuming Component: a",
			]
		);

		let precise = format_metrics_lines(&metrics(), 6);
		assert_eq!(precise[0], "Minimum Power: 1.000000 W");
		assert_eq!(precise[4], "Peak Power at: 1.00 s");
	}

	#[test]
	fn missing_top_component_is_reported_as_none() {
		let metrics = Metrics {
			most_consuming_component: None,
			..metrics()
		};
		assert_eq!(format_metrics_lines(&metrics, 2)[5], "Most Consuming Component: none");
	}

	#[test]
	fn bars_scale_to_available_rows() {
		assert_eq!(bar_heights(&[1.0, 4.0, 2.0], 4.0, 12), vec![3, 12, 6]);
	}

	#[test]
	fn all_zero_power_gives_flat_bars() {
		assert_eq!(bar_heights(&[0.0, 0.0, 0.0], 0.0, 20), vec![0, 0, 0]);
		assert!(bar_heights(&[], 0.0, 20).is_empty());
	}

	#[test]
	fn bar_width_never_drops_below_one() {
		assert_eq!(bar_width(80, 8), 10);
		assert_eq!(bar_width(80, 500), 1);
		assert_eq!(bar_width(80, 0), 80);
	}
}
