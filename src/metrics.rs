use serde::Serialize;

use crate::power::ComponentMap;
use crate::series::TimeSeries;

/// Summary statistics of a measurement run
///
/// Power values are in watts, energy in joules and timestamps in seconds since
/// the start of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
	pub min_power: f64,
	pub max_power: f64,
	pub avg_power: f64,
	pub total_energy: f64,

	/// Timestamp of the first reading that reached `max_power`
	pub peak_timestamp: f64,

	/// Largest consumer in the last reading, `None` if it reported no rails
	pub most_consuming_component: Option<String>,

	/// Per-component power of the last reading
	pub component_power: ComponentMap,
}

/// Reduces a time series to summary metrics
///
/// Returns `None` for an empty series. Energy is integrated with the power of
/// the later sample of each interval, so a single reading has zero energy.
pub fn calculate_metrics(series: &TimeSeries) -> Option<Metrics> {
	let last = series.last()?;

	let total_power = series.total_power();
	let timestamps = series.timestamps();

	let min_power = total_power.iter().copied().fold(f64::INFINITY, f64::min);
	let max_power = total_power.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	// Rounding in the sum can land the mean just outside [min, max]
	let avg_power = (total_power.iter().sum::<f64>() / total_power.len() as f64).clamp(min_power, max_power);
	let total_energy = integrate_energy(&total_power, &timestamps);

	let peak_index = total_power.iter().position(|&power| power == max_power).unwrap_or(0);

	Some(Metrics {
		min_power,
		max_power,
		avg_power,
		total_energy,
		peak_timestamp: timestamps[peak_index],
		most_consuming_component: last.component_power.max_entry().map(|(name, _)| name.to_string()),
		component_power: last.component_power.clone(),
	})
}

/// Left-endpoint sum over the current sample: Σ p[i] * (t[i] - t[i-1]) for i >= 1
fn integrate_energy(total_power: &[f64], timestamps: &[f64]) -> f64 {
	timestamps
		.windows(2)
		.zip(total_power.iter().skip(1))
		.map(|(window, &power)| power * (window[1] - window[0]))
		.sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn series(points: &[(f64, &[(&str, f64)])]) -> TimeSeries {
		let mut series = TimeSeries::new();
		for &(timestamp, entries) in points {
			series.push(timestamp, entries.iter().copied().collect()).unwrap();
		}
		series
	}

	#[test]
	fn empty_series_has_no_metrics() {
		assert_eq!(calculate_metrics(&TimeSeries::new()), None);
	}

	#[test]
	fn three_sample_series() {
		let series = series(&[(0.0, &[("a", 1.0)]), (1.0, &[("a", 3.0)]), (2.0, &[("a", 2.0)])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert_eq!(metrics.min_power, 1.0);
		assert_eq!(metrics.max_power, 3.0);
		assert_eq!(metrics.avg_power, 2.0);
		assert_eq!(metrics.total_energy, 5.0);
		assert_eq!(metrics.peak_timestamp, 1.0);
		assert_eq!(metrics.most_consuming_component.as_deref(), Some("a"));
		assert_eq!(metrics.component_power.iter().collect::<Vec<_>>(), vec![("a", 2.0)]);
	}

	#[test]
	fn single_reading_has_zero_energy() {
		let series = series(&[(0.7, &[("a", 1.5), ("b", 2.5)])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert_eq!(metrics.total_energy, 0.0);
		assert_eq!(metrics.min_power, 4.0);
		assert_eq!(metrics.max_power, 4.0);
		assert_eq!(metrics.avg_power, 4.0);
		assert_eq!(metrics.peak_timestamp, 0.7);
	}

	#[test]
	fn energy_uses_uneven_intervals() {
		let series = series(&[(0.0, &[("a", 10.0)]), (0.5, &[("a", 2.0)]), (2.0, &[("a", 4.0)])]);
		let metrics = calculate_metrics(&series).unwrap();

		// 2 * 0.5 + 4 * 1.5; the first sample never contributes
		assert_eq!(metrics.total_energy, 7.0);
	}

	#[test]
	fn peak_timestamp_is_first_maximum() {
		let series = series(&[(0.0, &[("a", 1.0)]), (1.0, &[("a", 5.0)]), (2.0, &[("a", 5.0)])]);
		assert_eq!(calculate_metrics(&series).unwrap().peak_timestamp, 1.0);
	}

	#[test]
	fn most_consuming_component_ties_keep_first() {
		let series = series(&[(0.0, &[("gpu", 9.0)]), (1.0, &[("cpu", 2.0), ("ddr", 2.0), ("io", 1.0)])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert_eq!(metrics.most_consuming_component.as_deref(), Some("cpu"));
		assert_eq!(metrics.component_power.names().collect::<Vec<_>>(), vec!["cpu", "ddr", "io"]);
	}

	#[test]
	fn components_may_change_between_readings() {
		let series = series(&[(0.0, &[("a", 1.0), ("b", 1.0)]), (1.0, &[("c", 0.5)])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert_eq!(metrics.min_power, 0.5);
		assert_eq!(metrics.max_power, 2.0);
		assert_eq!(metrics.total_energy, 0.5);
		assert_eq!(metrics.most_consuming_component.as_deref(), Some("c"));
	}

	#[test]
	fn last_reading_without_rails_has_no_top_component() {
		let series = series(&[(0.0, &[("a", 1.0)]), (1.0, &[])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert_eq!(metrics.most_consuming_component, None);
		assert!(metrics.component_power.is_empty());
		assert_eq!(metrics.min_power, 0.0);
	}

	#[test]
	fn average_of_equal_readings_stays_within_bounds() {
		let series = series(&[(0.0, &[("a", 0.1)]), (1.0, &[("a", 0.1)]), (2.0, &[("a", 0.1)])]);
		let metrics = calculate_metrics(&series).unwrap();

		assert!(metrics.min_power <= metrics.avg_power);
		assert!(metrics.avg_power <= metrics.max_power);
		assert_eq!(metrics.avg_power, 0.1);
	}

	#[test]
	fn average_lies_between_min_and_max() {
		let totals = [3.2, 0.0, 7.9, 1.1, 7.9, 4.4, 0.3];
		let points: Vec<(f64, Vec<(&str, f64)>)> = totals
			.iter()
			.enumerate()
			.map(|(i, &total)| (i as f64 * 0.25, vec![("rail", total * 0.5), ("other", total * 0.5)]))
			.collect();

		let mut series = TimeSeries::new();
		for (timestamp, entries) in &points {
			series.push(*timestamp, entries.iter().copied().collect()).unwrap();
		}

		let metrics = calculate_metrics(&series).unwrap();
		assert!(metrics.min_power <= metrics.avg_power);
		assert!(metrics.avg_power <= metrics.max_power);
		assert_eq!(metrics.peak_timestamp, 0.5);
	}
}
