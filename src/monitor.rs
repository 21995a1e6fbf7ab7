use std::thread;
use std::time::{Duration, Instant};

use crate::parser::parse_pmic_output;
use crate::power::{ComponentMap, calculate_power};
use crate::series::TimeSeries;
use crate::source::TelemetrySource;

/// Samples a telemetry source and records per-component power over time
pub struct PowerMonitor<S> {
	source: S,
	interval: Duration,
}

impl<S: TelemetrySource> PowerMonitor<S> {
	/// Creates a monitor that waits `interval` between samples
	pub fn new(source: S, interval: Duration) -> Self {
		Self { source, interval }
	}

	/// Reads one telemetry dump and converts it to per-component power
	pub fn sample(&mut self) -> ComponentMap {
		let output = self.source.read();
		let (currents, volts) = parse_pmic_output(&output);
		calculate_power(&currents, &volts)
	}

	/// Samples until `duration` has elapsed and returns the recorded series
	///
	/// The deadline is checked once per iteration, so the last sample may start
	/// just before it expires. Time spent reading and parsing adds to the
	/// interval and is not compensated.
	pub fn measure_consumption(&mut self, duration: Duration) -> TimeSeries {
		let mut series = TimeSeries::new();
		let start_time = Instant::now();

		while start_time.elapsed() < duration {
			let power = self.sample();
			let timestamp = start_time.elapsed().as_secs_f64();

			log::debug!("Sample at {timestamp:.3} s: {} rails, {:.6} W", power.len(), power.total());

			if power.is_empty() {
				log::warn!("Telemetry at {timestamp:.3} s contained no complete current/voltage pairs");
			}

			if let Err(e) = series.push(timestamp, power) {
				log::warn!("Dropping reading: {}", e);
			}

			thread::sleep(self.interval);
		}

		series
	}
}
