use serde::Serialize;

use crate::error::SeriesError;
use crate::power::{ComponentMap, PowerReading};

/// Append-only sequence of readings ordered by strictly increasing timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
	readings: Vec<PowerReading>,
}

impl TimeSeries {
	pub fn new() -> Self {
		Self { readings: Vec::new() }
	}

	/// Appends a reading taken `timestamp` seconds after the start
	///
	/// The timestamp must be finite, non-negative and later than the last one.
	pub fn push(&mut self, timestamp: f64, component_power: ComponentMap) -> Result<(), SeriesError> {
		if !timestamp.is_finite() || timestamp < 0.0 {
			return Err(SeriesError::InvalidTimestamp(timestamp));
		}

		if let Some(last) = self.readings.last()
			&& timestamp <= last.timestamp
		{
			return Err(SeriesError::NonIncreasingTimestamp {
				previous: last.timestamp,
				timestamp,
			});
		}

		self.readings.push(PowerReading::new(timestamp, component_power));
		Ok(())
	}

	pub fn readings(&self) -> &[PowerReading] {
		&self.readings
	}

	pub fn last(&self) -> Option<&PowerReading> {
		self.readings.last()
	}

	pub fn len(&self) -> usize {
		self.readings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.readings.is_empty()
	}

	pub fn timestamps(&self) -> Vec<f64> {
		self.readings.iter().map(|reading| reading.timestamp).collect()
	}

	/// Total power of every reading, in order
	pub fn total_power(&self) -> Vec<f64> {
		self.readings.iter().map(PowerReading::total_power).collect()
	}

	/// Power of one component across the series, 0 where it was not reported
	pub fn component_history(&self, component: &str) -> Vec<f64> {
		self.readings
			.iter()
			.map(|reading| reading.component_power.get(component).unwrap_or(0.0))
			.collect()
	}
}
