use std::time::Duration;

use crate::constants::{DEFAULT_SAMPLING_INTERVAL_SECS, DEFAULT_TELEMETRY_COMMAND};
use crate::error::ConfigError;

/// Settings for one measurement run, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
	/// How long to keep sampling, in seconds
	pub duration_secs: f64,

	/// Pause between samples, in seconds
	pub interval_secs: f64,

	/// Command line that prints the PMIC telemetry
	pub command: String,
}

impl SamplingConfig {
	/// Creates a validated config with the default interval and command
	pub fn new(duration_secs: f64) -> Result<Self, ConfigError> {
		Self {
			duration_secs,
			interval_secs: DEFAULT_SAMPLING_INTERVAL_SECS,
			command: DEFAULT_TELEMETRY_COMMAND.to_string(),
		}
		.validated()
	}

	pub fn with_interval(self, interval_secs: f64) -> Result<Self, ConfigError> {
		Self { interval_secs, ..self }.validated()
	}

	pub fn with_command(self, command: impl Into<String>) -> Result<Self, ConfigError> {
		Self {
			command: command.into(),
			..self
		}
		.validated()
	}

	/// Checks that durations are usable and a command is set
	pub fn validate(&self) -> Result<(), ConfigError> {
		// Also rejects values too large to represent as a Duration
		if Duration::try_from_secs_f64(self.duration_secs).is_err() {
			return Err(ConfigError::InvalidDuration(self.duration_secs));
		}
		if Duration::try_from_secs_f64(self.interval_secs).is_err() {
			return Err(ConfigError::InvalidInterval(self.interval_secs));
		}
		if self.command.trim().is_empty() {
			return Err(ConfigError::EmptyCommand);
		}
		Ok(())
	}

	fn validated(self) -> Result<Self, ConfigError> {
		self.validate()?;
		Ok(self)
	}

	pub fn duration(&self) -> Duration {
		Duration::from_secs_f64(self.duration_secs)
	}

	pub fn interval(&self) -> Duration {
		Duration::from_secs_f64(self.interval_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = SamplingConfig::new(10.0).unwrap();
		assert_eq!(config.interval_secs, 1.0);
		assert_eq!(config.command, "vcgencmd pmic_read_adc");
		assert_eq!(config.duration(), Duration::from_secs(10));
	}

	#[test]
	fn builder_overrides() {
		let config = SamplingConfig::new(2.5)
			.and_then(|c| c.with_interval(0.25))
			.and_then(|c| c.with_command("cat /tmp/pmic.txt"))
			.unwrap();

		assert_eq!(config.interval(), Duration::from_millis(250));
		assert_eq!(config.command, "cat /tmp/pmic.txt");
	}

	#[test]
	fn zero_duration_is_allowed() {
		assert!(SamplingConfig::new(0.0).is_ok());
		assert!(SamplingConfig::new(1.0).and_then(|c| c.with_interval(0.0)).is_ok());
	}

	#[test]
	fn rejects_bad_values() {
		assert_eq!(SamplingConfig::new(-1.0), Err(ConfigError::InvalidDuration(-1.0)));
		assert!(SamplingConfig::new(f64::NAN).is_err());
		assert!(SamplingConfig::new(f64::INFINITY).is_err());
		assert_eq!(SamplingConfig::new(1e20), Err(ConfigError::InvalidDuration(1e20)));
		assert_eq!(
			SamplingConfig::new(1.0).and_then(|c| c.with_interval(1e20)),
			Err(ConfigError::InvalidInterval(1e20))
		);
		assert_eq!(
			SamplingConfig::new(1.0).and_then(|c| c.with_interval(-0.5)),
			Err(ConfigError::InvalidInterval(-0.5))
		);
		assert_eq!(
			SamplingConfig::new(1.0).and_then(|c| c.with_command(" ")),
			Err(ConfigError::EmptyCommand)
		);
	}
}
