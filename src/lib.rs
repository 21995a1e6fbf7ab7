pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod export;
pub mod metrics;
pub mod monitor;
pub mod parser;
pub mod power;
pub mod series;
pub mod source;
pub mod tui;

use crate::config::SamplingConfig;
use crate::error::ConfigError;
use crate::monitor::PowerMonitor;
use crate::series::TimeSeries;
use crate::source::CommandSource;

/// Samples the configured telemetry command for the configured duration
///
/// This is the main entry point for recording a run. It blocks until the
/// duration has elapsed.
pub fn measure_consumption(config: &SamplingConfig) -> Result<TimeSeries, ConfigError> {
	config.validate()?;
	let source = CommandSource::new(&config.command)?;

	println!(
		"Measuring PMIC power (Watts) for {} s every {} s...",
		config.duration_secs, config.interval_secs
	);
	log::info!("Sampling `{}` for {} s", config.command, config.duration_secs);

	let mut monitor = PowerMonitor::new(source, config.interval());
	let series = monitor.measure_consumption(config.duration());

	log::info!("Recorded {} readings", series.len());
	Ok(series)
}
