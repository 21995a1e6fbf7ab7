use std::io;

use thiserror::Error;

/// Rejected process configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
	#[error("measurement duration must be a non-negative number of seconds, got {0}")]
	InvalidDuration(f64),

	#[error("sampling interval must be a non-negative number of seconds, got {0}")]
	InvalidInterval(f64),

	#[error("telemetry command must not be empty")]
	EmptyCommand,
}

/// Reasons a reading cannot be appended to a time series
#[derive(Error, Debug, PartialEq)]
pub enum SeriesError {
	#[error("timestamp must be a finite non-negative number of seconds, got {0}")]
	InvalidTimestamp(f64),

	#[error("timestamp {timestamp} does not follow previous timestamp {previous}")]
	NonIncreasingTimestamp { previous: f64, timestamp: f64 },
}

/// Failures while writing a chart or report
#[derive(Error, Debug)]
pub enum ExportError {
	#[error("No data available to export.")]
	NoData,

	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}
