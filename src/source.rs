use std::process::{Command, Stdio};

use crate::error::ConfigError;

/// Supplies raw telemetry text, one dump per call
pub trait TelemetrySource {
	/// Returns the current telemetry dump
	///
	/// Never fails: a source that cannot produce output returns whatever it
	/// got, possibly an empty string, and the parser yields empty maps for it.
	fn read(&mut self) -> String;
}

/// Runs a shell command line (by default `vcgencmd pmic_read_adc`) and captures its stdout
///
/// The line goes through `sh -c`, so quoting and pipes work as typed.
#[derive(Debug, Clone)]
pub struct CommandSource {
	command_line: String,
}

impl CommandSource {
	pub fn new(command_line: &str) -> Result<Self, ConfigError> {
		let command_line = command_line.trim();
		if command_line.is_empty() {
			return Err(ConfigError::EmptyCommand);
		}

		Ok(Self {
			command_line: command_line.to_string(),
		})
	}

	pub fn command_line(&self) -> &str {
		&self.command_line
	}
}

impl TelemetrySource for CommandSource {
	fn read(&mut self) -> String {
		let output = match Command::new("sh")
			.arg("-c")
			.arg(&self.command_line)
			.stdin(Stdio::null())
			.stderr(Stdio::null())
			.output()
		{
			Ok(output) => output,
			Err(e) => {
				log::warn!("Failed to run `{}`: {}", self.command_line, e);
				return String::new();
			},
		};

		if !output.status.success() {
			log::warn!("`{}` exited with {}", self.command_line, output.status);
		}

		String::from_utf8_lossy(&output.stdout).into_owned()
	}
}

/// Replays a fixed list of telemetry dumps, cycling back to the first one
///
/// An empty list behaves like a command that prints nothing.
#[derive(Debug, Clone, Default)]
pub struct CannedSource {
	dumps: Vec<String>,
	next: usize,
}

impl CannedSource {
	pub fn new<I, S>(dumps: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			dumps: dumps.into_iter().map(Into::into).collect(),
			next: 0,
		}
	}
}

impl TelemetrySource for CannedSource {
	fn read(&mut self) -> String {
		if self.dumps.is_empty() {
			return String::new();
		}

		let dump = self.dumps[self.next].clone();
		self.next = (self.next + 1) % self.dumps.len();
		dump
	}
}
