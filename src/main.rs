use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use pmic_power::config::SamplingConfig;
use pmic_power::constants::{
	DASHBOARD_METRIC_PRECISION, DEFAULT_EXPORT_FILENAME, DEFAULT_SAMPLING_INTERVAL_SECS, DEFAULT_TELEMETRY_COMMAND,
};
use pmic_power::display::print_metrics_summary;
use pmic_power::error::ExportError;
use pmic_power::export::export_plot;
use pmic_power::measure_consumption;
use pmic_power::metrics::calculate_metrics;
use pmic_power::series::TimeSeries;
use pmic_power::tui::{Dashboard, show_dashboard};

#[derive(Parser)]
#[command(name = "pmic-power")]
#[command(about = "Measure Raspberry Pi power consumption from PMIC telemetry")]
#[command(version)]
struct Cli {
	/// Measurement duration in seconds (prompted for when omitted)
	#[arg(short, long)]
	duration: Option<f64>,

	/// Sampling interval in seconds (default: 1)
	#[arg(short, long)]
	interval: Option<f64>,

	/// Shell command line that prints the PMIC ADC readings (run with `sh -c`)
	#[arg(long, default_value = DEFAULT_TELEMETRY_COMMAND)]
	command: String,

	/// Export the run to this file (.svg chart or .json report) and exit
	#[arg(long)]
	export: Option<PathBuf>,

	/// Open the dashboard after sampling and exit when it closes
	#[arg(long)]
	dashboard: bool,

	/// Print the metrics summary after sampling and exit
	#[arg(long)]
	summary: bool,
}

impl Cli {
	fn has_action(&self) -> bool {
		self.export.is_some() || self.dashboard || self.summary
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let cli = Cli::parse();
	let stdin = io::stdin();
	let mut input = stdin.lock();

	let (duration, interval) = match cli.duration {
		Some(duration) => (duration, cli.interval.unwrap_or(DEFAULT_SAMPLING_INTERVAL_SECS)),
		None => {
			let duration = prompt_f64(&mut input, "Enter measurement duration in seconds: ")?
				.context("a measurement duration is required")?;
			let interval = match cli.interval {
				Some(interval) => interval,
				None => prompt_f64(&mut input, "Enter sampling interval in seconds (default: 1): ")?
					.unwrap_or(DEFAULT_SAMPLING_INTERVAL_SECS),
			};
			(duration, interval)
		},
	};

	let config = SamplingConfig::new(duration)
		.and_then(|config| config.with_interval(interval))
		.and_then(|config| config.with_command(cli.command.as_str()))?;

	let series = measure_consumption(&config)?;

	if cli.has_action() {
		if cli.summary {
			print_metrics_summary(calculate_metrics(&series).as_ref(), DASHBOARD_METRIC_PRECISION)?;
		}
		if let Some(path) = &cli.export {
			export(&series, path)?;
		}
		if cli.dashboard {
			show_dashboard(&mut Dashboard::new(&series)).context("dashboard")?;
		}
		return Ok(());
	}

	run_menu(&mut input, &series)
}

/// Interactive menu shown after sampling when no action flag was given
fn run_menu(input: &mut impl BufRead, series: &TimeSeries) -> Result<()> {
	loop {
		println!("Options:");
		println!("1. Show power consumption in terminal");
		println!("2. Export power consumption plot");
		println!("3. Exit");

		let Some(choice) = prompt(input, "Enter your choice: ")? else {
			return Ok(());
		};

		match choice.as_str() {
			"1" => {
				if let Err(e) = show_dashboard(&mut Dashboard::new(series)) {
					eprintln!("Dashboard error: {}", e);
				}
			},
			"2" => {
				let message = format!("Enter filename for export (default: {DEFAULT_EXPORT_FILENAME}): ");
				let filename = prompt(input, &message)?
					.filter(|name| !name.is_empty())
					.unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string());
				export(series, Path::new(&filename))?;
			},
			"3" => return Ok(()),
			_ => println!("Invalid choice. Please try again."),
		}
	}
}

fn export(series: &TimeSeries, path: &Path) -> Result<()> {
	match export_plot(series, path) {
		Ok(_) => println!("Plot exported to {}", path.display()),
		Err(ExportError::NoData) => println!("{}", ExportError::NoData),
		Err(e) => return Err(e).with_context(|| format!("exporting to {}", path.display())),
	}
	Ok(())
}

/// Prints `message` and reads one trimmed line, `None` at end of input
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
	print!("{message}");
	io::stdout().flush()?;

	let mut line = String::new();
	if input.read_line(&mut line)? == 0 {
		return Ok(None);
	}
	Ok(Some(line.trim().to_string()))
}

/// Prompts for a number, `None` on empty input or end of input
fn prompt_f64(input: &mut impl BufRead, message: &str) -> Result<Option<f64>> {
	match prompt(input, message)? {
		Some(answer) if !answer.is_empty() => {
			let value = answer.parse().with_context(|| format!("not a number: {answer:?}"))?;
			Ok(Some(value))
		},
		_ => Ok(None),
	}
}
