// Telemetry source
pub const DEFAULT_TELEMETRY_COMMAND: &str = "vcgencmd pmic_read_adc";

// Sampling settings
pub const DEFAULT_SAMPLING_INTERVAL_SECS: f64 = 1.0;

// Dashboard settings
pub const DASHBOARD_POLL_INTERVAL_MS: u64 = 100;
pub const DASHBOARD_METRIC_PRECISION: usize = 6;

// Export settings
pub const DEFAULT_EXPORT_FILENAME: &str = "power_consumption.svg";
pub const EXPORT_METRIC_PRECISION: usize = 2;
pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;
