use once_cell::sync::Lazy;
use regex::Regex;

use crate::power::ComponentMap;

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

static CURRENT_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"([A-Za-z0-9_]+)_A current\(\d+\)=([\d.]+)A").expect("Failed to compile current regex")
});

static VOLT_REGEX: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"([A-Za-z0-9_]+)_V volt\(\d+\)=([\d.]+)V").expect("Failed to compile volt regex"));

/// Extracts rail currents (A) and voltages (V) from `vcgencmd pmic_read_adc` output
///
/// Whitespace runs, newlines included, are collapsed first so single-line and
/// multi-line dumps parse the same way. When a rail appears more than once the
/// last occurrence wins. Input that matches nothing yields empty maps.
pub fn parse_pmic_output(output: &str) -> (ComponentMap, ComponentMap) {
	let normalized = WHITESPACE_REGEX.replace_all(output, " ");

	let currents = collect_values(&CURRENT_REGEX, &normalized);
	let volts = collect_values(&VOLT_REGEX, &normalized);

	(currents, volts)
}

fn collect_values(regex: &Regex, text: &str) -> ComponentMap {
	let mut values = ComponentMap::new();

	for captures in regex.captures_iter(text) {
		let name = &captures[1];
		let raw = &captures[2];

		// `[\d.]+` also admits things like "1.2.3"
		match raw.parse::<f64>() {
			Ok(value) => {
				values.insert(name, value);
			},
			Err(_) => log::debug!("Skipping unparsable value {raw:?} for rail {name}"),
		}
	}

	values
}
