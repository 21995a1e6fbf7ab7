use serde::ser::{Serialize, SerializeMap, Serializer};

/// Per-component values (amps, volts or watts) keyed by rail name
///
/// Entries keep the order in which each name was first inserted. Inserting a
/// name that is already present overwrites its value in place, so the entry
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMap {
	entries: Vec<(String, f64)>,
}

impl ComponentMap {
	/// Creates an empty map
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	/// Sets the value for `name`, returning the value it replaced
	pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
		let name = name.into();
		// PMIC dumps carry a few dozen rails at most, a linear scan is enough
		match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.entries.push((name, value));
				None
			},
		}
	}

	pub fn get(&self, name: &str) -> Option<f64> {
		self.entries.iter().find(|(existing, _)| existing == name).map(|&(_, value)| value)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over (name, value) pairs in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), *value))
	}

	/// Iterates over component names in insertion order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	/// Sum of all values
	pub fn total(&self) -> f64 {
		self.entries.iter().map(|&(_, value)| value).sum()
	}

	/// Returns the entry with the largest value
	///
	/// On ties the entry encountered first in insertion order wins.
	pub fn max_entry(&self) -> Option<(&str, f64)> {
		let mut best: Option<(&str, f64)> = None;
		for (name, value) in self.iter() {
			match best {
				Some((_, best_value)) if value <= best_value => {},
				_ => best = Some((name, value)),
			}
		}
		best
	}
}

impl<S: Into<String>> FromIterator<(S, f64)> for ComponentMap {
	fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (name, value) in iter {
			map.insert(name, value);
		}
		map
	}
}

impl Serialize for ComponentMap {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (name, value) in &self.entries {
			map.serialize_entry(name, value)?;
		}
		map.end()
	}
}

/// One timestamped snapshot of per-component power
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PowerReading {
	/// Seconds since the start of the measurement
	pub timestamp: f64,

	/// Power per component in watts
	pub component_power: ComponentMap,
}

impl PowerReading {
	pub fn new(timestamp: f64, component_power: ComponentMap) -> Self {
		Self {
			timestamp,
			component_power,
		}
	}

	/// Sum of all component power values in watts
	pub fn total_power(&self) -> f64 {
		self.component_power.total()
	}
}

/// Combines rail currents and voltages into per-component power in watts
///
/// Only components present in both maps are kept, in the order of the current
/// map. A rail reporting just one of the two values is dropped.
pub fn calculate_power(currents: &ComponentMap, volts: &ComponentMap) -> ComponentMap {
	currents
		.iter()
		.filter_map(|(component, current)| volts.get(component).map(|volt| (component, current * volt)))
		.collect()
}
