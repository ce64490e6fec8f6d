//! Visualizer settings, read from the embedded `config/visualizer.json`.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::playback::Speed;
use crate::runner::EntryConventions;
use crate::trace::FlatListPolicy;

const EMBEDDED: &str = include_str!("../config/visualizer.json");

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid visualizer config: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Every field has a default, so a partial file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
	pub default_speed: Speed,
	pub flat_list: FlatListPolicy,
	/// Start playback as soon as a run produces a trace.
	pub auto_start: bool,
	pub backtrack_pause: bool,
	pub default_algorithm: String,
	pub default_example: String,
	pub entry_point: EntryConventions,
}

impl Default for VisualizerConfig {
	fn default() -> Self {
		Self {
			default_speed: Speed::Normal,
			flat_list: FlatListPolicy::default(),
			auto_start: true,
			backtrack_pause: false,
			default_algorithm: "dfs".into(),
			default_example: "simple".into(),
			entry_point: EntryConventions::default(),
		}
	}
}

impl VisualizerConfig {
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(text)?)
	}

	/// The embedded config, or defaults if it does not parse.
	pub fn load() -> Self {
		Self::from_json(EMBEDDED).unwrap_or_else(|err| {
			warn!("{err}; falling back to defaults");
			Self::default()
		})
	}
}
