//! Configuration settings structures

use serde::{Deserialize, Serialize};

/// Main application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	pub registry: RegistrySettings,
	pub feeds: FeedSettings,
	pub logging: LoggingSettings,
}

/// Registry build parameters.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegistrySettings {
	/// The designated hub chain of the network.
	pub hub_chain_id: u32,
	/// Per-endpoint connect timeout in milliseconds.
	pub connect_timeout_ms: u64,
	/// Bounded number of chains built concurrently, to avoid overwhelming
	/// public endpoints.
	pub max_concurrent_chains: usize,
	/// Where the output artifact is written.
	pub output_path: String,
}

/// Paths of the read-only input feed documents.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedSettings {
	pub assets_path: String,
	pub chains_path: String,
	pub icons_path: String,
}

/// Logging configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			registry: RegistrySettings {
				hub_chain_id: 1000,
				connect_timeout_ms: 10_000,
				max_concurrent_chains: 4,
				output_path: "registry.json".to_string(),
			},
			feeds: FeedSettings {
				assets_path: "feeds/assets.json".to_string(),
				chains_path: "feeds/chains.json".to_string(),
				icons_path: "feeds/icons.json".to_string(),
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Compact,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sane() {
		let settings = Settings::default();
		assert_eq!(settings.registry.hub_chain_id, 1000);
		assert!(settings.registry.max_concurrent_chains >= 1);
	}

	#[test]
	fn log_format_deserializes_lowercase() {
		let settings: LoggingSettings =
			serde_json::from_str(r#"{ "level": "debug", "format": "json" }"#).unwrap();
		assert_eq!(settings.format, LogFormat::Json);
	}
}
