//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File};

/// Load configuration from the config file, with environment overrides
/// (`XCROUTE_REGISTRY__HUB_CHAIN_ID=1000` style).
pub fn load_config() -> Result<Settings, ConfigError> {
	let s = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.add_source(Environment::with_prefix("XCROUTE").separator("__"))
		.build()?;

	s.try_deserialize()
}
