//! xcroute Config
//!
//! Settings structures and the file/environment loader.

pub mod loader;
pub mod settings;

pub use loader::load_config;
pub use settings::{FeedSettings, LogFormat, LoggingSettings, RegistrySettings, Settings};
