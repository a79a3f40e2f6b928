//! xcroute Library
//!
//! Resolves how fungible assets travel between chains of an XCM-like
//! multi-chain network: location modelling and matching, reserve
//! classification, transfer program construction, and the offline build of
//! a cross-referenced per-chain asset registry.

// Core domain types - the most commonly used types
pub use xcroute_types::{
	serde_json,
	Asset,
	AssetId,
	ChainRegistryEntry,
	Interior,
	Junction,
	Location,
	LocationParseError,
	NormalizedInterior,
	Recipient,
	Registry,
	ReserveKind,
	XcmVersion,
};

// Service layer
pub use xcroute_service::{
	classify, ChannelGraph, ProgramBuilder, ProgramError, ProgramShape, RegistryBuilder,
	TransferInput, TransferProgram,
};

// Chain client capability
pub use xcroute_chains::{
	ChainClient, ChainClientError, ChainConnection, ConnectionPool, HttpRpcClient,
	MockChainClient, MockChainSpec,
};

// Config
pub use xcroute_config::{load_config, LogFormat, Settings};

// Module aliases for direct access
pub mod types {
	pub use xcroute_types::*;
}

pub mod chains {
	pub use xcroute_chains::*;
}

pub mod service {
	pub use xcroute_service::*;
}

pub mod config {
	pub use xcroute_config::*;
}

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use xcroute_types::{AssetFeed, ChainFeed, IconFeed};

/// Builder pattern for configuring a registry build run.
pub struct RegistryRunner {
	settings: Option<Settings>,
	client: Option<Arc<dyn ChainClient>>,
	feeds: Option<(AssetFeed, ChainFeed, IconFeed)>,
}

impl Default for RegistryRunner {
	fn default() -> Self {
		Self::new()
	}
}

impl RegistryRunner {
	pub fn new() -> Self {
		Self {
			settings: None,
			client: None,
			feeds: None,
		}
	}

	/// Set custom settings (otherwise loaded from config file / defaults).
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Set a custom chain client (the reqwest JSON-RPC client by default).
	pub fn with_client(mut self, client: Arc<dyn ChainClient>) -> Self {
		self.client = Some(client);
		self
	}

	/// Provide feeds directly instead of loading them from the configured
	/// paths.
	pub fn with_feeds(mut self, assets: AssetFeed, chains: ChainFeed, icons: IconFeed) -> Self {
		self.feeds = Some((assets, chains, icons));
		self
	}

	/// Initialize tracing with configuration-based settings.
	fn init_tracing_from_settings(settings: &Settings) {
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

		match settings.logging.format {
			LogFormat::Json => {
				tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
			},
			LogFormat::Pretty => {
				tracing_subscriber::fmt().pretty().with_env_filter(env_filter).init();
			},
			LogFormat::Compact => {
				tracing_subscriber::fmt().compact().with_env_filter(env_filter).init();
			},
		}
	}

	fn load_feeds(
		settings: &Settings,
	) -> Result<(AssetFeed, ChainFeed, IconFeed), Box<dyn std::error::Error>> {
		let assets: AssetFeed =
			serde_json::from_slice(&fs::read(&settings.feeds.assets_path).map_err(|e| {
				format!("reading asset feed {}: {e}", settings.feeds.assets_path)
			})?)?;
		let chains: ChainFeed =
			serde_json::from_slice(&fs::read(&settings.feeds.chains_path).map_err(|e| {
				format!("reading chain feed {}: {e}", settings.feeds.chains_path)
			})?)?;
		let icons: IconFeed =
			serde_json::from_slice(&fs::read(&settings.feeds.icons_path).map_err(|e| {
				format!("reading icon feed {}: {e}", settings.feeds.icons_path)
			})?)?;
		Ok((assets, chains, icons))
	}

	/// Run the build and return the registry.
	pub async fn run(self) -> Result<Registry, Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();

		let (assets, chains, icons) = match self.feeds {
			Some(feeds) => feeds,
			None => Self::load_feeds(&settings)?,
		};
		info!(
			chains = chains.0.len(),
			hub = settings.registry.hub_chain_id,
			"feeds loaded"
		);
		for (chain_id, decl) in &chains.0 {
			info!("  - {}: {} ({} endpoint(s))", chain_id, decl.name, decl.providers.len());
		}

		let client: Arc<dyn ChainClient> = match self.client {
			Some(client) => client,
			None => Arc::new(HttpRpcClient::new()?),
		};
		let pool = Arc::new(ConnectionPool::new(
			client,
			Duration::from_millis(settings.registry.connect_timeout_ms),
		));

		let builder = RegistryBuilder::new(pool, assets, chains, icons, settings.registry.hub_chain_id)
			.with_max_concurrent_chains(settings.registry.max_concurrent_chains);
		Ok(builder.build().await)
	}

	/// The complete batch run: load .env and configuration, initialize
	/// tracing, build the registry, write the artifact wholesale.
	pub async fn run_build(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_default(),
		};
		Self::init_tracing_from_settings(&settings);

		let output_path = settings.registry.output_path.clone();
		self.settings = Some(settings);
		let registry = self.run().await?;

		let rendered = serde_json::to_vec_pretty(&registry)?;
		fs::write(&output_path, rendered)?;
		info!(path = %output_path, entries = registry.len(), "artifact written");
		Ok(())
	}
}
