//! xcroute Chains
//!
//! The chain client capability: object-safe async traits for connecting to
//! a chain and issuing the handful of per-call queries the registry builder
//! needs, a pooled-connection service object, a reqwest-backed JSON-RPC
//! implementation, and a configurable mock used by tests.

pub mod mock;
pub mod pool;
pub mod rpc;

pub use mock::{MockChainClient, MockChainSpec};
pub use pool::ConnectionPool;
pub use rpc::HttpRpcClient;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use xcroute_types::{AssetId, Location};

/// Errors from the chain client capability.
#[derive(Error, Debug)]
pub enum ChainClientError {
	#[error("all {attempted} endpoint(s) failed, last error: {last_error}")]
	AllEndpointsFailed {
		attempted: usize,
		last_error: String,
	},

	#[error("endpoint {endpoint} timed out after {timeout_ms}ms")]
	Timeout { endpoint: String, timeout_ms: u64 },

	#[error("transport error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("rpc error {code}: {message}")]
	Rpc { code: i64, message: String },

	#[error("response decode error: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type ChainClientResult<T> = Result<T, ChainClientError>;

/// A live connection to one chain.
///
/// Per-call queries are independent of each other; callers fan them out and
/// downgrade individual failures rather than aborting the chain.
#[async_trait]
pub trait ChainConnection: Send + Sync {
	/// Look up on-chain detail for one asset (existence, minimum balance).
	async fn query_asset_detail(&self, asset_id: &AssetId) -> ChainClientResult<Value>;

	/// Locations the chain accepts fee payment in.
	async fn query_acceptable_payment_locations(&self) -> ChainClientResult<Vec<Location>>;

	/// Whether the chain exposes the fee/weight query the dashboard relies
	/// on. A chain failing this probe is dropped from the registry.
	async fn supports_fee_query(&self) -> bool;

	/// Cheap liveness probe used before reusing a pooled connection.
	async fn is_healthy(&self) -> bool;

	async fn disconnect(&self);
}

/// Factory for chain connections.
///
/// `endpoints` is tried strictly in order, each attempt bounded by
/// `timeout`; the first success wins and later endpoints are not tried.
/// There is no retry beyond moving to the next endpoint.
#[async_trait]
pub trait ChainClient: Send + Sync {
	async fn connect(
		&self,
		endpoints: &[String],
		timeout: Duration,
	) -> ChainClientResult<Arc<dyn ChainConnection>>;
}
