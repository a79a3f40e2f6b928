//! Configurable mock chain client
//!
//! Keyed by endpoint, so tests exercise the same in-order endpoint walk the
//! real client performs: an endpoint absent from the map behaves like a
//! dead endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use xcroute_types::{AssetId, Location};

use crate::{ChainClient, ChainClientError, ChainClientResult, ChainConnection};

/// Scripted behavior for one endpoint.
#[derive(Debug, Clone)]
pub struct MockChainSpec {
	pub healthy: bool,
	pub supports_fee_query: bool,
	/// Asset detail responses keyed by the wire rendering of the asset id.
	/// Ids absent from the map fail their detail query.
	pub asset_details: HashMap<String, Value>,
	pub payment_locations: Vec<Location>,
}

impl MockChainSpec {
	pub fn healthy() -> Self {
		Self {
			healthy: true,
			supports_fee_query: true,
			asset_details: HashMap::new(),
			payment_locations: Vec::new(),
		}
	}

	pub fn without_fee_query() -> Self {
		Self {
			supports_fee_query: false,
			..Self::healthy()
		}
	}

	pub fn with_asset_detail(mut self, asset_id: &AssetId, detail: Value) -> Self {
		self.asset_details
			.insert(asset_id.to_wire().to_string(), detail);
		self
	}

	pub fn with_payment_locations(mut self, locations: Vec<Location>) -> Self {
		self.payment_locations = locations;
		self
	}
}

#[derive(Default)]
pub struct MockChainClient {
	endpoints: HashMap<String, MockChainSpec>,
}

impl MockChainClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_endpoint(mut self, endpoint: &str, spec: MockChainSpec) -> Self {
		self.endpoints.insert(endpoint.to_string(), spec);
		self
	}
}

#[async_trait]
impl ChainClient for MockChainClient {
	async fn connect(
		&self,
		endpoints: &[String],
		_timeout: Duration,
	) -> ChainClientResult<Arc<dyn ChainConnection>> {
		for endpoint in endpoints {
			if let Some(spec) = self.endpoints.get(endpoint) {
				return Ok(Arc::new(MockConnection { spec: spec.clone() }));
			}
		}
		Err(ChainClientError::AllEndpointsFailed {
			attempted: endpoints.len(),
			last_error: "mock endpoint not scripted".to_string(),
		})
	}
}

struct MockConnection {
	spec: MockChainSpec,
}

#[async_trait]
impl ChainConnection for MockConnection {
	async fn query_asset_detail(&self, asset_id: &AssetId) -> ChainClientResult<Value> {
		self.spec
			.asset_details
			.get(&asset_id.to_wire().to_string())
			.cloned()
			.ok_or(ChainClientError::Rpc {
				code: -32000,
				message: "asset unknown to mock".to_string(),
			})
	}

	async fn query_acceptable_payment_locations(&self) -> ChainClientResult<Vec<Location>> {
		Ok(self.spec.payment_locations.clone())
	}

	async fn supports_fee_query(&self) -> bool {
		self.spec.supports_fee_query
	}

	async fn is_healthy(&self) -> bool {
		self.spec.healthy
	}

	async fn disconnect(&self) {}
}
