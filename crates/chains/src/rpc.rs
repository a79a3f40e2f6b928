//! HTTP JSON-RPC chain client
//!
//! Talks to chain RPC gateways over HTTP POST. Connecting probes each
//! endpoint in configured order with a bounded timeout and keeps the first
//! one that answers; there is no parallel racing and no backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, warn};

use xcroute_types::{AssetId, Location};

use crate::{ChainClient, ChainClientError, ChainClientResult, ChainConnection};

const PROBE_METHOD: &str = "system_chain";
const HEALTH_METHOD: &str = "system_health";
const METHODS_METHOD: &str = "rpc_methods";
const ASSET_DETAIL_METHOD: &str = "assets_asset";
const PAYMENT_LOCATIONS_METHOD: &str = "xcmPayment_queryAcceptablePaymentLocations";

pub struct HttpRpcClient {
	http: Client,
}

impl HttpRpcClient {
	pub fn new() -> ChainClientResult<Self> {
		let http = Client::builder()
			.tcp_keepalive(Duration::from_secs(60))
			.build()?;
		Ok(Self { http })
	}
}

#[async_trait]
impl ChainClient for HttpRpcClient {
	async fn connect(
		&self,
		endpoints: &[String],
		connect_timeout: Duration,
	) -> ChainClientResult<Arc<dyn ChainConnection>> {
		let mut last_error = "no endpoints configured".to_string();
		for endpoint in endpoints {
			let connection = RpcConnection {
				http: self.http.clone(),
				endpoint: endpoint.clone(),
				call_timeout: connect_timeout,
			};
			match timeout(connect_timeout, connection.call(PROBE_METHOD, json!([]))).await {
				Ok(Ok(chain_name)) => {
					debug!(endpoint, %chain_name, "connected");
					return Ok(Arc::new(connection));
				},
				Ok(Err(err)) => {
					warn!(endpoint, error = %err, "endpoint probe failed");
					last_error = err.to_string();
				},
				Err(_) => {
					warn!(endpoint, timeout_ms = connect_timeout.as_millis() as u64, "endpoint probe timed out");
					last_error = ChainClientError::Timeout {
						endpoint: endpoint.clone(),
						timeout_ms: connect_timeout.as_millis() as u64,
					}
					.to_string();
				},
			}
		}
		Err(ChainClientError::AllEndpointsFailed {
			attempted: endpoints.len(),
			last_error,
		})
	}
}

struct RpcConnection {
	http: Client,
	endpoint: String,
	call_timeout: Duration,
}

impl RpcConnection {
	async fn call(&self, method: &str, params: Value) -> ChainClientResult<Value> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});
		let response: Value = self
			.http
			.post(&self.endpoint)
			.json(&body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;
		if let Some(err) = response.get("error") {
			return Err(ChainClientError::Rpc {
				code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
				message: err
					.get("message")
					.and_then(Value::as_str)
					.unwrap_or("unknown")
					.to_string(),
			});
		}
		Ok(response.get("result").cloned().unwrap_or(Value::Null))
	}

	async fn call_bounded(&self, method: &str, params: Value) -> ChainClientResult<Value> {
		match timeout(self.call_timeout, self.call(method, params)).await {
			Ok(result) => result,
			Err(_) => Err(ChainClientError::Timeout {
				endpoint: self.endpoint.clone(),
				timeout_ms: self.call_timeout.as_millis() as u64,
			}),
		}
	}
}

#[async_trait]
impl ChainConnection for RpcConnection {
	async fn query_asset_detail(&self, asset_id: &AssetId) -> ChainClientResult<Value> {
		self.call_bounded(ASSET_DETAIL_METHOD, json!([asset_id.to_wire()]))
			.await
	}

	async fn query_acceptable_payment_locations(&self) -> ChainClientResult<Vec<Location>> {
		let raw = self
			.call_bounded(PAYMENT_LOCATIONS_METHOD, json!([]))
			.await?;
		let items = raw.as_array().cloned().unwrap_or_default();
		// Unparseable entries are skipped, not fatal: the list degrades.
		Ok(items
			.iter()
			.filter_map(|item| match Location::from_value(item) {
				Ok(location) => Some(location),
				Err(err) => {
					warn!(endpoint = %self.endpoint, error = %err, "skipping malformed payment location");
					None
				},
			})
			.collect())
	}

	async fn supports_fee_query(&self) -> bool {
		match self.call_bounded(METHODS_METHOD, json!([])).await {
			Ok(result) => result
				.get("methods")
				.and_then(Value::as_array)
				.map(|methods| {
					methods
						.iter()
						.filter_map(Value::as_str)
						.any(|m| m == PAYMENT_LOCATIONS_METHOD)
				})
				.unwrap_or(false),
			Err(err) => {
				warn!(endpoint = %self.endpoint, error = %err, "capability probe failed");
				false
			},
		}
	}

	async fn is_healthy(&self) -> bool {
		self.call_bounded(HEALTH_METHOD, json!([])).await.is_ok()
	}

	async fn disconnect(&self) {
		// HTTP connections are dropped with the client; nothing to tear down.
		debug!(endpoint = %self.endpoint, "disconnected");
	}
}
