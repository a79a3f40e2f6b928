//! Pooled chain connections
//!
//! A registry build touches the same chain several times (capability probe,
//! asset details, payment locations). The pool keeps one live connection
//! per chain id and health-checks it before every reuse; a failed probe
//! invalidates the entry and reconnects. Constructed once per run and
//! passed by reference — never ambient global state.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::{ChainClient, ChainClientResult, ChainConnection};

pub struct ConnectionPool {
	client: Arc<dyn ChainClient>,
	connections: DashMap<u32, Arc<dyn ChainConnection>>,
	connect_timeout: Duration,
}

impl ConnectionPool {
	pub fn new(client: Arc<dyn ChainClient>, connect_timeout: Duration) -> Self {
		Self {
			client,
			connections: DashMap::new(),
			connect_timeout,
		}
	}

	/// Get a healthy connection for `chain_id`, reusing a pooled one when
	/// its health probe passes, otherwise connecting through the endpoint
	/// list in order.
	pub async fn acquire(
		&self,
		chain_id: u32,
		endpoints: &[String],
	) -> ChainClientResult<Arc<dyn ChainConnection>> {
		if let Some(existing) = self.connections.get(&chain_id).map(|c| Arc::clone(&c)) {
			if existing.is_healthy().await {
				debug!(chain_id, "reusing pooled connection");
				return Ok(existing);
			}
			warn!(chain_id, "pooled connection unhealthy, reconnecting");
			self.invalidate(chain_id).await;
		}

		let connection = self.client.connect(endpoints, self.connect_timeout).await?;
		// A concurrent acquire for the same chain may have won the slot while
		// we were connecting; keep the pooled one and tear down the loser.
		let raced = match self.connections.entry(chain_id) {
			Entry::Occupied(entry) => Arc::clone(entry.get()),
			Entry::Vacant(entry) => {
				entry.insert(Arc::clone(&connection));
				debug!(chain_id, "pooled new connection");
				return Ok(connection);
			},
		};
		connection.disconnect().await;
		Ok(raced)
	}

	/// Drop the pooled connection for `chain_id`, disconnecting it.
	pub async fn invalidate(&self, chain_id: u32) {
		if let Some((_, connection)) = self.connections.remove(&chain_id) {
			connection.disconnect().await;
		}
	}

	/// Release everything. Called once at the end of a build.
	pub async fn release_all(&self) {
		let chain_ids: Vec<u32> = self.connections.iter().map(|e| *e.key()).collect();
		for chain_id in chain_ids {
			self.invalidate(chain_id).await;
		}
	}

	pub fn connect_timeout(&self) -> Duration {
		self.connect_timeout
	}
}
