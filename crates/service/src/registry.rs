//! Registry build orchestration
//!
//! Produces one registry entry per configured chain: connects through the
//! pool, probes capabilities, verifies local assets on-chain, then
//! cross-references every counterpart's declared assets through the
//! location matcher. Chains are processed concurrently with a bounded
//! worker count; a failing chain is dropped from the artifact and never
//! aborts the others.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use xcroute_chains::{ChainClientError, ConnectionPool};
use xcroute_types::{
	Asset, AssetFeed, ChainAssetDecl, ChainFeed, ChainMeta, ChainRegistryEntry, FeedAsset,
	IconFeed, Location, Registry, ReserveKind, XcmVersion,
};

use crate::channels::ChannelGraph;
use crate::reserve::classify;

const DEFAULT_MAX_CONCURRENT_CHAINS: usize = 4;

/// Why one chain was dropped from the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
	#[error("chain {chain_id}: connection failed: {source}")]
	Connection {
		chain_id: u32,
		source: ChainClientError,
	},

	#[error("chain {chain_id}: fee query capability probe failed")]
	CapabilityProbe { chain_id: u32 },
}

pub struct RegistryBuilder {
	pool: Arc<ConnectionPool>,
	assets: AssetFeed,
	chains: ChainFeed,
	icons: IconFeed,
	hub_chain: u32,
	max_concurrent_chains: usize,
}

impl RegistryBuilder {
	pub fn new(
		pool: Arc<ConnectionPool>,
		assets: AssetFeed,
		chains: ChainFeed,
		icons: IconFeed,
		hub_chain: u32,
	) -> Self {
		Self {
			pool,
			assets,
			chains,
			icons,
			hub_chain,
			max_concurrent_chains: DEFAULT_MAX_CONCURRENT_CHAINS,
		}
	}

	pub fn with_max_concurrent_chains(mut self, max: usize) -> Self {
		self.max_concurrent_chains = max.max(1);
		self
	}

	/// Build the whole registry. Per-chain failures degrade the output (the
	/// chain is dropped, logged) rather than failing the run.
	pub async fn build(&self) -> Registry {
		let graph = ChannelGraph::from_feed(&self.chains);
		let chain_ids = self.buildable_chain_ids();
		info!(chains = chain_ids.len(), "starting registry build");

		let results: Vec<(u32, Result<ChainRegistryEntry, RegistryError>)> =
			stream::iter(chain_ids.iter().copied())
				.map(|chain_id| {
					let graph = &graph;
					let buildable = chain_ids.as_slice();
					async move { (chain_id, self.build_chain(chain_id, graph, buildable).await) }
				})
				.buffer_unordered(self.max_concurrent_chains)
				.collect()
				.await;

		self.pool.release_all().await;

		// Single-writer accumulation after all per-chain work is done.
		let mut registry = Registry::new();
		for (chain_id, result) in results {
			match result {
				Ok(entry) => {
					registry.insert(chain_id, entry);
				},
				Err(err) => warn!(chain_id, error = %err, "dropping chain from registry"),
			}
		}
		info!(
			built = registry.len(),
			dropped = chain_ids.len() - registry.len(),
			"registry build finished"
		);
		registry
	}

	/// Chains present in both feeds; anything declared on one side only is
	/// logged and skipped.
	fn buildable_chain_ids(&self) -> Vec<u32> {
		let mut ids = Vec::new();
		for chain_id in self.chains.0.keys() {
			if self.assets.0.contains_key(chain_id) {
				ids.push(*chain_id);
			} else {
				warn!(chain_id, "chain has metadata but no asset declaration, skipping");
			}
		}
		for chain_id in self.assets.0.keys() {
			if !self.chains.0.contains_key(chain_id) {
				warn!(chain_id, "chain has assets but no metadata, skipping");
			}
		}
		ids
	}

	async fn build_chain(
		&self,
		chain_id: u32,
		graph: &ChannelGraph,
		buildable: &[u32],
	) -> Result<ChainRegistryEntry, RegistryError> {
		let decl = &self.chains.0[&chain_id];
		let asset_decl = &self.assets.0[&chain_id];

		let connection = self
			.pool
			.acquire(chain_id, &decl.providers)
			.await
			.map_err(|source| RegistryError::Connection { chain_id, source })?;

		if !connection.supports_fee_query().await {
			return Err(RegistryError::CapabilityProbe { chain_id });
		}

		// Verify declared local assets on-chain. Failures downgrade to
		// "asset unsupported": the asset is skipped, the chain keeps going.
		let checks = asset_decl.local_assets.iter().map(|declared| {
			let connection = &connection;
			async move { (declared, connection.query_asset_detail(&declared.asset_id).await) }
		});
		let mut local_assets = Vec::new();
		for (declared, result) in join_all(checks).await {
			match result {
				Ok(detail) => {
					let mut asset = self.project(declared);
					asset.min_amount = min_balance_of(&detail);
					local_assets.push(asset);
				},
				Err(err) => {
					warn!(
						chain_id,
						symbol = %declared.symbol,
						error = %err,
						"asset unsupported, skipping"
					);
				},
			}
		}
		local_assets.sort_by(sort_key);

		let mut payment_acceptable_locations =
			match connection.query_acceptable_payment_locations().await {
				Ok(locations) => locations,
				Err(err) => {
					warn!(chain_id, error = %err, "payment location query failed, continuing with none");
					Vec::new()
				},
			};
		payment_acceptable_locations.sort_by_key(wire_string);
		payment_acceptable_locations.dedup_by_key(|l| wire_string(l));

		let counterparts: Vec<u32> = buildable
			.iter()
			.copied()
			.filter(|other| *other != chain_id && graph.bidirectional(chain_id, *other))
			.collect();
		debug!(chain_id, counterparts = counterparts.len(), "cross-referencing");

		let mut native_token = self.project(&asset_decl.native_token);
		native_token.registered_chains =
			self.registered_chains_for(&asset_decl.native_token.location, &counterparts);
		for asset in &mut local_assets {
			asset.registered_chains = self.registered_chains_for(&asset.location, &counterparts);
		}

		let cross_chain_assets = self.cross_chain_assets(chain_id, asset_decl, &counterparts);

		Ok(ChainRegistryEntry {
			chain_id,
			meta: ChainMeta {
				name: decl.name.clone(),
				ss58_prefix: decl.ss58_prefix,
				evm_chain_id: decl.evm_chain_id,
				existential_deposit: decl.existential_deposit.clone(),
			},
			native_token,
			local_assets,
			cross_chain_assets,
			providers: decl.providers.clone(),
			payment_acceptable_locations,
		})
	}

	/// Counterpart projections of the asset living at `location`: for each
	/// counterpart that has registered a foreign asset matching it, that
	/// chain's own view (id, decimals, location).
	fn registered_chains_for(
		&self,
		location: &Location,
		counterparts: &[u32],
	) -> Option<BTreeMap<u32, Asset>> {
		let mut registered = BTreeMap::new();
		for counterpart in counterparts {
			let foreign = &self.assets.0[counterpart].registered_foreign;
			if let Some(theirs) = foreign
				.iter()
				.find(|candidate| locations_match(location, &candidate.location))
			{
				registered.insert(*counterpart, self.project(theirs));
			}
		}
		(!registered.is_empty()).then_some(registered)
	}

	/// Assets transferable from each counterpart into `chain_id`: the
	/// counterpart's declared assets that this chain has registered locally,
	/// classified per (counterpart -> chain_id) pair. Hub assets are
	/// deduplicated by wire location before projection.
	fn cross_chain_assets(
		&self,
		chain_id: u32,
		asset_decl: &ChainAssetDecl,
		counterparts: &[u32],
	) -> BTreeMap<u32, Vec<Asset>> {
		let mut cross = BTreeMap::new();
		for counterpart in counterparts {
			let their_decl = &self.assets.0[counterpart];
			let candidates = std::iter::once(&their_decl.native_token)
				.chain(their_decl.local_assets.iter());

			let mut seen = BTreeSet::new();
			let mut transferable = Vec::new();
			for candidate in candidates {
				if *counterpart == self.hub_chain
					&& !seen.insert(wire_string(&candidate.location))
				{
					continue;
				}
				let Some(mine) = asset_decl
					.registered_foreign
					.iter()
					.find(|registered| locations_match(&candidate.location, &registered.location))
				else {
					continue;
				};

				let mut asset = self.project(candidate);
				let kind: ReserveKind = classify(
					*counterpart,
					chain_id,
					&asset,
					candidate.origin_reserve_location.as_ref(),
					self.hub_chain,
				);
				asset.reserve_kind = Some(kind);
				asset.registered_chains = Some(BTreeMap::from([(chain_id, self.project(mine))]));
				transferable.push(asset);
			}
			transferable.sort_by(sort_key);
			if !transferable.is_empty() {
				cross.insert(*counterpart, transferable);
			}
		}
		cross
	}

	fn project(&self, declared: &FeedAsset) -> Asset {
		Asset::new(
			declared.symbol.clone(),
			declared.decimals,
			declared.asset_id.clone(),
			declared.location.clone(),
		)
		.with_icon(self.icons.lookup(&declared.symbol))
	}
}

/// Interior-level location identity, in the matcher's asymmetric direction:
/// the asset's own location on the left, the registered counterpart
/// encoding on the right.
fn locations_match(own: &Location, registered: &Location) -> bool {
	own.normalized_interior()
		.matches(&registered.normalized_interior())
}

fn wire_string(location: &Location) -> String {
	location.to_value(XcmVersion::V4).to_string()
}

fn sort_key(a: &Asset, b: &Asset) -> std::cmp::Ordering {
	(a.symbol.as_str(), a.asset_id.to_wire().to_string())
		.cmp(&(b.symbol.as_str(), b.asset_id.to_wire().to_string()))
}

fn min_balance_of(detail: &Value) -> Option<String> {
	let raw = detail.get("minBalance").or_else(|| detail.get("min_balance"))?;
	match raw {
		Value::Number(n) => Some(n.to_string()),
		Value::String(s) => Some(s.replace(',', "")),
		_ => None,
	}
}
