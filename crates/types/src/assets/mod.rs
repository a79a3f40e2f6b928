//! Asset models
//!
//! Assets are immutable value objects constructed from a feed (or from
//! transfer inputs) and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locations::Location;

/// Chain-specific asset identifier.
///
/// Chains disagree on what an asset id is: a string, an integer, or a
/// nested tagged value. It is opaque to this crate — compared only by
/// structural equality, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetId {
	Number(u64),
	Text(String),
	Tagged(Value),
}

impl AssetId {
	/// Stable rendering used for logging and per-item RPC params.
	pub fn to_wire(&self) -> Value {
		match self {
			AssetId::Number(n) => Value::from(*n),
			AssetId::Text(s) => Value::from(s.clone()),
			AssetId::Tagged(v) => v.clone(),
		}
	}
}

/// Reserve relationship of an asset for one specific (source, target) pair.
///
/// Never a standalone asset property: the same asset can be `Local` from
/// A to B and `Foreign` from A to C, so it is recomputed per pair and only
/// stored on registry entries that are already pair-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReserveKind {
	/// The source chain custodies the backing asset.
	Local,
	/// The target chain custodies the backing asset.
	Foreign,
	/// Neither side does; routing must go through the reserve chain.
	Remote,
}

/// Projections of one asset as seen from counterpart chains, keyed by
/// counterpart chain id. An index, not an ownership edge: entries referencing
/// each other bidirectionally is expected.
pub type RegisteredChains = BTreeMap<u32, Asset>;

/// A fungible asset as known to one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
	pub symbol: String,
	pub decimals: u8,
	pub asset_id: AssetId,
	pub location: Location,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	/// Valid only for the (source, target) pair of the registry entry this
	/// asset sits in.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reserve_kind: Option<ReserveKind>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_amount: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub registered_chains: Option<RegisteredChains>,
}

impl Asset {
	pub fn new(symbol: String, decimals: u8, asset_id: AssetId, location: Location) -> Self {
		Self {
			symbol,
			decimals,
			asset_id,
			location,
			icon: None,
			reserve_kind: None,
			min_amount: None,
			registered_chains: None,
		}
	}

	pub fn with_icon(mut self, icon: Option<String>) -> Self {
		self.icon = icon;
		self
	}

	pub fn with_reserve_kind(mut self, kind: ReserveKind) -> Self {
		self.reserve_kind = Some(kind);
		self
	}
}
