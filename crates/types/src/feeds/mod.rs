//! Input feed models
//!
//! The registry builder consumes three read-only JSON documents fetched by
//! an external loader: the per-relay asset/location table, the chain
//! metadata table, and the icon lookup. These are deserialized once and
//! never mutated. Feed parsing is lenient at the asset level: a malformed
//! asset (typically an unparseable location) is logged and skipped rather
//! than failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::assets::AssetId;
use crate::locations::Location;

/// One asset as declared by a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedAsset {
	pub symbol: String,
	pub decimals: u8,
	pub asset_id: AssetId,
	pub location: Location,
	/// Where the asset's backing reserve lives, as seen from the declaring
	/// chain. Optional: absent means the reserve relationship is unknown and
	/// classification falls back to its conservative default.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin_reserve_location: Option<Location>,
}

/// Everything one chain declares about its assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAssetDecl {
	pub native_token: FeedAsset,
	#[serde(default, deserialize_with = "lenient_assets")]
	pub local_assets: Vec<FeedAsset>,
	/// Foreign assets this chain has registered locally, each carrying the
	/// origin location the counterpart knows it by.
	#[serde(default, deserialize_with = "lenient_assets")]
	pub registered_foreign: Vec<FeedAsset>,
}

/// Per-asset skip-on-error deserialization: one malformed asset never takes
/// the rest of the list down with it.
fn lenient_assets<'de, D>(deserializer: D) -> Result<Vec<FeedAsset>, D::Error>
where
	D: Deserializer<'de>,
{
	let raws = Vec::<Value>::deserialize(deserializer)?;
	Ok(raws
		.into_iter()
		.filter_map(|raw| match serde_json::from_value::<FeedAsset>(raw) {
			Ok(asset) => Some(asset),
			Err(err) => {
				warn!(error = %err, "skipping malformed feed asset");
				None
			},
		})
		.collect())
}

/// The per-relay asset table, keyed by numeric chain id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetFeed(pub BTreeMap<u32, ChainAssetDecl>);

// A chain whose declaration cannot be read at all (usually an unparseable
// native token location) is dropped from the feed, mirroring how the
// builder drops unreachable chains.
impl<'de> Deserialize<'de> for AssetFeed {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = BTreeMap::<u32, Value>::deserialize(deserializer)?;
		let mut chains = BTreeMap::new();
		for (chain_id, decl) in raw {
			match serde_json::from_value::<ChainAssetDecl>(decl) {
				Ok(decl) => {
					chains.insert(chain_id, decl);
				},
				Err(err) => {
					warn!(chain_id, error = %err, "skipping chain with unreadable asset declaration");
				},
			}
		}
		Ok(AssetFeed(chains))
	}
}

/// Chain metadata as declared by the chain table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDecl {
	pub name: String,
	pub ss58_prefix: u16,
	/// Endpoints in priority order; connection attempts follow this order.
	pub providers: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub evm_chain_id: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub existential_deposit: Option<String>,
	/// Chain ids this chain has an outbound channel to. A pair is
	/// connectivity-validated only when both directions are declared.
	#[serde(default)]
	pub channels: Vec<u32>,
}

/// The chain metadata table, keyed by numeric chain id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainFeed(pub BTreeMap<u32, ChainDecl>);

/// Symbol to icon URL lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconFeed(pub BTreeMap<String, String>);

impl IconFeed {
	pub fn lookup(&self, symbol: &str) -> Option<String> {
		self.0.get(symbol).cloned()
	}
}
