//! Registry output models
//!
//! The registry is the build artifact consumed verbatim by the dashboard:
//! one entry per chain, regenerated wholesale on each run. All maps are
//! ordered and all lists sorted by the builder, so identical input feeds
//! produce byte-identical artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::locations::Location;

/// Per-chain metadata carried through to the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMeta {
	pub name: String,
	pub ss58_prefix: u16,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub evm_chain_id: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub existential_deposit: Option<String>,
}

/// One chain's view of the network: its own assets, every counterpart's
/// assets transferable to it, and the locations it accepts fee payment in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRegistryEntry {
	pub chain_id: u32,
	pub meta: ChainMeta,
	pub native_token: Asset,
	pub local_assets: Vec<Asset>,
	/// Assets transferable from each counterpart chain into this one,
	/// keyed by counterpart chain id. Only connectivity-validated pairs
	/// appear here.
	pub cross_chain_assets: BTreeMap<u32, Vec<Asset>>,
	/// Endpoint list in configured priority order.
	pub providers: Vec<String>,
	pub payment_acceptable_locations: Vec<Location>,
}

/// The whole artifact, keyed by chain id.
pub type Registry = BTreeMap<u32, ChainRegistryEntry>;
