//! Canonical in-memory interior shape
//!
//! Chains of different dialects encode the same interior with or without
//! the `X1` array wrapper, with numeric ids as numbers or comma-separated
//! strings, and with `GeneralKey` either as a bare hex string or as a
//! `{length, data}` record padded to a fixed width. Normalization collapses
//! all of those into one shape so the matcher only ever compares canonical
//! records. Normalizing twice is a no-op.

use serde_json::Value;

use super::{ConsensusNetwork, Interior, Junction};

/// Width every `GeneralKey` is padded to: 32 bytes, 64 hex characters.
const GENERAL_KEY_HEX_WIDTH: usize = 64;

/// A junction after canonicalization. Hex payloads are lower-cased and
/// `0x`-prefixed; `GeneralKey` is right-padded to its fixed width; numeric
/// ids have separator commas stripped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedJunction {
	Parachain(u32),
	PalletInstance(u8),
	GeneralIndex(String),
	GeneralKey(String),
	AccountId32 { network: Option<String>, id: String },
	AccountKey20 { network: Option<String>, key: String },
	GlobalConsensus(ConsensusNetwork),
	/// Unknown junction kind preserved verbatim. Compares only by structural
	/// equality, so it never matches a known junction.
	Other(Value),
}

/// A normalized interior: empty, or an ordered run of canonical junctions.
/// The `X1`..`X4` wrapper is dropped since arity is the run length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedInterior {
	None,
	Junctions(Vec<NormalizedJunction>),
}

/// Lower-case a hex payload and ensure a single `0x` prefix.
pub(crate) fn canonical_hex(raw: &str) -> String {
	let stripped = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
	format!("0x{}", stripped.to_ascii_lowercase())
}

/// Canonical form of a `GeneralKey` payload: lower-cased hex right-padded
/// with zeros to the fixed 32-byte width. Two encodings of the same key,
/// with or without an explicit length field, end up identical.
pub fn canonical_general_key(raw: &str) -> String {
	let mut hex = canonical_hex(raw);
	let payload_len = hex.len() - 2;
	if payload_len < GENERAL_KEY_HEX_WIDTH {
		hex.extend(std::iter::repeat('0').take(GENERAL_KEY_HEX_WIDTH - payload_len));
	}
	hex
}

impl Junction {
	pub fn normalize(&self) -> NormalizedJunction {
		match self {
			Junction::Parachain(id) => NormalizedJunction::Parachain(*id),
			Junction::PalletInstance(idx) => NormalizedJunction::PalletInstance(*idx),
			Junction::GeneralIndex(index) => {
				NormalizedJunction::GeneralIndex(index.replace(',', ""))
			},
			Junction::GeneralKey { data, .. } => {
				NormalizedJunction::GeneralKey(canonical_general_key(data))
			},
			Junction::AccountId32 { network, id } => NormalizedJunction::AccountId32 {
				network: network.as_deref().map(str::to_ascii_lowercase),
				id: canonical_hex(id),
			},
			Junction::AccountKey20 { network, key } => NormalizedJunction::AccountKey20 {
				network: network.as_deref().map(str::to_ascii_lowercase),
				key: canonical_hex(key),
			},
			Junction::GlobalConsensus(network) => {
				NormalizedJunction::GlobalConsensus(network.clone())
			},
			Junction::Other(raw) => NormalizedJunction::Other(raw.clone()),
		}
	}
}

impl Interior {
	/// Collapse this interior into its canonical shape.
	pub fn normalize(&self) -> NormalizedInterior {
		match self {
			Interior::Here => NormalizedInterior::None,
			Interior::X(junctions) => {
				NormalizedInterior::Junctions(junctions.iter().map(Junction::normalize).collect())
			},
		}
	}
}

impl NormalizedInterior {
	pub fn is_none(&self) -> bool {
		matches!(self, NormalizedInterior::None)
	}

	pub fn junctions(&self) -> Option<&[NormalizedJunction]> {
		match self {
			NormalizedInterior::None => None,
			NormalizedInterior::Junctions(junctions) => Some(junctions),
		}
	}

	/// Re-canonicalize. Normalization is idempotent, so this is the
	/// identity; it exists so callers holding an already-normalized value
	/// can treat it uniformly with raw interiors.
	pub fn normalize(&self) -> NormalizedInterior {
		match self {
			NormalizedInterior::None => NormalizedInterior::None,
			NormalizedInterior::Junctions(junctions) => NormalizedInterior::Junctions(
				junctions
					.iter()
					.map(|junction| match junction {
						NormalizedJunction::GeneralIndex(index) => {
							NormalizedJunction::GeneralIndex(index.replace(',', ""))
						},
						NormalizedJunction::GeneralKey(key) => {
							NormalizedJunction::GeneralKey(canonical_general_key(key))
						},
						NormalizedJunction::AccountId32 { network, id } => {
							NormalizedJunction::AccountId32 {
								network: network.as_deref().map(str::to_ascii_lowercase),
								id: canonical_hex(id),
							}
						},
						NormalizedJunction::AccountKey20 { network, key } => {
							NormalizedJunction::AccountKey20 {
								network: network.as_deref().map(str::to_ascii_lowercase),
								key: canonical_hex(key),
							}
						},
						other => other.clone(),
					})
					.collect(),
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::locations::Location;
	use serde_json::json;

	#[test]
	fn general_key_pads_and_lowercases() {
		assert_eq!(
			canonical_general_key("0x0001"),
			format!("0x0001{}", "0".repeat(60))
		);
		assert_eq!(
			canonical_general_key("0X00ABCD"),
			canonical_general_key("0x00abcd")
		);
		// Already full-width keys are untouched.
		let full = format!("0x{}", "ab".repeat(32));
		assert_eq!(canonical_general_key(&full), full);
	}

	#[test]
	fn normalize_is_idempotent() {
		let raws = [
			json!({ "parents": 0, "interior": "Here" }),
			json!({ "parents": 1, "interior": { "X1": { "Parachain": "2,000" } } }),
			json!({
				"parents": 1,
				"interior": { "X2": [
					{ "Parachain": 2006 },
					{ "GeneralKey": { "length": 2, "data": "0x0001" } },
				] },
			}),
			json!({
				"parents": 1,
				"interior": { "X2": [
					{ "Parachain": 2004 },
					{ "AccountKey20": { "network": null, "key": "0xDEADBEEF00000000000000000000000000000000" } },
				] },
			}),
		];
		for raw in raws {
			let once = Location::from_value(&raw).unwrap().normalized_interior();
			assert_eq!(once.normalize(), once, "not idempotent for {raw}");
		}
	}

	#[test]
	fn both_general_key_encodings_normalize_identically() {
		let legacy = Junction::GeneralKey {
			length: None,
			data: "0x0001".to_string(),
		};
		let typed = Junction::GeneralKey {
			length: Some(2),
			data: format!("0x0001{}", "0".repeat(60)),
		};
		assert_eq!(legacy.normalize(), typed.normalize());
	}

	#[test]
	fn here_normalizes_to_none() {
		assert!(Interior::Here.normalize().is_none());
	}

	#[test]
	fn comma_separated_ids_are_stripped() {
		let junction = Junction::GeneralIndex("1,984".to_string());
		assert_eq!(
			junction.normalize(),
			NormalizedJunction::GeneralIndex("1984".to_string())
		);
	}
}
