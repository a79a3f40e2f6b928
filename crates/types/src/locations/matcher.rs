//! Equality relation over normalized interiors
//!
//! Two differently-encoded wire locations denote the same asset when their
//! normalized interiors match. Matching is reflexive and, with one
//! documented exception, symmetric. There is no partial or fuzzy matching:
//! a variant mismatch is `false`, never an error.

use super::normalize::{NormalizedInterior, NormalizedJunction};

impl NormalizedInterior {
	/// Whether `self` and `other` denote the same interior.
	///
	/// An empty interior only matches another empty interior. Runs of
	/// different length never match, except for the one-directional
	/// key-in-front-of-parachain exception checked first (see
	/// [`key_prefix_exception`]).
	pub fn matches(&self, other: &NormalizedInterior) -> bool {
		let (a, b) = match (self.junctions(), other.junctions()) {
			(None, None) => return true,
			(None, _) | (_, None) => return false,
			(Some(a), Some(b)) => (a, b),
		};

		if a.len() != b.len() {
			return key_prefix_exception(a, b);
		}

		a.iter().zip(b).all(|(x, y)| junction_matches(x, y))
	}
}

/// One chain registers its native token as a bare `GeneralKey` while its
/// counterparts address the same token as `[Parachain(..), GeneralKey(..)]`.
/// A length-1 run on the left matches a length-2 run on the right when both
/// carry the same canonical key.
///
/// Deliberately one-directional (`a` short, `b` long), mirroring the wire
/// data this was observed against; do not symmetrize without confirming the
/// counterpart chains actually need it.
fn key_prefix_exception(a: &[NormalizedJunction], b: &[NormalizedJunction]) -> bool {
	match (a, b) {
		([NormalizedJunction::GeneralKey(short)], [_, NormalizedJunction::GeneralKey(long)]) => {
			short == long
		},
		_ => false,
	}
}

/// Junction-level comparison. Variants never cross-match; payloads are
/// compared on their canonical forms, which normalization has already
/// produced (comma-free ids, padded lower-case keys, network tags).
fn junction_matches(a: &NormalizedJunction, b: &NormalizedJunction) -> bool {
	use NormalizedJunction::*;
	match (a, b) {
		(Parachain(x), Parachain(y)) => x == y,
		(PalletInstance(x), PalletInstance(y)) => x == y,
		(GeneralIndex(x), GeneralIndex(y)) => x == y,
		(GeneralKey(x), GeneralKey(y)) => x == y,
		(
			AccountId32 { network: nx, id: x },
			AccountId32 { network: ny, id: y },
		) => x == y && nx == ny,
		(
			AccountKey20 { network: nx, key: x },
			AccountKey20 { network: ny, key: y },
		) => x == y && nx == ny,
		(GlobalConsensus(x), GlobalConsensus(y)) => x == y,
		// Unknown junction kinds only ever match their exact structural twin.
		(Other(x), Other(y)) => x == y,
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::locations::Location;
	use serde_json::json;

	fn interior(raw: serde_json::Value) -> NormalizedInterior {
		Location::from_value(&raw).unwrap().normalized_interior()
	}

	#[test]
	fn here_only_matches_here() {
		let here = interior(json!({ "parents": 0, "interior": "Here" }));
		let para = interior(json!({ "parents": 1, "interior": { "X1": { "Parachain": 2000 } } }));
		assert!(here.matches(&here));
		assert!(!here.matches(&para));
		assert!(!para.matches(&here));
	}

	#[test]
	fn matching_is_reflexive() {
		let samples = [
			json!({ "parents": 0, "interior": "Here" }),
			json!({ "parents": 1, "interior": { "X1": { "Parachain": 2000 } } }),
			json!({ "parents": 1, "interior": { "X2": [
				{ "Parachain": 1000 },
				{ "GeneralIndex": 1984 },
			] } }),
			json!({ "parents": 1, "interior": { "X1": { "Plurality": { "id": "Technical" } } } }),
		];
		for raw in samples {
			let n = interior(raw.clone());
			assert!(n.matches(&n), "not reflexive for {raw}");
		}
	}

	#[test]
	fn cross_encoding_equivalence() {
		let bare = interior(json!({ "parents": 1, "interior": { "X1": { "Parachain": 2000 } } }));
		let array =
			interior(json!({ "parents": 1, "interior": { "X1": [{ "Parachain": "2,000" }] } }));
		assert!(bare.matches(&array));
		assert!(array.matches(&bare));
	}

	#[test]
	fn key_prefix_exception_is_one_directional() {
		let short = interior(json!({
			"parents": 0,
			"interior": { "X1": { "GeneralKey": "0x0001" } },
		}));
		let long = interior(json!({
			"parents": 1,
			"interior": { "X2": [
				{ "Parachain": 2001 },
				{ "GeneralKey": { "length": 2, "data": "0x0001" } },
			] },
		}));
		assert!(short.matches(&long));
		// The exception does not apply in reverse.
		assert!(!long.matches(&short));
	}

	#[test]
	fn key_prefix_exception_requires_equal_keys() {
		let short = interior(json!({
			"parents": 0,
			"interior": { "X1": { "GeneralKey": "0x0001" } },
		}));
		let other_key = interior(json!({
			"parents": 1,
			"interior": { "X2": [
				{ "Parachain": 2001 },
				{ "GeneralKey": "0x0809" },
			] },
		}));
		assert!(!short.matches(&other_key));
	}

	#[test]
	fn length_mismatch_without_exception_is_false() {
		let one = interior(json!({ "parents": 1, "interior": { "X1": { "Parachain": 2000 } } }));
		let two = interior(json!({ "parents": 1, "interior": { "X2": [
			{ "Parachain": 2000 },
			{ "PalletInstance": 50 },
		] } }));
		assert!(!one.matches(&two));
		assert!(!two.matches(&one));
	}

	#[test]
	fn account_junctions_compare_bytes_and_network() {
		let a = interior(json!({ "parents": 1, "interior": { "X1": {
			"AccountKey20": { "network": null, "key": "0xDEADBEEF00000000000000000000000000000000" },
		} } }));
		let b = interior(json!({ "parents": 1, "interior": { "X1": {
			"AccountKey20": { "network": { "Any": null }, "key": "0xdeadbeef00000000000000000000000000000000" },
		} } }));
		let c = interior(json!({ "parents": 1, "interior": { "X1": {
			"AccountKey20": { "network": "Polkadot", "key": "0xdeadbeef00000000000000000000000000000000" },
		} } }));
		assert!(a.matches(&b)); // case skew and Any-vs-null absorb
		assert!(!a.matches(&c)); // explicit network tag does not
	}

	#[test]
	fn variant_mismatch_is_false_not_error() {
		let index = interior(json!({ "parents": 1, "interior": { "X1": { "GeneralIndex": 1 } } }));
		let pallet =
			interior(json!({ "parents": 1, "interior": { "X1": { "PalletInstance": 1 } } }));
		assert!(!index.matches(&pallet));
	}

	#[test]
	fn numeric_string_skew_absorbed() {
		let a = interior(json!({ "parents": 1, "interior": { "X2": [
			{ "Parachain": 1000 },
			{ "GeneralIndex": "1,984" },
		] } }));
		let b = interior(json!({ "parents": 1, "interior": { "X2": [
			{ "Parachain": "1,000" },
			{ "GeneralIndex": 1984 },
		] } }));
		assert!(a.matches(&b));
	}
}
