//! Reserve relationship classification
//!
//! Who custodies the real backing asset for a transfer decides the wire
//! program shape. Classification is pair-scoped: the same asset classifies
//! differently for different (source, target) pairs, so callers recompute it
//! per pair and never cache it on the asset.

use tracing::debug;
use xcroute_types::{Asset, Interior, Junction, Location, ReserveKind};

/// Classify the reserve relationship for moving `asset` from `source` to
/// `target`.
///
/// Rules, in order:
/// 1. A transfer into the hub chain without an explicit origin-reserve hint
///    is `Foreign` — the hub custodies the assets it serves.
/// 2. With a hint (the reserve location as seen from the source chain):
///    `parents == 0` means the source itself is the reserve (`Local`);
///    `parents == 1` with exactly `[Parachain(target)]` means the target is
///    (`Foreign`); any other shape is `Remote`.
/// 3. No hint and no rule above: `Remote`. An unknown reserve relationship
///    is never assumed safe to route directly.
pub fn classify(
	source: u32,
	target: u32,
	asset: &Asset,
	origin_reserve: Option<&Location>,
	hub_chain: u32,
) -> ReserveKind {
	let kind = classify_inner(target, origin_reserve, hub_chain);
	debug!(
		source,
		target,
		symbol = %asset.symbol,
		?kind,
		"classified reserve relationship"
	);
	kind
}

fn classify_inner(target: u32, origin_reserve: Option<&Location>, hub_chain: u32) -> ReserveKind {
	if target == hub_chain && origin_reserve.is_none() {
		return ReserveKind::Foreign;
	}

	let Some(reserve) = origin_reserve else {
		return ReserveKind::Remote;
	};

	if reserve.parents == 0 {
		return ReserveKind::Local;
	}
	if reserve.parents == 1 {
		if let Interior::X(junctions) = &reserve.interior {
			if let [Junction::Parachain(para)] = junctions.as_slice() {
				if *para == target {
					return ReserveKind::Foreign;
				}
			}
		}
	}
	ReserveKind::Remote
}

#[cfg(test)]
mod tests {
	use super::*;
	use xcroute_types::AssetId;

	const HUB: u32 = 1000;

	fn asset() -> Asset {
		Asset::new(
			"USDT".to_string(),
			6,
			AssetId::Number(1984),
			Location::sibling_parachain(1000),
		)
	}

	#[test]
	fn transfer_into_hub_without_hint_is_foreign() {
		assert_eq!(
			classify(2000, 1000, &asset(), None, HUB),
			ReserveKind::Foreign
		);
	}

	#[test]
	fn self_reserve_hint_is_local() {
		let hint = Location::here();
		assert_eq!(
			classify(1000, 2000, &asset(), Some(&hint), HUB),
			ReserveKind::Local
		);
	}

	#[test]
	fn target_parachain_hint_is_foreign() {
		let hint = Location::sibling_parachain(2006);
		assert_eq!(
			classify(2000, 2006, &asset(), Some(&hint), HUB),
			ReserveKind::Foreign
		);
	}

	#[test]
	fn mismatching_parachain_hint_is_remote() {
		let hint = Location::sibling_parachain(2034);
		assert_eq!(
			classify(2000, 2006, &asset(), Some(&hint), HUB),
			ReserveKind::Remote
		);
	}

	#[test]
	fn hint_without_parachain_junction_is_remote() {
		let hint = Location::new(
			1,
			Interior::X(vec![Junction::PalletInstance(50)]),
		);
		assert_eq!(
			classify(2000, 2006, &asset(), Some(&hint), HUB),
			ReserveKind::Remote
		);
	}

	#[test]
	fn no_hint_outside_hub_is_remote() {
		assert_eq!(
			classify(2000, 2006, &asset(), None, HUB),
			ReserveKind::Remote
		);
	}

	#[test]
	fn explicit_hint_overrides_hub_default() {
		// Rule 1 applies only when no hint is present.
		let hint = Location::here();
		assert_eq!(
			classify(2000, 1000, &asset(), Some(&hint), HUB),
			ReserveKind::Local
		);
	}
}
