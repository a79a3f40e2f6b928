//! Channel connectivity graph
//!
//! Chains declare their outbound channels; a pair of chains is routable
//! only when both directions exist. The registry builder consults this
//! graph before cross-referencing any two chains, so a half-open pair never
//! reaches the output artifact.

use std::collections::BTreeSet;

use xcroute_types::ChainFeed;

pub struct ChannelGraph {
	directed: BTreeSet<(u32, u32)>,
}

impl ChannelGraph {
	pub fn from_feed(feed: &ChainFeed) -> Self {
		let mut directed = BTreeSet::new();
		for (chain_id, decl) in &feed.0 {
			for peer in &decl.channels {
				directed.insert((*chain_id, *peer));
			}
		}
		Self { directed }
	}

	pub fn has_channel(&self, from: u32, to: u32) -> bool {
		self.directed.contains(&(from, to))
	}

	/// A pair is connectivity-validated only when channels exist in both
	/// directions.
	pub fn bidirectional(&self, a: u32, b: u32) -> bool {
		self.has_channel(a, b) && self.has_channel(b, a)
	}
}
