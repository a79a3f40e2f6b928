//! xcroute Types
//!
//! Shared models for the cross-consensus route resolver: the versioned
//! location model with its normalizer and matcher, asset and registry
//! models, input feed shapes and recipient address decoding. This crate
//! contains all domain models organized by business entity.

pub mod address;
pub mod assets;
pub mod feeds;
pub mod locations;
pub mod registry;

// Re-export serde_json for convenience; the wire layer is JSON throughout.
pub use serde_json;

pub use address::{Recipient, RecipientParseError};
pub use assets::{Asset, AssetId, RegisteredChains, ReserveKind};
pub use feeds::{AssetFeed, ChainAssetDecl, ChainDecl, ChainFeed, FeedAsset, IconFeed};
pub use locations::{
	ConsensusNetwork, Interior, Junction, Location, LocationParseError, NormalizedInterior,
	NormalizedJunction, XcmVersion,
};
pub use registry::{ChainMeta, ChainRegistryEntry, Registry};
