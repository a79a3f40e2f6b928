//! Versioned cross-consensus location model
//!
//! A location describes where an asset (or account) lives relative to the
//! chain interpreting it: how many hops up the consensus hierarchy
//! (`parents`) followed by an ordered descent through junctions. Chains on
//! different protocol dialects serialize the same location with small
//! encoding differences (bare junction vs one-element array, human-readable
//! numbers with separator commas, lowercase vs capitalized variant tags);
//! this module parses all of them into one typed shape.

pub mod errors;
pub mod matcher;
pub mod normalize;

pub use errors::LocationParseError;
pub use normalize::{NormalizedInterior, NormalizedJunction};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Protocol dialects whose wire encodings this crate emits.
///
/// Location shape is stable across both; the dialect matters for the
/// transfer-program vocabulary and for how `X1` and asset ids are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XcmVersion {
	V3,
	V4,
}

/// A consensus-level network identity carried by `GlobalConsensus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsensusNetwork {
	Ethereum { chain_id: u64 },
	Polkadot,
	Kusama,
}

/// One step of interior descent.
///
/// Unknown wire tags are preserved as [`Junction::Other`] rather than
/// rejected or dropped, so future junction kinds survive round-trips and
/// simply never match a known junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Junction {
	Parachain(u32),
	PalletInstance(u8),
	GeneralIndex(String),
	GeneralKey { length: Option<u8>, data: String },
	AccountId32 { network: Option<String>, id: String },
	AccountKey20 { network: Option<String>, key: String },
	GlobalConsensus(ConsensusNetwork),
	Other(Value),
}

/// The interior of a location: empty, or an ordered run of 1..=4 junctions.
///
/// The run length is itself meaningful on the wire (it selects the
/// `X1`..`X4` tag), so parsing enforces that the declared arity equals the
/// element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interior {
	Here,
	X(Vec<Junction>),
}

/// A parsed location: `parents` hops up, then `interior` down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub parents: u8,
	pub interior: Interior,
}

const MAX_JUNCTIONS: usize = 4;

/// Read a non-negative integer that may arrive as a JSON number or as a
/// human-readable string with separator commas ("2,000").
pub(crate) fn parse_uint(value: &Value) -> Option<u128> {
	match value {
		Value::Number(n) => n.as_u64().map(u128::from),
		Value::String(s) => s.replace(',', "").parse().ok(),
		_ => None,
	}
}

fn tag_matches(key: &str, tag: &str) -> bool {
	key.eq_ignore_ascii_case(tag)
}

/// Extract an optional network tag. Wire encodings vary between absent,
/// `null`, a bare string, the legacy `{"any": null}` object and a tagged
/// object such as `{"polkadot": null}`; `Any`/`null` both mean "not stated".
fn parse_network(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::Null => None,
		Value::String(s) if tag_matches(s, "any") => None,
		Value::String(s) => Some(s.clone()),
		Value::Object(map) if map.len() == 1 => {
			let (tag, _) = map.iter().next()?;
			if tag_matches(tag, "any") {
				None
			} else {
				Some(tag.clone())
			}
		},
		_ => None,
	}
}

fn parse_consensus(value: &Value) -> Option<ConsensusNetwork> {
	match value {
		Value::String(s) if tag_matches(s, "polkadot") => Some(ConsensusNetwork::Polkadot),
		Value::String(s) if tag_matches(s, "kusama") => Some(ConsensusNetwork::Kusama),
		Value::Object(map) if map.len() == 1 => {
			let (tag, body) = map.iter().next()?;
			if tag_matches(tag, "ethereum") {
				let chain_id = body
					.get("chainId")
					.or_else(|| body.get("chain_id"))
					.and_then(parse_uint)?;
				Some(ConsensusNetwork::Ethereum {
					chain_id: chain_id as u64,
				})
			} else if tag_matches(tag, "polkadot") {
				Some(ConsensusNetwork::Polkadot)
			} else if tag_matches(tag, "kusama") {
				Some(ConsensusNetwork::Kusama)
			} else {
				None
			}
		},
		_ => None,
	}
}

impl Junction {
	/// Parse a single junction object. A junction is a one-key tagged map;
	/// any recognized tag with a malformed payload is an error, while an
	/// unrecognized tag is kept verbatim as [`Junction::Other`].
	pub fn from_value(value: &Value) -> Result<Self, LocationParseError> {
		let map = value
			.as_object()
			.filter(|m| m.len() == 1)
			.ok_or_else(|| LocationParseError::malformed("junction is not a one-key object"))?;
		let (tag, body) = map.iter().next().expect("len checked above");

		if tag_matches(tag, "parachain") {
			let id = parse_uint(body)
				.filter(|id| *id <= u128::from(u32::MAX))
				.ok_or_else(|| LocationParseError::malformed("parachain id is not a u32"))?;
			return Ok(Junction::Parachain(id as u32));
		}
		if tag_matches(tag, "palletInstance") || tag_matches(tag, "pallet_instance") {
			let idx = parse_uint(body)
				.filter(|idx| *idx <= u128::from(u8::MAX))
				.ok_or_else(|| LocationParseError::malformed("pallet instance is not a u8"))?;
			return Ok(Junction::PalletInstance(idx as u8));
		}
		if tag_matches(tag, "generalIndex") || tag_matches(tag, "general_index") {
			let index = parse_uint(body)
				.ok_or_else(|| LocationParseError::malformed("general index is not an integer"))?;
			return Ok(Junction::GeneralIndex(index.to_string()));
		}
		if tag_matches(tag, "generalKey") || tag_matches(tag, "general_key") {
			// Older dialects carry a bare hex string; newer ones declare the
			// meaningful prefix length alongside a fixed-width data field.
			return match body {
				Value::String(data) => Ok(Junction::GeneralKey {
					length: None,
					data: data.clone(),
				}),
				Value::Object(fields) => {
					let data = fields
						.get("data")
						.and_then(Value::as_str)
						.ok_or_else(|| LocationParseError::malformed("general key without data"))?;
					let length = fields
						.get("length")
						.and_then(parse_uint)
						.map(|len| len as u8);
					Ok(Junction::GeneralKey {
						length,
						data: data.to_string(),
					})
				},
				_ => Err(LocationParseError::malformed("general key payload shape")),
			};
		}
		if tag_matches(tag, "accountId32") || tag_matches(tag, "account_id32") {
			let id = body
				.get("id")
				.and_then(Value::as_str)
				.ok_or_else(|| LocationParseError::malformed("accountId32 without id"))?;
			return Ok(Junction::AccountId32 {
				network: parse_network(body.get("network")),
				id: id.to_string(),
			});
		}
		if tag_matches(tag, "accountKey20") || tag_matches(tag, "account_key20") {
			let key = body
				.get("key")
				.and_then(Value::as_str)
				.ok_or_else(|| LocationParseError::malformed("accountKey20 without key"))?;
			return Ok(Junction::AccountKey20 {
				network: parse_network(body.get("network")),
				key: key.to_string(),
			});
		}
		if tag_matches(tag, "globalConsensus") || tag_matches(tag, "global_consensus") {
			let network = parse_consensus(body)
				.ok_or_else(|| LocationParseError::malformed("unknown consensus network"))?;
			return Ok(Junction::GlobalConsensus(network));
		}

		Ok(Junction::Other(value.clone()))
	}

	/// Render this junction in the wire shape.
	pub fn to_value(&self) -> Value {
		match self {
			Junction::Parachain(id) => json!({ "Parachain": id }),
			Junction::PalletInstance(idx) => json!({ "PalletInstance": idx }),
			Junction::GeneralIndex(index) => json!({ "GeneralIndex": index }),
			Junction::GeneralKey { length, data } => match length {
				Some(length) => json!({ "GeneralKey": { "length": length, "data": data } }),
				None => json!({ "GeneralKey": data }),
			},
			Junction::AccountId32 { network, id } => {
				json!({ "AccountId32": { "network": network, "id": id } })
			},
			Junction::AccountKey20 { network, key } => {
				json!({ "AccountKey20": { "network": network, "key": key } })
			},
			Junction::GlobalConsensus(network) => match network {
				ConsensusNetwork::Ethereum { chain_id } => {
					json!({ "GlobalConsensus": { "Ethereum": { "chainId": chain_id } } })
				},
				ConsensusNetwork::Polkadot => json!({ "GlobalConsensus": "Polkadot" }),
				ConsensusNetwork::Kusama => json!({ "GlobalConsensus": "Kusama" }),
			},
			Junction::Other(raw) => raw.clone(),
		}
	}
}

impl Interior {
	/// Parse the interior wire shape: `"Here"`, `{"Here": null}`, or an
	/// `X1`..`X4` tagged run whose declared arity must equal the number of
	/// junctions carried.
	pub fn from_value(value: &Value) -> Result<Self, LocationParseError> {
		match value {
			Value::String(s) if tag_matches(s, "here") => Ok(Interior::Here),
			Value::Object(map) if map.len() == 1 => {
				let (tag, body) = map.iter().next().expect("len checked above");
				if tag_matches(tag, "here") {
					return Ok(Interior::Here);
				}
				let arity = parse_x_tag(tag)?;
				let junctions = parse_junction_run(body, arity, tag)?;
				Ok(Interior::X(junctions))
			},
			_ => Err(LocationParseError::malformed("interior shape")),
		}
	}

	/// Render in the wire shape. V3 renders a single junction bare under
	/// `X1`; V4 always uses an array.
	pub fn to_value(&self, version: XcmVersion) -> Value {
		match self {
			Interior::Here => Value::String("Here".to_string()),
			Interior::X(junctions) => {
				let tag = format!("X{}", junctions.len());
				let body = if junctions.len() == 1 && version == XcmVersion::V3 {
					junctions[0].to_value()
				} else {
					Value::Array(junctions.iter().map(Junction::to_value).collect())
				};
				let mut map = Map::new();
				map.insert(tag, body);
				Value::Object(map)
			},
		}
	}
}

fn parse_x_tag(tag: &str) -> Result<usize, LocationParseError> {
	let arity = tag
		.strip_prefix('X')
		.or_else(|| tag.strip_prefix('x'))
		.and_then(|n| n.parse::<usize>().ok())
		.ok_or_else(|| LocationParseError::malformed("unknown interior tag"))?;
	if (1..=MAX_JUNCTIONS).contains(&arity) {
		Ok(arity)
	} else {
		Err(LocationParseError::malformed("interior tag out of range"))
	}
}

fn parse_junction_run(
	body: &Value,
	arity: usize,
	tag: &str,
) -> Result<Vec<Junction>, LocationParseError> {
	// X1 may carry the junction bare instead of a one-element array.
	let items: Vec<&Value> = match body {
		Value::Array(items) => items.iter().collect(),
		other if arity == 1 => vec![other],
		_ => return Err(LocationParseError::malformed("junction run is not an array")),
	};
	if items.len() != arity {
		return Err(LocationParseError::ArityMismatch {
			tag: tag.to_string(),
			expected: arity,
			got: items.len(),
		});
	}
	items.into_iter().map(Junction::from_value).collect()
}

impl Location {
	pub fn new(parents: u8, interior: Interior) -> Self {
		Self { parents, interior }
	}

	/// The relay-relative location of a parachain as seen from a sibling.
	pub fn sibling_parachain(para_id: u32) -> Self {
		Self::new(1, Interior::X(vec![Junction::Parachain(para_id)]))
	}

	/// The chain's own location.
	pub fn here() -> Self {
		Self::new(0, Interior::Here)
	}

	/// Parse a raw wire location. `parents` must be present as a
	/// non-negative integer; a missing or unrecognized interior is a
	/// [`LocationParseError::MalformedInterior`], never a best-effort guess.
	pub fn from_value(value: &Value) -> Result<Self, LocationParseError> {
		let map = value
			.as_object()
			.ok_or_else(|| LocationParseError::malformed("location is not an object"))?;
		let parents_raw = map
			.get("parents")
			.ok_or(LocationParseError::InvalidParents)?;
		let parents = parse_uint(parents_raw)
			.filter(|p| *p <= u128::from(u8::MAX))
			.ok_or(LocationParseError::InvalidParents)?;
		let interior = map
			.get("interior")
			.ok_or_else(|| LocationParseError::malformed("missing interior"))
			.and_then(Interior::from_value)?;
		Ok(Location {
			parents: parents as u8,
			interior,
		})
	}

	/// Render in the wire shape for the given dialect.
	pub fn to_value(&self, version: XcmVersion) -> Value {
		json!({
			"parents": self.parents,
			"interior": self.interior.to_value(version),
		})
	}

	/// Normalize the interior for matching.
	pub fn normalized_interior(&self) -> NormalizedInterior {
		self.interior.normalize()
	}
}

// The registry artifact and the feeds carry locations in wire shape, so
// serde goes through the same parser as everything else.
impl Serialize for Location {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_value(XcmVersion::V4).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Location {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Location::from_value(&raw).map_err(D::Error::custom)
	}
}
