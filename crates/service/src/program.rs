//! Transfer program construction
//!
//! Emits the versioned wire-level instruction sequence for a classified
//! transfer. Four terminal shapes exist, keyed by the reserve relationship
//! and whether the pair qualifies for teleporting the primary reserve
//! asset. Programs are built with a 1-unit fee probe amount so the same
//! message serves weight/fee estimation; the real amount is substituted
//! into the leading asset instruction only, immediately before signing.

use serde_json::{json, Value};
use thiserror::Error;

use xcroute_types::{Asset, Interior, Location, Recipient, ReserveKind, XcmVersion};

/// Probe amount used for every fee estimation message.
const FEE_PROBE_AMOUNT: u128 = 1;

/// Chain id of the relay/root chain.
const RELAY_CHAIN: u32 = 0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
	#[error("no program shape for {reserve:?} transfer {source_chain} -> {target}: {reason}")]
	UnsupportedShape {
		reserve: ReserveKind,
		source_chain: u32,
		target: u32,
		reason: String,
	},
}

/// The four terminal program shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramShape {
	Teleport,
	LocalReserve,
	DestinationReserve,
	RemoteReserve,
}

/// Inputs for one program build. The reserve kind must have been computed
/// for exactly this (source, target) pair.
#[derive(Debug, Clone)]
pub struct TransferInput<'a> {
	pub source: u32,
	pub target: u32,
	pub asset: &'a Asset,
	pub recipient: Recipient,
	pub reserve: ReserveKind,
	pub topic: [u8; 32],
}

pub struct ProgramBuilder {
	version: XcmVersion,
	hub_chain: u32,
}

impl ProgramBuilder {
	pub fn new(version: XcmVersion, hub_chain: u32) -> Self {
		Self { version, hub_chain }
	}

	/// Build the transfer program. Fails closed: an unroutable shape is an
	/// error, never a best-guess message.
	pub fn build(&self, input: &TransferInput) -> Result<TransferProgram, ProgramError> {
		let shape = self.select_shape(input)?;
		Ok(TransferProgram {
			version: self.version,
			shape,
			asset_location: input.asset.location.clone(),
			beneficiary: input.recipient,
			target: input.target,
			topic: input.topic,
		})
	}

	/// Teleport applies only to the network's primary reserve asset (its
	/// location is `parents >= 1, interior Here`) moving directly between
	/// the relay and the hub. Everything else keys off the reserve kind.
	fn select_shape(&self, input: &TransferInput) -> Result<ProgramShape, ProgramError> {
		let relay_hub_pair = (input.source == RELAY_CHAIN && input.target == self.hub_chain)
			|| (input.source == self.hub_chain && input.target == RELAY_CHAIN);
		let is_primary_reserve_asset =
			input.asset.location.parents >= 1 && input.asset.location.interior == Interior::Here;
		if relay_hub_pair && is_primary_reserve_asset {
			return Ok(ProgramShape::Teleport);
		}

		match input.reserve {
			ReserveKind::Local => Ok(ProgramShape::LocalReserve),
			ReserveKind::Foreign => Ok(ProgramShape::DestinationReserve),
			ReserveKind::Remote => {
				// The remote program withdraws on the reserve addressed as a
				// sibling parachain; the relay cannot be addressed that way.
				if input.target == RELAY_CHAIN {
					return Err(ProgramError::UnsupportedShape {
						reserve: input.reserve,
						source_chain: input.source,
						target: input.target,
						reason: "remote reserve cannot target the relay chain".to_string(),
					});
				}
				Ok(ProgramShape::RemoteReserve)
			},
		}
	}
}

/// A built program. Self-contained: messages for any amount are rendered
/// from the stored pieces rather than patched with JSON surgery.
pub struct TransferProgram {
	version: XcmVersion,
	shape: ProgramShape,
	asset_location: Location,
	beneficiary: Recipient,
	target: u32,
	topic: [u8; 32],
}

impl TransferProgram {
	pub fn shape(&self) -> ProgramShape {
		self.shape
	}

	/// The destination-fee program used for weight/fee estimation: the
	/// transfer message carrying the 1-unit probe amount.
	pub fn fee_program(&self) -> Value {
		self.message(FEE_PROBE_AMOUNT)
	}

	/// The versioned message with `amount` in the leading asset
	/// instruction. `BuyExecution` fees stay at the probe amount; only the
	/// transferred quantity changes.
	pub fn message(&self, amount: u128) -> Value {
		let instructions = match self.shape {
			ProgramShape::Teleport => vec![
				json!({ "ReceiveTeleportedAsset": [self.asset(amount)] }),
				json!("ClearOrigin"),
				self.buy_execution(),
				self.deposit_asset(),
				self.set_topic(),
			],
			ProgramShape::LocalReserve => {
				let mut program = vec![
					json!({ "ReserveAssetDeposited": [self.asset(amount)] }),
					json!("ClearOrigin"),
					self.buy_execution(),
					self.deposit_asset(),
				];
				if self.version == XcmVersion::V4 {
					program.push(self.set_topic());
				}
				program
			},
			ProgramShape::DestinationReserve => vec![
				json!({ "WithdrawAsset": [self.asset(amount)] }),
				json!("ClearOrigin"),
				self.buy_execution(),
				self.deposit_asset(),
			],
			ProgramShape::RemoteReserve => {
				let reserve = Location::sibling_parachain(self.target).to_value(self.version);
				vec![
					json!({ "WithdrawAsset": [self.asset(amount)] }),
					json!({ "SetFeesMode": { "jitWithdraw": true } }),
					json!({ "InitiateReserveWithdraw": {
						"assets": { "Wild": { "AllCounted": 1 } },
						"reserve": reserve,
						"xcm": [self.buy_execution(), self.deposit_asset()],
					} }),
				]
			},
		};
		self.versioned(instructions)
	}

	fn versioned(&self, instructions: Vec<Value>) -> Value {
		match self.version {
			XcmVersion::V3 => json!({ "V3": instructions }),
			XcmVersion::V4 => json!({ "V4": instructions }),
		}
	}

	/// Versioned multiasset. V3 wraps the location in `Concrete`; V4 carries
	/// it bare. Amounts render as decimal strings so u128 survives JSON.
	fn asset(&self, amount: u128) -> Value {
		let location = self.asset_location.to_value(self.version);
		let id = match self.version {
			XcmVersion::V3 => json!({ "Concrete": location }),
			XcmVersion::V4 => location,
		};
		json!({ "id": id, "fun": { "Fungible": amount.to_string() } })
	}

	fn buy_execution(&self) -> Value {
		json!({ "BuyExecution": {
			"fees": self.asset(FEE_PROBE_AMOUNT),
			"weightLimit": "Unlimited",
		} })
	}

	/// Beneficiary junction keyed by the recipient account shape: 20 bytes
	/// encode as `AccountKey20`, everything else as `AccountId32`.
	fn deposit_asset(&self) -> Value {
		let junction = match self.beneficiary {
			Recipient::Evm(_) => json!({ "AccountKey20": {
				"network": null,
				"key": self.beneficiary.to_hex(),
			} }),
			Recipient::Raw32(_) => json!({ "AccountId32": {
				"network": null,
				"id": self.beneficiary.to_hex(),
			} }),
		};
		let interior = match self.version {
			XcmVersion::V3 => json!({ "X1": junction }),
			XcmVersion::V4 => json!({ "X1": [junction] }),
		};
		json!({ "DepositAsset": {
			"assets": { "Wild": { "AllCounted": 1 } },
			"beneficiary": { "parents": 0, "interior": interior },
		} })
	}

	fn set_topic(&self) -> Value {
		json!({ "SetTopic": format!("0x{}", hex::encode(self.topic)) })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use xcroute_types::AssetId;

	const HUB: u32 = 1000;

	fn relay_asset() -> Asset {
		Asset::new(
			"DOT".to_string(),
			10,
			AssetId::Text("native".to_string()),
			Location::new(1, Interior::Here),
		)
	}

	fn para_asset(para: u32) -> Asset {
		Asset::new(
			"GLMR".to_string(),
			18,
			AssetId::Number(1),
			Location::sibling_parachain(para),
		)
	}

	fn input<'a>(
		source: u32,
		target: u32,
		asset: &'a Asset,
		reserve: ReserveKind,
	) -> TransferInput<'a> {
		TransferInput {
			source,
			target,
			asset,
			recipient: Recipient::Raw32([7u8; 32]),
			reserve,
			topic: [0u8; 32],
		}
	}

	fn instructions(message: &Value, version: &str) -> Vec<Value> {
		message[version].as_array().cloned().unwrap()
	}

	#[test]
	fn relay_hub_primary_asset_teleports() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = relay_asset();
		let program = builder.build(&input(0, HUB, &asset, ReserveKind::Foreign)).unwrap();
		assert_eq!(program.shape(), ProgramShape::Teleport);

		let instrs = instructions(&program.fee_program(), "V4");
		assert!(instrs[0].get("ReceiveTeleportedAsset").is_some());
		assert_eq!(instrs[1], "ClearOrigin");
		assert!(instrs[4].get("SetTopic").is_some());
	}

	#[test]
	fn non_primary_asset_never_teleports() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2004);
		let program = builder.build(&input(0, HUB, &asset, ReserveKind::Foreign)).unwrap();
		assert_ne!(program.shape(), ProgramShape::Teleport);
	}

	#[test]
	fn local_reserve_never_starts_with_withdraw() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2000);
		let program = builder
			.build(&input(2000, 2006, &asset, ReserveKind::Local))
			.unwrap();

		let instrs = instructions(&program.fee_program(), "V4");
		assert!(instrs[0].get("ReserveAssetDeposited").is_some());
		assert!(instrs[0].get("WithdrawAsset").is_none());
	}

	#[test]
	fn local_reserve_set_topic_only_on_v4() {
		let asset = para_asset(2000);
		let v3 = ProgramBuilder::new(XcmVersion::V3, HUB)
			.build(&input(2000, 2006, &asset, ReserveKind::Local))
			.unwrap();
		let v4 = ProgramBuilder::new(XcmVersion::V4, HUB)
			.build(&input(2000, 2006, &asset, ReserveKind::Local))
			.unwrap();
		assert_eq!(instructions(&v3.fee_program(), "V3").len(), 4);
		assert_eq!(instructions(&v4.fee_program(), "V4").len(), 5);
	}

	#[test]
	fn destination_reserve_withdraws_first() {
		let builder = ProgramBuilder::new(XcmVersion::V3, HUB);
		let asset = para_asset(2006);
		let program = builder
			.build(&input(2000, 2006, &asset, ReserveKind::Foreign))
			.unwrap();

		let instrs = instructions(&program.fee_program(), "V3");
		assert!(instrs[0].get("WithdrawAsset").is_some());
		assert_eq!(instrs.len(), 4);
	}

	#[test]
	fn remote_reserve_nests_initiate_reserve_withdraw() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2034);
		let program = builder
			.build(&input(2000, 2006, &asset, ReserveKind::Remote))
			.unwrap();

		let instrs = instructions(&program.fee_program(), "V4");
		assert!(instrs[0].get("WithdrawAsset").is_some());
		assert_eq!(instrs[1]["SetFeesMode"]["jitWithdraw"], true);

		let initiate = &instrs[2]["InitiateReserveWithdraw"];
		assert_eq!(
			initiate["reserve"]["interior"]["X1"],
			serde_json::json!([{ "Parachain": 2006 }])
		);
		let inner = initiate["xcm"].as_array().unwrap();
		assert!(inner[0].get("BuyExecution").is_some());
		assert!(inner[1].get("DepositAsset").is_some());
	}

	#[test]
	fn remote_reserve_to_relay_fails_closed() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2034);
		match builder.build(&input(2000, 0, &asset, ReserveKind::Remote)) {
			Err(ProgramError::UnsupportedShape {
				reserve,
				source_chain,
				target,
				..
			}) => {
				assert_eq!(reserve, ReserveKind::Remote);
				assert_eq!(source_chain, 2000);
				assert_eq!(target, 0);
			},
			other => panic!("expected an unsupported shape, got {:?}", other.map(|p| p.shape())),
		}
	}

	#[test]
	fn amount_substitution_touches_only_leading_instruction() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2006);
		let program = builder
			.build(&input(2000, 2006, &asset, ReserveKind::Foreign))
			.unwrap();

		let real = program.message(5_000_000_000_000);
		let instrs = instructions(&real, "V4");
		assert_eq!(
			instrs[0]["WithdrawAsset"][0]["fun"]["Fungible"],
			"5000000000000"
		);
		// Fee probe is unchanged in BuyExecution.
		assert_eq!(instrs[2]["BuyExecution"]["fees"]["fun"]["Fungible"], "1");
	}

	#[test]
	fn evm_recipient_encodes_as_account_key20() {
		let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
		let asset = para_asset(2004);
		let mut transfer = input(2000, 2004, &asset, ReserveKind::Foreign);
		transfer.recipient = Recipient::Evm([0xde; 20]);
		let program = builder.build(&transfer).unwrap();

		let instrs = instructions(&program.fee_program(), "V4");
		let beneficiary = &instrs[3]["DepositAsset"]["beneficiary"];
		assert!(beneficiary["interior"]["X1"][0].get("AccountKey20").is_some());
	}

	#[test]
	fn v3_asset_id_is_concrete_wrapped() {
		let asset = para_asset(2006);
		let v3 = ProgramBuilder::new(XcmVersion::V3, HUB)
			.build(&input(2000, 2006, &asset, ReserveKind::Foreign))
			.unwrap();
		let instrs = instructions(&v3.fee_program(), "V3");
		assert!(instrs[0]["WithdrawAsset"][0]["id"].get("Concrete").is_some());
	}
}
