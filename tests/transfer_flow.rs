//! Classification-to-program flow: the full path a transfer request takes
//! through the resolver.

use serde_json::json;
use xcroute::types::AssetId;
use xcroute::{
	classify, Asset, Location, ProgramBuilder, ProgramShape, Recipient, ReserveKind,
	TransferInput, XcmVersion,
};

const HUB: u32 = 1000;
const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

fn usdt() -> Asset {
	let location = Location::from_value(&json!({
		"parents": 1,
		"interior": { "X3": [
			{ "Parachain": HUB },
			{ "PalletInstance": 50 },
			{ "GeneralIndex": 1984 },
		] },
	}))
	.unwrap();
	Asset::new("USDT".to_string(), 6, AssetId::Number(1984), location)
}

fn build(
	source: u32,
	target: u32,
	asset: &Asset,
	hint: Option<&Location>,
	recipient: &str,
) -> (ReserveKind, xcroute::TransferProgram) {
	let kind = classify(source, target, asset, hint, HUB);
	let builder = ProgramBuilder::new(XcmVersion::V4, HUB);
	let program = builder
		.build(&TransferInput {
			source,
			target,
			asset,
			recipient: Recipient::parse(recipient).unwrap(),
			reserve: kind,
			topic: [1u8; 32],
		})
		.unwrap();
	(kind, program)
}

#[test]
fn hub_bound_transfer_is_destination_reserve() {
	let asset = usdt();
	let (kind, program) = build(2000, HUB, &asset, None, ALICE_SS58);
	assert_eq!(kind, ReserveKind::Foreign);
	assert_eq!(program.shape(), ProgramShape::DestinationReserve);

	let message = program.fee_program();
	let instrs = message["V4"].as_array().unwrap();
	assert!(instrs[0].get("WithdrawAsset").is_some());

	// The SS58 recipient lands as an AccountId32 beneficiary.
	let beneficiary = &instrs[3]["DepositAsset"]["beneficiary"]["interior"]["X1"][0];
	assert!(beneficiary.get("AccountId32").is_some());
}

#[test]
fn self_reserve_transfer_is_local_reserve() {
	let asset = usdt();
	let hint = Location::here();
	let (kind, program) = build(HUB, 2000, &asset, Some(&hint), ALICE_SS58);
	assert_eq!(kind, ReserveKind::Local);
	assert_eq!(program.shape(), ProgramShape::LocalReserve);

	let message = program.fee_program();
	let instrs = message["V4"].as_array().unwrap();
	assert!(instrs[0].get("ReserveAssetDeposited").is_some());
}

#[test]
fn unknown_reserve_routes_through_the_reserve_chain() {
	let asset = usdt();
	let (kind, program) = build(2000, 2006, &asset, None, ALICE_SS58);
	assert_eq!(kind, ReserveKind::Remote);
	assert_eq!(program.shape(), ProgramShape::RemoteReserve);

	let message = program.fee_program();
	let instrs = message["V4"].as_array().unwrap();
	let reserve = &instrs[2]["InitiateReserveWithdraw"]["reserve"];
	assert_eq!(reserve["parents"], 1);
	assert_eq!(reserve["interior"]["X1"], json!([{ "Parachain": 2006 }]));
}

#[test]
fn evm_recipient_gets_account_key20_beneficiary() {
	let asset = usdt();
	let hint = Location::sibling_parachain(2004);
	let (kind, program) = build(
		2000,
		2004,
		&asset,
		Some(&hint),
		"0x1234567890abcdef1234567890abcdef12345678",
	);
	assert_eq!(kind, ReserveKind::Foreign);

	let message = program.fee_program();
	let instrs = message["V4"].as_array().unwrap();
	let beneficiary = &instrs[3]["DepositAsset"]["beneficiary"]["interior"]["X1"][0];
	assert_eq!(
		beneficiary["AccountKey20"]["key"],
		"0x1234567890abcdef1234567890abcdef12345678"
	);
}
