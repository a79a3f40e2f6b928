//! Recipient address decoding
//!
//! A transfer beneficiary arrives either as a 20-byte EVM-style account
//! (hex), a raw 32-byte public key (hex), or an SS58-encoded 32-byte
//! account. The account shape decides the beneficiary junction the program
//! builder emits: 20 bytes become `AccountKey20`, everything else
//! `AccountId32`.

use thiserror::Error;

const SS58_CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";
const SS58_CHECKSUM_LEN: usize = 2;
const SS58_BODY_LEN: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipientParseError {
	#[error("unrecognized recipient encoding: {reason}")]
	Unrecognized { reason: String },

	#[error("ss58 checksum mismatch")]
	BadChecksum,
}

/// A decoded transfer beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
	/// 20-byte EVM-style account key.
	Evm([u8; 20]),
	/// 32-byte account id.
	Raw32([u8; 32]),
}

impl Recipient {
	/// Decode from hex (`0x` + 40 or 64 chars) or SS58.
	pub fn parse(raw: &str) -> Result<Self, RecipientParseError> {
		if let Some(stripped) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
			let bytes = hex::decode(stripped).map_err(|_| RecipientParseError::Unrecognized {
				reason: "invalid hex".to_string(),
			})?;
			return match bytes.len() {
				20 => Ok(Recipient::Evm(bytes.try_into().expect("len checked"))),
				32 => Ok(Recipient::Raw32(bytes.try_into().expect("len checked"))),
				other => Err(RecipientParseError::Unrecognized {
					reason: format!("hex recipient of {other} bytes"),
				}),
			};
		}
		Self::parse_ss58(raw)
	}

	/// Decode an SS58 address: base58, 1-2 prefix bytes, 32-byte body and a
	/// 2-byte blake2b checksum over the preamble plus everything before it.
	fn parse_ss58(raw: &str) -> Result<Self, RecipientParseError> {
		let data = bs58::decode(raw)
			.into_vec()
			.map_err(|_| RecipientParseError::Unrecognized {
				reason: "not base58".to_string(),
			})?;

		// Simple (one-byte) prefixes are < 64; two-byte prefixes start at 64.
		let prefix_len = match data.first() {
			Some(byte) if *byte < 64 => 1,
			Some(byte) if *byte < 128 => 2,
			_ => {
				return Err(RecipientParseError::Unrecognized {
					reason: "ss58 prefix out of range".to_string(),
				})
			},
		};
		let expected_len = prefix_len + SS58_BODY_LEN + SS58_CHECKSUM_LEN;
		if data.len() != expected_len {
			return Err(RecipientParseError::Unrecognized {
				reason: format!("ss58 payload of {} bytes", data.len()),
			});
		}

		let checked = &data[..prefix_len + SS58_BODY_LEN];
		let checksum = &data[prefix_len + SS58_BODY_LEN..];
		let mut hasher = blake2b_simd::Params::new().hash_length(64).to_state();
		hasher.update(SS58_CHECKSUM_PREAMBLE);
		hasher.update(checked);
		let hash = hasher.finalize();
		if &hash.as_bytes()[..SS58_CHECKSUM_LEN] != checksum {
			return Err(RecipientParseError::BadChecksum);
		}

		let body: [u8; 32] = data[prefix_len..prefix_len + SS58_BODY_LEN]
			.try_into()
			.expect("len checked");
		Ok(Recipient::Raw32(body))
	}

	/// Lower-case hex rendering with `0x` prefix.
	pub fn to_hex(&self) -> String {
		match self {
			Recipient::Evm(key) => format!("0x{}", hex::encode(key)),
			Recipient::Raw32(id) => format!("0x{}", hex::encode(id)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// The canonical dev account: ss58 of the well-known 32-byte key below.
	const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
	const ALICE_HEX: &str = "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

	#[test]
	fn decodes_evm_recipient() {
		let recipient = Recipient::parse("0xDEADBEEF00000000000000000000000000000000").unwrap();
		assert!(matches!(recipient, Recipient::Evm(_)));
		assert_eq!(
			recipient.to_hex(),
			"0xdeadbeef00000000000000000000000000000000"
		);
	}

	#[test]
	fn decodes_raw_32_byte_recipient() {
		let recipient = Recipient::parse(ALICE_HEX).unwrap();
		assert!(matches!(recipient, Recipient::Raw32(_)));
	}

	#[test]
	fn decodes_ss58_recipient() {
		let recipient = Recipient::parse(ALICE_SS58).unwrap();
		assert_eq!(recipient.to_hex(), ALICE_HEX);
	}

	#[test]
	fn rejects_corrupted_ss58() {
		// Flip a character in the body; the checksum no longer holds.
		let mut corrupted = ALICE_SS58.to_string();
		corrupted.replace_range(10..11, if &corrupted[10..11] == "a" { "b" } else { "a" });
		assert!(Recipient::parse(&corrupted).is_err());
	}

	#[test]
	fn rejects_odd_lengths() {
		assert!(Recipient::parse("0x1234").is_err());
		assert!(Recipient::parse("not-an-address").is_err());
	}
}
