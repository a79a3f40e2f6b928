//! Error types for location parsing

use thiserror::Error;

/// Failures turning a raw wire location into the typed model.
///
/// Callers skip the offending asset and keep going; these never abort a
/// registry build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationParseError {
	#[error("parents is missing or not a non-negative integer")]
	InvalidParents,

	#[error("malformed interior: {reason}")]
	MalformedInterior { reason: String },

	#[error("interior tag {tag} declares {expected} junction(s) but carries {got}")]
	ArityMismatch {
		tag: String,
		expected: usize,
		got: usize,
	},
}

impl LocationParseError {
	pub(crate) fn malformed(reason: &str) -> Self {
		Self::MalformedInterior {
			reason: reason.to_string(),
		}
	}
}
