use serde::{Deserialize, Serialize};

/// Outcome of a check for a node or module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
	#[default]
	Unchecked,
	Failure,
	Success,
}

impl CheckStatus {
	/// `Success` if `ok`, `Failure` otherwise.
	pub fn from_ok(ok: bool) -> Self {
		if ok { Self::Success } else { Self::Failure }
	}

	pub fn is_success(self) -> bool {
		self == Self::Success
	}
}
