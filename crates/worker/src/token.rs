use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic pass id clock.
#[derive(Debug, Default, Clone)]
pub struct PassClock {
	next: Arc<AtomicU64>,
}

impl PassClock {
	/// Creates a new clock; the first pass id is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next pass id.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns a token for a fresh pass.
	pub fn token(&self) -> CheckToken {
		CheckToken::new(self.next(), CancellationToken::new())
	}
}

/// Pass-scoped cancellation token.
///
/// The pass id identifies the lock owner: a pass that reaches a module it
/// already holds gets [`LockOutcome::AlreadyHeld`](crate::LockOutcome).
#[derive(Debug, Clone)]
pub struct CheckToken {
	pass: u64,
	cancel: CancellationToken,
}

impl CheckToken {
	pub fn new(pass: u64, cancel: CancellationToken) -> Self {
		Self { pass, cancel }
	}

	pub const fn pass(&self) -> u64 {
		self.pass
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation of this pass and its children.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Creates a child token for the same pass.
	pub fn child(&self) -> Self {
		Self {
			pass: self.pass,
			cancel: self.cancel.child_token(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn children_share_the_pass_and_follow_cancellation() {
		let clock = PassClock::new();
		let parent = clock.token();
		let child = parent.child();
		assert_eq!(child.pass(), parent.pass());
		assert!(clock.token().pass() > parent.pass());

		child.cancel();
		assert!(!parent.is_cancelled());
		parent.cancel();
		assert!(parent.child().is_cancelled());
	}
}
