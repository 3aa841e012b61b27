use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::token::CheckToken;


/// Waiting for a module lock was interrupted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
	#[error("interrupted while waiting for the lock of pass {holder}")]
	Interrupted { holder: u64 },
}

/// How a [`LockGuard`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
	/// The lock was free and now belongs to the caller's pass.
	Acquired,
	/// The calling thread already held the lock for the same pass.
	AlreadyHeld,
}

/// Exclusive checking lock of one module.
///
/// An owner is a pass running on one thread; another thread of the same pass
/// waits like any other pass. Acquisition blocks until the lock is free,
/// polling the caller's token so cancellation ends the wait.
#[derive(Debug, Default)]
pub struct ModuleLock {
	holder: Mutex<Option<Owner>>,
	released: Condvar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Owner {
	pass: u64,
	thread: ThreadId,
}

impl ModuleLock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Blocks until the lock is owned by `token`'s pass on the calling thread
	/// or the token is cancelled.
	pub fn acquire(&self, token: &CheckToken, poll: Duration) -> Result<LockGuard<'_>, LockError> {
		let owner = Owner {
			pass: token.pass(),
			thread: thread::current().id(),
		};
		let mut holder = self.holder.lock();
		loop {
			match *holder {
				Some(current) if current == owner => {
					return Ok(LockGuard {
						lock: self,
						owner,
						outcome: LockOutcome::AlreadyHeld,
					});
				}
				None if !token.is_cancelled() => {
					*holder = Some(owner);
					tracing::trace!(pass = owner.pass, "module lock acquired");
					return Ok(LockGuard {
						lock: self,
						owner,
						outcome: LockOutcome::Acquired,
					});
				}
				current => {
					if token.is_cancelled() {
						return Err(LockError::Interrupted {
							holder: current.map_or(0, |current| current.pass),
						});
					}
					self.released.wait_for(&mut holder, poll);
				}
			}
		}
	}

	/// Pass currently holding the lock.
	pub fn holder(&self) -> Option<u64> {
		self.holder.lock().map(|owner| owner.pass)
	}

	pub fn is_locked(&self) -> bool {
		self.holder().is_some()
	}
}

/// Proof of lock ownership; releases on drop only if it acquired the lock.
#[derive(Debug)]
#[must_use = "the lock is released when the guard is dropped"]
pub struct LockGuard<'a> {
	lock: &'a ModuleLock,
	owner: Owner,
	outcome: LockOutcome,
}

impl LockGuard<'_> {
	pub fn outcome(&self) -> LockOutcome {
		self.outcome
	}

	pub fn newly_acquired(&self) -> bool {
		self.outcome == LockOutcome::Acquired
	}
}

impl Drop for LockGuard<'_> {
	fn drop(&mut self) {
		if self.outcome != LockOutcome::Acquired {
			return;
		}
		let mut holder = self.lock.holder.lock();
		if *holder == Some(self.owner) {
			*holder = None;
			tracing::trace!(pass = self.owner.pass, "module lock released");
			self.lock.released.notify_all();
		}
	}
}
