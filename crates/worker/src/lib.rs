//! Execution primitives for module checking passes.
//!
//! A pass runs single-threaded on one worker. Passes for different modules
//! (or the same module) may run concurrently and serialize on [`ModuleLock`].

mod class;
mod lock;
mod panic;
mod spawn;
mod token;

pub use class::TaskClass;
pub use lock::{LockError, LockGuard, LockOutcome, ModuleLock};
pub use panic::{join_error_panic_message, panic_message};
pub use spawn::{SpawnError, spawn_blocking, spawn_named_thread};
pub use token::{CheckToken, PassClock};
