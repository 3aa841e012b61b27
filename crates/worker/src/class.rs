/// Execution classes used for worker observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// A module checking pass on a dedicated thread.
	Check,
	/// CPU-bound work on the runtime's blocking pool.
	CpuBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Check => "check",
			Self::CpuBlocking => "cpu_blocking",
		}
	}
}
