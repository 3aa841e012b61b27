use tokio::task::JoinHandle;

use crate::TaskClass;

/// Worker could not be started.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
	#[error("no tokio runtime is running on this thread")]
	NoRuntime,
	#[error("failed to spawn worker thread: {0}")]
	Thread(#[from] std::io::Error),
}

/// Spawns blocking work on the current runtime's blocking pool.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> Result<JoinHandle<R>, SpawnError>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let handle = tokio::runtime::Handle::try_current().map_err(|_| SpawnError::NoRuntime)?;
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
	Ok(handle.spawn_blocking(f))
}

/// Spawns a dedicated named OS thread.
pub fn spawn_named_thread<F, R>(class: TaskClass, name: impl Into<String>, f: F) -> Result<std::thread::JoinHandle<R>, SpawnError>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let name = name.into();
	tracing::trace!(worker_class = class.as_str(), thread = %name, "worker.spawn_named_thread");
	Ok(std::thread::Builder::new().name(name).spawn(f)?)
}
