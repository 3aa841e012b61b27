use std::path::PathBuf;

use hilbert_primitives::ModuleId;
use hilbert_worker::SpawnError;

/// Errors loading a [`CheckerConfig`](crate::CheckerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Rejected module graph change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
	#[error("module {module} is already in the graph")]
	DuplicateModule { module: ModuleId },
	#[error("module {module} imports {import} as {label:?}, which is not in the graph")]
	UnresolvedImport { module: ModuleId, label: String, import: ModuleId },
}

/// A checking pass that produced no result.
///
/// Problems in the checked content are diagnostics, not errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
	#[error("check of module {module} was interrupted")]
	Interrupted { module: ModuleId },
	#[error(transparent)]
	Spawn(#[from] SpawnError),
	#[error("checker worker for module {module} panicked: {message}")]
	Panicked { module: ModuleId, message: String },
}

/// Result alias for checking passes.
pub type Result<T, E = CheckError> = std::result::Result<T, E>;
