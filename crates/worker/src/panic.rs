use std::any::Any;

use tokio::task::JoinError;

#[cfg(test)]
mod tests;

/// Text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"panic with a non-string payload".to_string()
	}
}

/// Panic text of a failed task; `None` if the task was cancelled.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	Some(panic_message(err.into_panic().as_ref()))
}
