use super::{join_error_panic_message, panic_message};

#[tokio::test]
async fn extracts_static_str_payload() {
	let handle = tokio::spawn(async { panic!("boom-str") });
	let err = handle.await.unwrap_err();
	let msg = join_error_panic_message(err).expect("should be a panic");
	assert!(msg.contains("boom-str"), "expected 'boom-str', got: {msg}");
}

#[tokio::test]
async fn extracts_string_payload() {
	let handle = tokio::spawn(async { panic!("{}", String::from("boom-string")) });
	let err = handle.await.unwrap_err();
	let msg = join_error_panic_message(err).expect("should be a panic");
	assert!(msg.contains("boom-string"), "expected 'boom-string', got: {msg}");
}

#[tokio::test]
async fn returns_none_for_cancellation() {
	let handle = tokio::spawn(std::future::pending::<()>());
	handle.abort();
	let err = handle.await.unwrap_err();
	assert!(join_error_panic_message(err).is_none(), "cancelled task should return None");
}

#[test]
fn thread_payloads_use_the_same_extraction() {
	let payload = std::thread::spawn(|| -> () { std::panic::panic_any(42_u32) }).join().unwrap_err();
	assert_eq!(panic_message(payload.as_ref()), "panic with a non-string payload");
}
