//! End-to-end behavior of the error coordinator

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use travollo_core::translate::INVALID_CREDENTIALS_MESSAGE;
use travollo_core::{
    CanonicalError, ConfigPatch, ErrorContext, ErrorCoordinator, RawFailure, RenderInfo,
    TransportFailure, classify, translate,
};

const SERVER_ERROR: &str = "Đã xảy ra lỗi máy chủ. Vui lòng thử lại sau.";

fn counting_auth_hook(coordinator: &ErrorCoordinator) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    coordinator.configure(
        ConfigPatch::new().on_authentication_error(move |_| counter.set(counter.get() + 1)),
    );
    count
}

#[test]
fn test_wrapped_bad_credentials_response() {
    let coordinator = ErrorCoordinator::new();
    let auth_calls = counting_auth_hook(&coordinator);

    let raw = RawFailure::Value(json!({
        "response": {"data": {"status": 401, "message": "Bad credentials"}}
    }));
    let error = coordinator.handle(&raw, None);

    assert_eq!(
        error,
        CanonicalError::new(401, "Thông tin đăng nhập không đúng. Vui lòng thử lại.")
    );
    assert_eq!(auth_calls.get(), 1);
}

#[test]
fn test_transport_error_without_response_data_is_not_an_auth_failure() {
    let coordinator = ErrorCoordinator::new();
    let auth_calls = counting_auth_hook(&coordinator);

    let raw = RawFailure::Value(json!({
        "message": "Request failed with status code 401",
        "status": 401,
        "response": {"status": 401}
    }));
    let error = coordinator.handle(&raw, None);

    assert_eq!(error, CanonicalError::new(500, SERVER_ERROR));
    assert_eq!(auth_calls.get(), 0);
}

#[test]
fn test_native_error_without_response() {
    let coordinator = ErrorCoordinator::new();
    let error = coordinator.handle(
        &RawFailure::Native {
            message: "boom".to_string(),
            stack: Some("at main".to_string()),
        },
        None,
    );
    assert_eq!(error, CanonicalError::new(500, SERVER_ERROR));
}

#[test]
fn test_repeated_auth_failures_are_not_deduplicated() {
    let coordinator = ErrorCoordinator::new();
    let auth_calls = counting_auth_hook(&coordinator);
    let raw = RawFailure::Transport(
        TransportFailure::new("Request failed with status code 401")
            .with_status(401)
            .with_body(json!({"status_code": 401, "message": "Token expired"})),
    );

    let first = coordinator.handle(&raw, None);
    let second = coordinator.handle(&raw, None);

    assert_eq!(first, second);
    assert_eq!(auth_calls.get(), 2);
}

#[test]
fn test_handle_never_panics() {
    let coordinator = ErrorCoordinator::new();
    coordinator.configure(
        ConfigPatch::new()
            .console_logging(true)
            .on_authentication_error(|_| panic!("auth hook"))
            .on_error(|_, _| panic!("error hook")),
    );
    coordinator.set_toast_sink(|_, _| panic!("toast"));

    let inputs = [
        RawFailure::Missing,
        RawFailure::Value(json!(null)),
        RawFailure::Value(json!({"response": {"data": {"status": 401, "message": "x"}}})),
        RawFailure::Value(json!({"response": "not an object"})),
        RawFailure::Text(String::new()),
    ];
    for raw in &inputs {
        let error = coordinator.handle(raw, Some(&ErrorContext::operation("fuzz")));
        assert!(!error.message.is_empty());
    }
}

#[test]
fn test_merge_keeps_hooks() {
    let coordinator = ErrorCoordinator::new();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    coordinator.configure(
        ConfigPatch::new()
            .on_error(move |error, _| sink.borrow_mut().push(error.status_code))
            .on_authentication_error(|_| {}),
    );

    coordinator.configure(ConfigPatch::new().console_logging(true));
    coordinator.configure(ConfigPatch::new().toast_notifications(false));

    let config = coordinator.config();
    assert!(config.enable_console_logging);
    assert!(!config.enable_toast_notifications);
    assert!(config.on_authentication_error.is_some());

    coordinator.handle(&RawFailure::Value(json!({"status": 404, "message": "Tour not found"})), None);
    assert_eq!(*errors.borrow(), vec![404]);
}

#[test]
fn test_classification_is_stable_across_calls() {
    let coordinator = ErrorCoordinator::new();
    let raw = RawFailure::Value(json!({"status_code": 400, "message": "Username is already in use"}));
    let first = coordinator.handle(&raw, None);
    let second = coordinator.handle(&raw, None);
    assert_eq!(first, second);
    assert_eq!(first.message, "Tên đăng nhập đã tồn tại");
}

#[test]
fn test_classify_does_not_translate_but_handle_does() {
    let raw = RawFailure::Value(json!({"status_code": 401, "message": "Email not found"}));
    assert_eq!(classify(&raw).message, "Email not found");
    assert_eq!(
        ErrorCoordinator::new().handle(&raw, None).message,
        INVALID_CREDENTIALS_MESSAGE
    );
}

#[test]
fn test_translated_message_is_stable() {
    let message = ErrorCoordinator::new()
        .handle(
            &RawFailure::Value(json!({"status": 400, "message": "Verification code has expired"})),
            None,
        )
        .message;
    assert_eq!(translate(&message), message);
}

#[test]
fn test_render_failure_reports_through_generic_hook() {
    let coordinator = ErrorCoordinator::new();
    let auth_calls = counting_auth_hook(&coordinator);
    let reports = Rc::new(Cell::new(0));
    let counter = reports.clone();
    coordinator.configure(ConfigPatch::new().on_error(move |error, context| {
        assert_eq!(error.status_code, 500);
        assert_eq!(
            context.and_then(|c| c.operation.as_deref()),
            Some("error_boundary")
        );
        counter.set(counter.get() + 1);
    }));

    coordinator.handle_render_failure(
        &RawFailure::Native {
            message: "index out of bounds".to_string(),
            stack: None,
        },
        &RenderInfo::new("in TourList\nin App"),
    );

    assert_eq!(reports.get(), 1);
    assert_eq!(auth_calls.get(), 0);
}
