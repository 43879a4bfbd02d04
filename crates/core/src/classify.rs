//! Classification of raw failures into canonical errors
//!
//! The backend has been seen emitting both `status_code` and `status` as the
//! numeric field of its error payload, so both are accepted. Anything that
//! does not carry one of them next to a string `message` falls back to the
//! generic server error.

use serde_json::Value;

use crate::taxonomy::CanonicalError;

/// A failure as handed over by a caller, before classification
#[derive(Debug, Clone, PartialEq)]
pub enum RawFailure {
    /// A transport-level failure, possibly wrapping a decoded response body
    Transport(TransportFailure),
    /// A value produced by a rejected operation
    Value(Value),
    /// An error raised inside the application itself
    Native {
        message: String,
        stack: Option<String>,
    },
    /// A bare string
    Text(String),
    /// Nothing was provided
    Missing,
}

/// Failed request as reported by the transport layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportFailure {
    /// Transport's own description of the failure
    pub message: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Decoded response body, when one was received
    pub body: Option<Value>,
    /// Trace of the underlying error, logged alongside the failure
    pub stack: Option<String>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
            stack: None,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl RawFailure {
    /// Capture an application error, recording its source chain as the trace
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self::Native {
            message: error.to_string(),
            stack: source_chain(error),
        }
    }

    /// Parse a response body or rejected value given as JSON text
    ///
    /// Text that is not valid JSON is kept as [`RawFailure::Text`].
    pub fn from_json_str(input: &str) -> Self {
        serde_json::from_str(input).map_or_else(|_| Self::Text(input.to_string()), Self::Value)
    }

    /// Trace text attached to an application error
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Native { stack, .. } => stack.as_deref(),
            Self::Transport(failure) => failure.stack.as_deref(),
            Self::Value(_) | Self::Text(_) | Self::Missing => None,
        }
    }

    /// The payload that may carry the backend error shape
    ///
    /// A serialized transport error (`{"response": ...}`) is judged by its
    /// `response.data` only, never by its own top-level fields.
    fn payload(&self) -> Option<&Value> {
        match self {
            Self::Transport(failure) => failure.body.as_ref(),
            Self::Value(value) => value
                .get("response")
                .map_or(Some(value), |response| response.get("data")),
            Self::Native { .. } | Self::Text(_) | Self::Missing => None,
        }
    }
}

impl From<TransportFailure> for RawFailure {
    fn from(failure: TransportFailure) -> Self {
        Self::Transport(failure)
    }
}

impl From<Value> for RawFailure {
    fn from(value: Value) -> Self {
        if value.is_null() {
            Self::Missing
        } else {
            Self::Value(value)
        }
    }
}

impl From<String> for RawFailure {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawFailure {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for RawFailure {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// `caused by:` lines for every source of `error`
pub(crate) fn source_chain(error: &(dyn std::error::Error + 'static)) -> Option<String> {
    let mut chain = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    (!chain.is_empty()).then(|| chain.join("\n"))
}

/// Backend error payload, tagged by which status field it used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendShape<'a> {
    /// `{"status_code": number, "message": string}`
    StatusCode { status: u16, message: &'a str },
    /// `{"status": number, "message": string}`
    Status { status: u16, message: &'a str },
}

impl<'a> BackendShape<'a> {
    /// Try the `status_code` form first, then the `status` form
    pub fn parse(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        let message = object.get("message")?.as_str()?;

        if let Some(status) = object.get("status_code").and_then(status_number) {
            return Some(Self::StatusCode { status, message });
        }
        object
            .get("status")
            .and_then(status_number)
            .map(|status| Self::Status { status, message })
    }

    pub const fn status(&self) -> u16 {
        match self {
            Self::StatusCode { status, .. } | Self::Status { status, .. } => *status,
        }
    }

    pub const fn message(&self) -> &'a str {
        match self {
            Self::StatusCode { message, .. } | Self::Status { message, .. } => message,
        }
    }
}

/// Integral JSON number that fits an HTTP status
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn status_number(value: &Value) -> Option<u16> {
    if let Some(n) = value.as_u64() {
        return u16::try_from(n).ok();
    }
    let n = value.as_f64()?;
    if n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&n) {
        return Some(n as u16);
    }
    None
}

/// Classify a raw failure without translating its message
///
/// Recognized backend payloads keep their status code and message verbatim;
/// everything else becomes the server-error fallback.
pub fn classify(raw: &RawFailure) -> CanonicalError {
    recognize(raw).unwrap_or_else(CanonicalError::server_error)
}

/// Whether a raw failure carries a recognized backend payload
#[cfg(test)]
fn is_recognized(raw: &RawFailure) -> bool {
    raw.payload().and_then(BackendShape::parse).is_some()
}

/// Extract the backend error, or `None` when the shape is not recognized
pub(crate) fn recognize(raw: &RawFailure) -> Option<CanonicalError> {
    let payload = raw.payload()?;
    let shape = BackendShape::parse(payload)?;

    Some(CanonicalError {
        status_code: shape.status(),
        message: shape.message().to_string(),
        details: payload.get("details").filter(|d| !d.is_null()).cloned(),
        request_id: payload
            .get("request_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SERVER_ERROR: &str = "Đã xảy ra lỗi máy chủ. Vui lòng thử lại sau.";

    #[test]
    fn test_status_code_payload_is_recognized() {
        let raw = RawFailure::Value(json!({"status_code": 404, "message": "Tour not found"}));
        let error = classify(&raw);
        assert_eq!(error.status_code, 404);
        assert_eq!(error.message, "Tour not found");
    }

    #[test]
    fn test_status_payload_is_recognized() {
        let raw = RawFailure::Value(json!({"status": 429, "message": "Slow down"}));
        let error = classify(&raw);
        assert_eq!(error.status_code, 429);
        assert_eq!(error.message, "Slow down");
    }

    #[test]
    fn test_status_code_preferred_over_status() {
        let payload = json!({"status_code": 403, "status": 401, "message": "nope"});
        assert_eq!(
            BackendShape::parse(&payload),
            Some(BackendShape::StatusCode {
                status: 403,
                message: "nope"
            })
        );
    }

    #[test]
    fn test_falls_back_to_status_when_status_code_is_not_numeric() {
        let payload = json!({"status_code": "403", "status": 401, "message": "nope"});
        assert_eq!(BackendShape::parse(&payload).map(|s| s.status()), Some(401));
    }

    #[test]
    fn test_transport_body_is_inspected() {
        let failure = TransportFailure::new("Request failed with status code 401")
            .with_status(401)
            .with_body(json!({"status": 401, "message": "Bad credentials"}));
        let error = classify(&RawFailure::Transport(failure));
        assert_eq!(error.status_code, 401);
        assert_eq!(error.message, "Bad credentials");
    }

    #[test]
    fn test_transport_without_body_is_server_error() {
        let failure = TransportFailure::new("Network Error").with_status(401);
        let error = classify(&failure.into());
        assert_eq!(error.status_code, 500);
        assert_eq!(error.message, SERVER_ERROR);
    }

    #[test]
    fn test_wrapped_response_data_is_unwrapped() {
        let raw = RawFailure::Value(json!({
            "message": "Request failed",
            "response": {"data": {"status": 401, "message": "Bad credentials"}}
        }));
        let error = classify(&raw);
        assert_eq!(error.status_code, 401);
        assert_eq!(error.message, "Bad credentials");
    }

    #[test]
    fn test_response_without_data_ignores_outer_fields() {
        let raw = RawFailure::Value(json!({
            "message": "Request failed with status code 401",
            "status": 401,
            "response": {"status": 401}
        }));
        assert!(!is_recognized(&raw));
        assert_eq!(classify(&raw), CanonicalError::new(500, SERVER_ERROR));
    }

    #[test]
    fn test_unrecognized_payloads_fall_back() {
        let cases = vec![
            RawFailure::Missing,
            RawFailure::Text("boom".to_string()),
            RawFailure::Native {
                message: "boom".to_string(),
                stack: None,
            },
            RawFailure::Value(json!({"message": "no status"})),
            RawFailure::Value(json!({"status_code": 400})),
            RawFailure::Value(json!({"status_code": "400", "message": "text status"})),
            RawFailure::Value(json!({"status_code": 400, "message": 12})),
            RawFailure::Value(json!({"status_code": -1, "message": "negative"})),
            RawFailure::Value(json!({"status_code": 400.5, "message": "fractional"})),
            RawFailure::Value(json!({"status_code": 70000, "message": "too large"})),
            RawFailure::Value(json!(["status_code", 400])),
            RawFailure::Value(json!("plain string")),
            RawFailure::Value(json!({"response": {"data": null}})),
        ];

        for raw in cases {
            let error = classify(&raw);
            assert_eq!(error.status_code, 500, "{raw:?}");
            assert_eq!(error.message, SERVER_ERROR, "{raw:?}");
            assert!(!is_recognized(&raw));
        }
    }

    #[test]
    fn test_whole_float_status_is_accepted() {
        let raw = RawFailure::Value(json!({"status": 401.0, "message": "x"}));
        assert_eq!(classify(&raw).status_code, 401);
    }

    #[test]
    fn test_details_and_request_id_survive() {
        let raw = RawFailure::Value(json!({
            "status_code": 400,
            "message": "Validation failed",
            "details": {"email": "must not be blank"},
            "request_id": "req-42"
        }));
        let error = classify(&raw);
        assert_eq!(error.details, Some(json!({"email": "must not be blank"})));
        assert_eq!(error.request_id.as_deref(), Some("req-42"));
    }

    #[test]
    fn test_message_is_not_translated_here() {
        let raw = RawFailure::Value(json!({"status_code": 401, "message": "Bad credentials"}));
        assert_eq!(classify(&raw).message, "Bad credentials");
    }

    #[test]
    fn test_from_json_str() {
        assert_eq!(
            RawFailure::from_json_str(r#"{"status":400,"message":"x"}"#),
            RawFailure::Value(json!({"status": 400, "message": "x"}))
        );
        assert_eq!(
            RawFailure::from_json_str("<html>Bad gateway</html>"),
            RawFailure::Text("<html>Bad gateway</html>".to_string())
        );
        assert_eq!(RawFailure::from(Value::Null), RawFailure::Missing);
        assert_eq!(RawFailure::from(None::<String>), RawFailure::Missing);
    }

    #[test]
    fn test_from_error_records_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("booking failed")]
        struct Outer(#[source] std::io::Error);

        let error = Outer(std::io::Error::other("disk full"));
        let raw = RawFailure::from_error(&error);
        assert_eq!(
            raw,
            RawFailure::Native {
                message: "booking failed".to_string(),
                stack: Some("caused by: disk full".to_string()),
            }
        );
        assert_eq!(raw.stack(), Some("caused by: disk full"));
    }
}
