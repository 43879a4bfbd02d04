//! Error taxonomy and the canonical error shape
//!
//! Every failure that reaches the coordinator leaves it as a
//! [`CanonicalError`]. Its status code is normally one of the [`ErrorCode`]
//! constants, but codes the backend sends outside that set are carried
//! through unchanged.

use serde::{Deserialize, Serialize};

/// Error categories recognized by the portal, matching the backend codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ErrorCode {
    /// Request failed validation (400)
    Validation,
    /// Caller is not authenticated (401)
    AuthenticationFailed,
    /// Caller lacks permission (403)
    PermissionDenied,
    /// Target resource does not exist (404)
    ResourceNotFound,
    /// Too many requests (429)
    RateLimitExceeded,
    /// Anything the backend could not handle, and every unrecognized failure (500)
    ServerError,
}

impl ErrorCode {
    /// All taxonomy codes in ascending order
    pub const ALL: [Self; 6] = [
        Self::Validation,
        Self::AuthenticationFailed,
        Self::PermissionDenied,
        Self::ResourceNotFound,
        Self::RateLimitExceeded,
        Self::ServerError,
    ];

    /// Numeric status code
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::AuthenticationFailed => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::RateLimitExceeded => 429,
            Self::ServerError => 500,
        }
    }

    /// Look up the taxonomy entry for a numeric status code
    pub const fn from_u16(code: u16) -> Option<Self> {
        match code {
            400 => Some(Self::Validation),
            401 => Some(Self::AuthenticationFailed),
            403 => Some(Self::PermissionDenied),
            404 => Some(Self::ResourceNotFound),
            429 => Some(Self::RateLimitExceeded),
            500 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Fixed user-facing message for this category
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Validation => "Vui lòng kiểm tra thông tin và thử lại.",
            Self::AuthenticationFailed => "Bạn cần đăng nhập để truy cập tài nguyên này.",
            Self::PermissionDenied => "Bạn không có quyền thực hiện thao tác này.",
            Self::ResourceNotFound => "Không tìm thấy tài nguyên được yêu cầu.",
            Self::RateLimitExceeded => "Quá nhiều yêu cầu. Vui lòng thử lại sau.",
            Self::ServerError => "Đã xảy ra lỗi máy chủ. Vui lòng thử lại sau.",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.as_u16()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_u16(code).ok_or_else(|| format!("unknown error code {code}"))
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Normalized error handed back to callers and hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (status {status_code})")]
pub struct CanonicalError {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl CanonicalError {
    /// Create an error with an explicit status code and message
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    /// Create an error carrying a taxonomy code and its default message
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.as_u16(), code.default_message())
    }

    /// The fallback used whenever a failure cannot be classified
    pub fn server_error() -> Self {
        Self::from_code(ErrorCode::ServerError)
    }

    /// Taxonomy entry for this error, if the status code is one
    pub const fn code(&self) -> Option<ErrorCode> {
        ErrorCode::from_u16(self.status_code)
    }

    pub const fn is_authentication_error(&self) -> bool {
        self.status_code == ErrorCode::AuthenticationFailed.as_u16()
    }

    /// Default message for this error's code, or the server-error one for codes
    /// outside the taxonomy
    pub fn fallback_message(&self) -> &'static str {
        self.code()
            .unwrap_or(ErrorCode::ServerError)
            .default_message()
    }
}

impl From<ErrorCode> for CanonicalError {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}
