//! API wrapper utilities routing failures through the error coordinator

use serde::de::DeserializeOwned;
use travollo_core::{CanonicalError, ErrorContext, ErrorCoordinator, RawFailure, transport};

/// Await an API call and hand any failure to `coordinator`
///
/// # Errors
///
/// Returns the canonical form of the failure after the coordinator has run
/// its hooks
pub async fn with_error_handling<T, F>(
    coordinator: &ErrorCoordinator,
    context: Option<&ErrorContext>,
    api_call: F,
) -> Result<T, CanonicalError>
where
    F: Future<Output = Result<T, RawFailure>>,
{
    coordinator.intercept(api_call.await, context)
}

/// Send `request` and decode a JSON body, handling any failure
///
/// # Errors
///
/// Returns the canonical error for network failures, non-success responses
/// and undecodable bodies
pub async fn fetch_json<T: DeserializeOwned>(
    coordinator: &ErrorCoordinator,
    context: Option<&ErrorContext>,
    request: reqwest::RequestBuilder,
) -> Result<T, CanonicalError> {
    with_error_handling(coordinator, context, transport::send_json(request)).await
}
