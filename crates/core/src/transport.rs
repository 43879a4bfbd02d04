//! Conversion of `reqwest` failures into raw failures

use reqwest::Response;
use serde_json::Value;

use crate::classify::{RawFailure, TransportFailure, source_chain};

impl TransportFailure {
    /// Capture a non-success response together with its body
    ///
    /// JSON bodies are decoded; anything else is kept as a JSON string so the
    /// classifier sees it and falls back to the server error.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let message = format!("Request failed with status code {}", status.as_u16());
        let body = match response.text().await {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(serde_json::from_str(&text).unwrap_or(Value::String(text))),
            Err(err) => {
                tracing::debug!(error = %err, "Failed to read error response body");
                None
            }
        };

        Self {
            message,
            status: Some(status.as_u16()),
            body,
            stack: None,
        }
    }

    /// Capture a request that never produced a readable response
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        Self {
            message: error.to_string(),
            status: error.status().map(|s| s.as_u16()),
            body: None,
            stack: source_chain(error),
        }
    }
}

impl From<reqwest::Error> for RawFailure {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(TransportFailure::from_reqwest(&error))
    }
}

/// Turn a non-success response into a raw failure
///
/// # Errors
///
/// Returns [`RawFailure::Transport`] for any status outside 2xx
pub async fn ensure_success(response: Response) -> Result<Response, RawFailure> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(TransportFailure::from_response(response).await.into())
    }
}

/// Send a request and decode a JSON response, turning every failure into a
/// raw failure
///
/// # Errors
///
/// Returns a [`RawFailure`] when the request fails, the status is not 2xx, or
/// the body does not decode
pub async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, RawFailure> {
    let response = ensure_success(request.send().await?).await?;
    Ok(response.json().await?)
}
