/*!
 * Provider implementations for the generation services.
 *
 * This module contains client implementations for the remote APIs:
 * - Anthropic: creative text generation (Messages API)
 * - Gemini: portrait image generation
 * - Mock: scripted collaborators for tests and offline runs
 */

use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Raw HTTP client of one remote API.
///
/// Carries the wire types only; turning answers into stage output or
/// portrait bytes is left to the `generation` collaborators.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Wire body sent to the API
    type Request: Send + Sync;

    /// Wire body returned by the API
    type Response: Send + Sync;

    /// Send one request. Non-2xx statuses map to `ProviderError` variants.
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Cheapest request that proves the key and endpoint work
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Map a failed HTTP status and body to a provider error
pub(crate) fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        429 => ProviderError::RateLimitExceeded(body),
        code => ProviderError::ApiError {
            status_code: code,
            message: body,
        },
    }
}

/// Map a transport error to a provider error
pub(crate) fn transport_error(service: &str, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(format!("{}: {}", service, error))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", service, error))
    }
}

pub mod anthropic;
pub mod gemini;
pub mod mock;
