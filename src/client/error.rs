//! Error taxonomy for the Mealie client.
//!
//! Transport failures are translated, never swallowed: the transport surfaces
//! [`HttpError`], which the facade wraps as [`ApiError::Internal`] so callers
//! never see a raw `reqwest` error. Parse failures propagate unchanged.

use thiserror::Error;

/// A transport-level failure: connection refused, timeout, or a response body
/// that could not be read or decoded as JSON. Raised by the HTTP transport
/// only; HTTP error statuses are not transport failures.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// A response body whose shape did not match the expected schema.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// Errors surfaced by the API facade.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure surfaced at the facade boundary.
    #[error("internal client error: {0}")]
    Internal(#[from] HttpError),
    /// The server answered with a non-2xx status.
    #[error("api request failed with status {status_code}")]
    Api { status_code: u16 },
    /// The response decoded but did not match the expected schema.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An authenticated call was attempted before any token was stored.
    #[error("no access token available")]
    NoToken,
}

/// Outcome of a refresh cycle, mapped from [`ApiError`] by the updater.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The token refresh was rejected by the server; credentials are needed.
    #[error("token refresh rejected, re-authentication required")]
    AuthRequired(#[source] ApiError),
    /// Any other failure during the refresh cycle.
    #[error("sensor refresh failed")]
    Failed(#[source] ApiError),
}
