//! Error types for client operations.
//!
//! Every failure surfaces to the direct caller; nothing is retried or
//! logged-and-swallowed at this layer. The one deliberate exception to
//! 403-as-error is the permission-check wrapper, which converts the denial
//! shape into [`CheckOutcome::Denied`](crate::check::CheckOutcome) data
//! instead; see the `check` module.

use stamps_model::ErrorObject;
use thiserror::Error;

/// Stamps client errors.
#[derive(Debug, Error)]
pub enum StampsError {
    /// HTTP request failed (network error, timeout, ...).
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// A by-id fetch yielded no result.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Wire type name of the kind.
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The service refused the operation (403).
    ///
    /// Carries the parsed error objects from the response body (possibly
    /// empty; the service sends bare 403s for some operations) so callers
    /// can inspect title/detail/identifier lists.
    #[error("access denied by the service")]
    AccessDenied {
        /// Error objects from the response body.
        errors: Vec<ErrorObject>,
    },

    /// API returned an unexpected error status.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message or body text from the API.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The action name is not declared in the kind's action table.
    #[error("unknown custom action `{action}` for {kind}")]
    UnknownAction {
        /// Wire type name of the kind.
        kind: &'static str,
        /// The undeclared action name.
        action: String,
    },

    /// A member operation was invoked on a resource with no id.
    #[error("{0} resource has no id")]
    MissingId(&'static str),
}
