//! Error types for compound database lookups.
//!
//! This module defines structured errors for gateway calls,
//! following the What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Errors that can occur while calling the external compound database.
///
/// A lookup that succeeds but finds nothing is not an error; gateways report
/// it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("cannot reach compound database for '{identifier}': {reason}\n  Suggestion: Check network connectivity and retry")]
    Transport {
        /// The identifier being looked up
        identifier: String,
        /// Why the request failed
        reason: String,
    },

    /// The service answered with a non-success status other than "not found"
    #[error("compound database returned HTTP {status} for '{identifier}'\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// The identifier being looked up
        identifier: String,
        /// The HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response arrived but could not be understood
    #[error("unexpected compound database response for '{identifier}': {reason}\n  Suggestion: The service API may have changed; retry later or report this identifier")]
    Protocol {
        /// The identifier being looked up
        identifier: String,
        /// What was wrong with the response
        reason: String,
    },

    /// The HTTP client could not be constructed
    #[error("HTTP client construction failed for {gateway}: {reason}\n  Suggestion: Check proxy environment variables and TLS configuration")]
    ClientBuild {
        /// Gateway whose client failed to build
        gateway: String,
        /// Why construction failed
        reason: String,
    },
}

impl LookupError {
    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(identifier: &str, reason: &str) -> Self {
        Self::Transport {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `HttpStatus` error with a status-specific suggestion.
    #[must_use]
    pub fn http_status(identifier: &str, status: u16) -> Self {
        let suggestion = match status {
            400 => "Check the identifier syntax; the service rejected it as malformed",
            429 | 503 => "The service is throttling requests; increase the pacing interval",
            s if s >= 500 => "The service is unavailable; try again later",
            _ => "Check the identifier and try again",
        };
        Self::HttpStatus {
            identifier: identifier.to_string(),
            status,
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `Protocol` error.
    #[must_use]
    pub fn protocol(identifier: &str, reason: &str) -> Self {
        Self::Protocol {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(gateway: &str, reason: &str) -> Self {
        Self::ClientBuild {
            gateway: gateway.to_string(),
            reason: reason.to_string(),
        }
    }
}
