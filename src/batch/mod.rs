//! Paced batch resolution.
//!
//! This module drives the gateway over a whole [`ResolutionInput`](crate::parser::ResolutionInput):
//! it caps the batch, paces every lookup start through a shared [`PacingGate`],
//! reports progress, and partitions outcomes into resolved records and failed
//! identifiers.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chemly_core::batch::{BatchResolver, PacingGate, DEFAULT_PACING_INTERVAL};
//! use chemly_core::gateway::PubChemGateway;
//! use chemly_core::parser::tokenize;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = BatchResolver::new(
//!     Arc::new(PubChemGateway::new()?),
//!     Arc::new(PacingGate::new(DEFAULT_PACING_INTERVAL)),
//! );
//! let result = resolver
//!     .run(tokenize("Aspirin|2244"), |event| {
//!         eprintln!("{}/{}", event.completed_count, event.total_count);
//!     })
//!     .await;
//! println!("{} resolved, {} failed", result.records().len(), result.failed().len());
//! # Ok(())
//! # }
//! ```

mod pacing;
mod record;
mod resolver;

pub use pacing::PacingGate;
pub use record::{BatchResult, FailedIdentifier, MoleculeRecord, ProgressEvent};
pub use resolver::{
    BatchResolver, DEFAULT_PACING_INTERVAL, MAX_BATCH_SIZE, MAX_CONCURRENCY, MIN_CONCURRENCY,
};

use thiserror::Error;

/// Errors raised while setting up a batch pass.
///
/// Per-identifier failures are never errors; they are collected in
/// [`BatchResult::failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Worker count outside the supported range
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}\n  Suggestion: The compound database tolerates only a few parallel lookups; use 1-4"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided
        value: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_invalid_concurrency_message() {
        let msg = BatchError::InvalidConcurrency { value: 9 }.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("between 1 and 4"));
        assert!(msg.contains("Suggestion"));
    }
}
