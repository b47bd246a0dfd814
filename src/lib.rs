//! Chemly Core Library
//!
//! This library resolves batches of chemical identifiers (compound names,
//! PubChem CIDs, SMILES strings) into normalized molecular records by
//! querying an external chemical database under a fixed pacing budget.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Tokenization, deduplication, and classification of raw input
//! - [`gateway`] - External lookup gateway trait and the PubChem PUG-REST client
//! - [`batch`] - Paced batch resolution with progress, failure, and cancellation handling
//! - [`table`] - Fixed-column tabular projection of resolved records
//! - [`structure`] - On-demand 3D structure fetch for resolved records

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod gateway;
pub mod parser;
pub mod structure;
pub mod table;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use batch::{
    BatchError, BatchResolver, BatchResult, DEFAULT_PACING_INTERVAL, FailedIdentifier,
    MAX_BATCH_SIZE, MAX_CONCURRENCY, MIN_CONCURRENCY, MoleculeRecord, PacingGate, ProgressEvent,
};
pub use gateway::{
    CompoundGateway, DEFAULT_PUBCHEM_BASE_URL, LookupError, PubChemGateway, RawCompoundData,
    configure_gateway_http_timeouts,
};
pub use parser::{IdentifierKind, IdentifierToken, KindCounts, ResolutionInput, classify, tokenize};
pub use structure::{
    STRUCTURE_FILE_EXTENSION, STRUCTURE_MIME_TYPE, StructureFetcher, StructurePayload,
    fetch_structure_for, structure_file_name,
};
pub use table::{COLUMN_COUNT, ResultTable, TABLE_COLUMNS, records_to_json, to_table};
