//! External lookup gateway for the chemical database.
//!
//! The gateway is a thin abstraction over the third-party service: it turns one
//! identifier into at most one compound's raw attributes, and one database id
//! into a 3D structure payload. It owns no business logic. Retry, caching,
//! batching, and pacing are not implemented here; pacing belongs to
//! [`crate::batch::BatchResolver`].
//!
//! # Architecture
//!
//! - [`CompoundGateway`] - Async trait the batch resolver and structure fetch depend on
//! - [`PubChemGateway`] - PubChem PUG-REST implementation
//! - [`RawCompoundData`] - Attributes of a single matched compound
//! - [`LookupError`] - Transport/protocol failures (distinct from "no match")
//!
//! # Example
//!
//! ```no_run
//! use chemly_core::gateway::{CompoundGateway, PubChemGateway};
//! use chemly_core::parser::IdentifierKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = PubChemGateway::new()?;
//! if let Some(compound) = gateway.resolve("aspirin", IdentifierKind::Name).await? {
//!     println!("CID {}: {:?}", compound.database_id, compound.molecular_formula);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod pubchem;

pub use error::LookupError;
pub use http_client::configure_gateway_http_timeouts;
pub use pubchem::{DEFAULT_PUBCHEM_BASE_URL, PubChemGateway};

use async_trait::async_trait;

use crate::parser::IdentifierKind;

/// Raw attributes of one compound as returned by the database.
///
/// Values are passed through unmodified; any attribute the service omits is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompoundData {
    /// Database-assigned compound id (PubChem CID).
    pub database_id: u64,
    /// Preferred display name (IUPAC name).
    pub name: Option<String>,
    /// Line-notation structure (SMILES).
    pub structural_notation: Option<String>,
    /// Molecular mass in g/mol, as the service wrote it (e.g. `"180.16"`).
    pub molecular_mass: Option<String>,
    /// Molecular formula, e.g. `C9H8O4`.
    pub molecular_formula: Option<String>,
    /// Computed partition coefficient (XLogP).
    pub log_p: Option<f64>,
    /// Hydrogen-bond donor count.
    pub hydrogen_donor_count: Option<u32>,
    /// Hydrogen-bond acceptor count.
    pub hydrogen_acceptor_count: Option<u32>,
}

impl RawCompoundData {
    /// Creates data carrying only a database id; other attributes are absent.
    #[must_use]
    pub fn with_id(database_id: u64) -> Self {
        Self {
            database_id,
            name: None,
            structural_notation: None,
            molecular_mass: None,
            molecular_formula: None,
            log_p: None,
            hydrogen_donor_count: None,
            hydrogen_acceptor_count: None,
        }
    }
}

/// Trait that all compound database gateways implement.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the batch resolver can hold an
/// `Arc<dyn CompoundGateway>` and share it across worker tasks.
#[async_trait]
pub trait CompoundGateway: Send + Sync {
    /// Returns the gateway's name (e.g., "pubchem").
    fn name(&self) -> &str;

    /// Looks up at most one compound for `identifier` using the namespace of `kind`.
    ///
    /// Returns `Ok(None)` when the service has no match. An empty result list and an
    /// absent result are both `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport or protocol failure.
    async fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<RawCompoundData>, LookupError>;

    /// Fetches a 3D structure payload (SDF) for a database id.
    ///
    /// Returns `Ok(None)` when the service has no 3D data for the compound.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport or protocol failure.
    async fn fetch_structure_3d(&self, database_id: u64) -> Result<Option<Vec<u8>>, LookupError>;
}
