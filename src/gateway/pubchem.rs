//! PubChem gateway - resolves identifiers via the PubChem PUG-REST API.
//!
//! The [`PubChemGateway`] queries the compound property endpoint for names,
//! CIDs, and SMILES strings, and the SDF endpoint for 3D structure records.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::IdentifierKind;

use super::http_client::build_gateway_http_client;
use super::{CompoundGateway, LookupError, RawCompoundData};

/// Default PubChem PUG-REST base URL.
pub const DEFAULT_PUBCHEM_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Properties requested for every compound, in PUG-REST naming.
const PROPERTY_LIST: &str = "IUPACName,SMILES,MolecularWeight,MolecularFormula,XLogP,HBondDonorCount,HBondAcceptorCount";

// ==================== PUG-REST Response Types ====================

/// Top-level property endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    pub property_table: Option<PropertyTable>,
}

/// The `PropertyTable` object.
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyTable {
    #[serde(rename = "Properties", default)]
    pub properties: Vec<CompoundProperties>,
}

/// One entry of `PropertyTable.Properties`.
#[derive(Debug, Deserialize)]
pub(crate) struct CompoundProperties {
    #[serde(rename = "CID")]
    pub cid: u64,
    #[serde(rename = "IUPACName")]
    pub iupac_name: Option<String>,
    #[serde(rename = "SMILES")]
    pub smiles: Option<String>,
    #[serde(rename = "CanonicalSMILES")]
    pub canonical_smiles: Option<String>,
    #[serde(rename = "IsomericSMILES")]
    pub isomeric_smiles: Option<String>,
    #[serde(rename = "MolecularWeight")]
    pub molecular_weight: Option<NumberOrString>,
    #[serde(rename = "MolecularFormula")]
    pub molecular_formula: Option<String>,
    #[serde(rename = "XLogP")]
    pub xlogp: Option<f64>,
    #[serde(rename = "HBondDonorCount")]
    pub h_bond_donor_count: Option<u32>,
    #[serde(rename = "HBondAcceptorCount")]
    pub h_bond_acceptor_count: Option<u32>,
}

/// PUG-REST reports `MolecularWeight` as a string; older responses used a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    /// The value as the service wrote it (`"32.00"` stays `32.00`); text that is
    /// not a number is dropped.
    fn into_reported_text(self) -> Option<String> {
        match self {
            Self::Number(value) => Some(value.to_string()),
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<f64>().is_ok().then(|| text.to_string())
            }
        }
    }
}

impl PropertyResponse {
    /// Takes the first listed compound; an empty or absent table yields `None`.
    fn into_first_compound(self) -> Option<CompoundProperties> {
        self.property_table?.properties.into_iter().next()
    }
}

impl CompoundProperties {
    fn into_raw(self) -> RawCompoundData {
        let molecular_mass = self
            .molecular_weight
            .and_then(NumberOrString::into_reported_text);
        RawCompoundData {
            database_id: self.cid,
            name: self.iupac_name,
            structural_notation: self
                .smiles
                .or(self.canonical_smiles)
                .or(self.isomeric_smiles),
            molecular_mass,
            molecular_formula: self.molecular_formula,
            log_p: self.xlogp,
            hydrogen_donor_count: self.h_bond_donor_count,
            hydrogen_acceptor_count: self.h_bond_acceptor_count,
        }
    }
}

// ==================== PubChemGateway ====================

/// Compound gateway backed by the PubChem PUG-REST API.
///
/// Identifiers are routed to the `cid`, `smiles`, or `name` input namespace by
/// their [`IdentifierKind`] and embedded as a single percent-encoded path segment.
pub struct PubChemGateway {
    client: Client,
    base_url: String,
}

impl PubChemGateway {
    /// Creates a gateway for the public PubChem endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if HTTP client construction fails.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(DEFAULT_PUBCHEM_BASE_URL)
    }

    /// Creates a gateway with a custom base URL (mirrors, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if HTTP client construction fails.
    #[tracing::instrument(skip_all)]
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: build_gateway_http_client("pubchem")?,
            base_url,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn property_url(&self, identifier: &str, kind: IdentifierKind) -> String {
        format!(
            "{}/compound/{}/{}/property/{}/JSON",
            self.base_url,
            kind.namespace(),
            urlencoding::encode(identifier),
            PROPERTY_LIST
        )
    }

    fn structure_url(&self, database_id: u64) -> String {
        format!(
            "{}/compound/cid/{}/SDF?record_type=3d",
            self.base_url, database_id
        )
    }
}

impl std::fmt::Debug for PubChemGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubChemGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompoundGateway for PubChemGateway {
    fn name(&self) -> &str {
        "pubchem"
    }

    #[tracing::instrument(skip(self, kind), fields(gateway = "pubchem", kind = %kind))]
    async fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<RawCompoundData>, LookupError> {
        let url = self.property_url(identifier, kind);
        debug!(api_url = %url, "Calling PubChem property API");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "PubChem property request failed");
                LookupError::transport(identifier, &e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("PubChem reported no matching compound");
            return Ok(None);
        }
        if !status.is_success() {
            debug!(status = status.as_u16(), "PubChem property API error");
            return Err(LookupError::http_status(identifier, status.as_u16()));
        }

        let body = response.json::<PropertyResponse>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse PubChem property JSON");
            LookupError::protocol(identifier, "property response was not valid PUG-REST JSON")
        })?;

        let compound = body.into_first_compound().map(CompoundProperties::into_raw);
        if let Some(compound) = &compound {
            debug!(cid = compound.database_id, "PubChem matched compound");
        }
        Ok(compound)
    }

    #[tracing::instrument(skip(self), fields(gateway = "pubchem"))]
    async fn fetch_structure_3d(&self, database_id: u64) -> Result<Option<Vec<u8>>, LookupError> {
        let url = self.structure_url(database_id);
        let label = database_id.to_string();
        debug!(api_url = %url, "Calling PubChem SDF API");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "PubChem SDF request failed");
            LookupError::transport(&label, &e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("PubChem has no 3D record for compound");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::http_status(&label, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::transport(&label, &e.to_string()))?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body.to_vec()))
    }
}
