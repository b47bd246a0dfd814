//! Value types produced by a batch pass.

use std::time::Duration;

use serde::Serialize;

use crate::gateway::RawCompoundData;

/// A resolved compound.
///
/// Created only from a successful lookup and never mutated afterwards. The
/// serialized field names match the exported table header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeRecord {
    #[serde(rename = "name")]
    display_name: String,
    #[serde(rename = "cid")]
    database_id: u64,
    #[serde(rename = "smiles")]
    structural_notation: Option<String>,
    molecular_mass: Option<String>,
    molecular_formula: Option<String>,
    #[serde(rename = "logP")]
    log_p: Option<f64>,
    #[serde(rename = "H_donor_atoms")]
    hydrogen_donor_count: Option<u32>,
    #[serde(rename = "H_acceptor_atoms")]
    hydrogen_acceptor_count: Option<u32>,
}

impl MoleculeRecord {
    /// Builds a record from gateway data.
    ///
    /// When the database has no preferred name, `identifier` (the string that was
    /// looked up) becomes the display name.
    #[must_use]
    pub fn from_raw(raw: RawCompoundData, identifier: &str) -> Self {
        let display_name = raw
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| identifier.to_string());
        Self {
            display_name,
            database_id: raw.database_id,
            structural_notation: raw.structural_notation,
            molecular_mass: raw.molecular_mass,
            molecular_formula: raw.molecular_formula,
            log_p: raw.log_p,
            hydrogen_donor_count: raw.hydrogen_donor_count,
            hydrogen_acceptor_count: raw.hydrogen_acceptor_count,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn database_id(&self) -> u64 {
        self.database_id
    }

    #[must_use]
    pub fn structural_notation(&self) -> Option<&str> {
        self.structural_notation.as_deref()
    }

    /// Molecular mass in g/mol, exactly as reported by the database.
    #[must_use]
    pub fn molecular_mass(&self) -> Option<&str> {
        self.molecular_mass.as_deref()
    }

    /// [`MoleculeRecord::molecular_mass`] parsed as a number.
    #[must_use]
    pub fn molecular_mass_value(&self) -> Option<f64> {
        self.molecular_mass.as_deref()?.parse().ok()
    }

    #[must_use]
    pub fn molecular_formula(&self) -> Option<&str> {
        self.molecular_formula.as_deref()
    }

    #[must_use]
    pub fn log_p(&self) -> Option<f64> {
        self.log_p
    }

    #[must_use]
    pub fn hydrogen_donor_count(&self) -> Option<u32> {
        self.hydrogen_donor_count
    }

    #[must_use]
    pub fn hydrogen_acceptor_count(&self) -> Option<u32> {
        self.hydrogen_acceptor_count
    }
}

/// An identifier that produced no record (no match or lookup error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedIdentifier {
    raw: String,
}

impl FailedIdentifier {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The identifier exactly as it appeared in the input.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Emitted once per processed identifier, success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Identifiers processed so far, starting at 1.
    pub completed_count: usize,
    /// Identifiers in this pass after the batch cap.
    pub total_count: usize,
}

impl ProgressEvent {
    /// Completed fraction in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total_count == 0 {
            return 1.0;
        }
        self.completed_count as f64 / self.total_count as f64
    }
}

/// Outcome of one batch pass, owned by the caller.
///
/// `records` and `failed` are each in input order. Every processed identifier is in
/// exactly one of them, so `records().len() + failed().len() == completed_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    records: Vec<MoleculeRecord>,
    failed: Vec<FailedIdentifier>,
    elapsed: Duration,
    total_count: usize,
    dropped_count: usize,
    interrupted: bool,
}

impl BatchResult {
    pub(crate) fn new(
        records: Vec<MoleculeRecord>,
        failed: Vec<FailedIdentifier>,
        elapsed: Duration,
        total_count: usize,
        dropped_count: usize,
        interrupted: bool,
    ) -> Self {
        Self {
            records,
            failed,
            elapsed,
            total_count,
            dropped_count,
            interrupted,
        }
    }

    /// An empty, complete result for a pass with no identifiers.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Duration::ZERO, 0, 0, false)
    }

    #[must_use]
    pub fn records(&self) -> &[MoleculeRecord] {
        &self.records
    }

    #[must_use]
    pub fn failed(&self) -> &[FailedIdentifier] {
        &self.failed
    }

    /// Wall-clock duration of the whole pass.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Identifiers scheduled for this pass (after the batch cap).
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Identifiers actually processed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.records.len() + self.failed.len()
    }

    /// Identifiers silently dropped by the batch cap.
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped_count
    }

    /// Whether the pass was cancelled before processing every identifier.
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_count() == self.total_count
    }
}
