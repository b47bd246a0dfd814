//! On-demand 3D structure fetch for resolved records.
//!
//! Structure payloads are never fetched during a batch pass. Callers ask for one
//! explicitly, keyed by a record's database id; no result is cached.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::{debug, instrument, warn};

use crate::batch::{MoleculeRecord, PacingGate};
use crate::gateway::CompoundGateway;

/// File extension for structure artifacts.
pub const STRUCTURE_FILE_EXTENSION: &str = "sdf";

/// MIME type for structure artifacts.
pub const STRUCTURE_MIME_TYPE: &str = "chemical/x-mdl-sdfile";

/// Longest display-name prefix kept in an artifact file name.
const MAX_NAME_COMPONENT_CHARS: usize = 100;

/// Name stem used when a display name has no usable characters.
const FALLBACK_NAME_COMPONENT: &str = "compound";

/// A structure payload ready to be saved or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructurePayload {
    file_name: String,
    bytes: Vec<u8>,
}

impl StructurePayload {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        STRUCTURE_MIME_TYPE
    }

    /// Writes the payload into `dir` and returns the full path.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be written.
    pub async fn save_into(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "saved structure payload");
        Ok(path)
    }
}

/// Fetches the 3D structure for an already-resolved record.
///
/// Returns `None` when the database has no 3D data, when the lookup fails, or when
/// the record carries no database id. The reason is logged but never returned.
#[instrument(skip(gateway, record), fields(cid = record.database_id()))]
pub async fn fetch_structure_for(
    gateway: &dyn CompoundGateway,
    record: &MoleculeRecord,
) -> Option<StructurePayload> {
    if record.database_id() == 0 {
        debug!("record has no database id; skipping structure fetch");
        return None;
    }

    match gateway.fetch_structure_3d(record.database_id()).await {
        Ok(Some(bytes)) => Some(StructurePayload {
            file_name: structure_file_name(record),
            bytes,
        }),
        Ok(None) => {
            debug!("no 3D structure available");
            None
        }
        Err(e) => {
            warn!(error = %e, "3D structure fetch failed");
            None
        }
    }
}

/// Artifact name `{name}_{databaseId}.sdf`, with the name made filesystem-safe.
#[must_use]
pub fn structure_file_name(record: &MoleculeRecord) -> String {
    let mut stem = sanitize_name_component(record.display_name());
    if stem.is_empty() {
        stem = FALLBACK_NAME_COMPONENT.to_string();
    }
    format!(
        "{stem}_{}.{STRUCTURE_FILE_EXTENSION}",
        record.database_id()
    )
}

fn sanitize_name_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars().take(MAX_NAME_COMPONENT_CHARS) {
        let mapped = match ch {
            c if c.is_alphanumeric() || matches!(c, '-' | '.') => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_matches(['_', '.']).to_string()
}

/// Fetches structures on demand through the same pacing gate as lookups.
///
/// Use this when structure requests follow a batch pass against the same service,
/// so the combined call rate stays within the pacing interval.
#[derive(Clone)]
pub struct StructureFetcher {
    gateway: Arc<dyn CompoundGateway>,
    pacing: Arc<PacingGate>,
}

impl std::fmt::Debug for StructureFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureFetcher")
            .field("gateway", &self.gateway.name())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl StructureFetcher {
    #[must_use]
    pub fn new(gateway: Arc<dyn CompoundGateway>, pacing: Arc<PacingGate>) -> Self {
        Self { gateway, pacing }
    }

    /// Waits for the pacing gate, then fetches like [`fetch_structure_for`].
    pub async fn fetch(&self, record: &MoleculeRecord) -> Option<StructurePayload> {
        self.fetch_interruptible(record, &AtomicBool::new(false)).await
    }

    /// Like [`StructureFetcher::fetch`], but returns `None` without calling the
    /// gateway once `interrupted` is set, including while waiting for the gate.
    pub async fn fetch_interruptible(
        &self,
        record: &MoleculeRecord,
        interrupted: &AtomicBool,
    ) -> Option<StructurePayload> {
        if record.database_id() == 0 {
            return None;
        }
        self.pacing.acquire_unless(interrupted).await?;
        fetch_structure_for(self.gateway.as_ref(), record).await
    }
}
