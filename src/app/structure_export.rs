//! Saves 3D structure files for resolved records on request.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use chemly_core::{MoleculeRecord, StructureFetcher};
use tracing::{debug, info, warn};

/// Counts from one structure export pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StructureExportSummary {
    pub(crate) saved: Vec<PathBuf>,
    pub(crate) unavailable: usize,
}

/// Picks the records whose CID or display name matches one of `selectors`
/// (names compared case-insensitively). No selectors picks every record.
pub(crate) fn select_records(
    records: &[MoleculeRecord],
    selectors: &[String],
) -> Vec<MoleculeRecord> {
    if selectors.is_empty() {
        return records.to_vec();
    }
    let selectors: Vec<&str> = selectors.iter().map(|s| s.trim()).collect();
    for selector in &selectors {
        if !records.iter().any(|record| matches_selector(record, selector)) {
            warn!(selector = %selector, "no resolved compound matches structure selector");
        }
    }
    records
        .iter()
        .filter(|record| selectors.iter().any(|selector| matches_selector(record, selector)))
        .cloned()
        .collect()
}

fn matches_selector(record: &MoleculeRecord, selector: &str) -> bool {
    selector == record.database_id().to_string()
        || selector.eq_ignore_ascii_case(record.display_name())
}

/// Fetches and saves one SDF file per record into `dir`.
///
/// Records without 3D data are counted, not treated as errors. Stops early once
/// `interrupted` is set.
pub(crate) async fn export_structures(
    fetcher: &StructureFetcher,
    records: &[MoleculeRecord],
    dir: &Path,
    interrupted: &AtomicBool,
) -> Result<StructureExportSummary> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create structure directory '{}'", dir.display()))?;

    let mut summary = StructureExportSummary::default();
    for record in records {
        if interrupted.load(Ordering::SeqCst) {
            warn!("structure export interrupted");
            break;
        }
        let Some(payload) = fetcher.fetch_interruptible(record, interrupted).await else {
            if interrupted.load(Ordering::SeqCst) {
                warn!("structure export interrupted");
                break;
            }
            debug!(cid = record.database_id(), "no 3D structure available");
            summary.unavailable += 1;
            continue;
        };
        let path = payload.save_into(dir).await.with_context(|| {
            format!(
                "Failed to save structure file '{}' in '{}'",
                payload.file_name(),
                dir.display()
            )
        })?;
        summary.saved.push(path);
    }

    info!(
        saved = summary.saved.len(),
        unavailable = summary.unavailable,
        dir = %dir.display(),
        "Structure export complete"
    );
    Ok(summary)
}
