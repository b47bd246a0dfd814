//! Build the gateway and resolver, then run the batch pass with progress.
//!
//! Raw identifiers are logged only at debug level; info-level logs carry counts.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use chemly_core::{
    BatchResolver, BatchResult, CompoundGateway, DEFAULT_PUBCHEM_BASE_URL, PacingGate,
    PubChemGateway, ResolutionInput, StructureFetcher,
};
use tracing::{debug, info};

use crate::app::progress_manager::ProgressReporter;
use crate::app::validation;
use crate::cli::Args;

/// Shared collaborators for one run: the gateway and the pacing gate every call
/// to it passes through.
pub(crate) struct ResolutionSession {
    gateway: Arc<dyn CompoundGateway>,
    pacing: Arc<PacingGate>,
    concurrency: usize,
}

impl ResolutionSession {
    /// Builds the PubChem gateway and pacing gate from effective arguments.
    pub(crate) fn from_args(args: &Args) -> Result<Self> {
        let base_url = args.base_url.as_deref().unwrap_or(DEFAULT_PUBCHEM_BASE_URL);
        validation::validate_base_url(base_url)?;

        let gateway = PubChemGateway::with_base_url(base_url)
            .context("Failed to initialize the PubChem client")?;
        debug!(base_url = gateway.base_url(), "gateway ready");

        Ok(Self {
            gateway: Arc::new(gateway),
            pacing: Arc::new(PacingGate::new(Duration::from_millis(args.pacing_ms))),
            concurrency: usize::from(args.concurrency),
        })
    }

    /// Structure fetcher sharing this session's gateway and pacing.
    pub(crate) fn structure_fetcher(&self) -> StructureFetcher {
        StructureFetcher::new(Arc::clone(&self.gateway), Arc::clone(&self.pacing))
    }

    /// Runs the batch pass, drawing progress when `show_progress` is set.
    pub(crate) async fn run(
        &self,
        input: ResolutionInput,
        interrupted: Arc<AtomicBool>,
        show_progress: bool,
    ) -> Result<BatchResult> {
        let resolver = BatchResolver::new(Arc::clone(&self.gateway), Arc::clone(&self.pacing))
            .with_concurrency(self.concurrency)?;

        let counts = input.kind_counts();
        info!(
            total = input.len(),
            cids = counts.numeric_ids,
            smiles = counts.structural,
            names = counts.names,
            pacing_ms = self.pacing.interval().as_millis(),
            concurrency = self.concurrency,
            "Resolving identifiers"
        );

        let reporter = ProgressReporter::new(
            show_progress,
            input.len().min(chemly_core::MAX_BATCH_SIZE),
        );
        let result = resolver
            .run_interruptible(input, |event| reporter.update(event), interrupted)
            .await;
        reporter.finish();

        Ok(result)
    }
}
