//! Batch resolution of identifier tokens against a compound gateway.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::pacing::PacingGate;
use super::record::{BatchResult, FailedIdentifier, MoleculeRecord, ProgressEvent};
use super::BatchError;
use crate::gateway::CompoundGateway;
use crate::parser::{IdentifierToken, ResolutionInput};

/// Hard cap on identifiers processed per pass.
pub const MAX_BATCH_SIZE: usize = 50;

/// Default minimum interval between the start of consecutive lookups.
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(1500);

/// Minimum allowed worker count.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed worker count.
pub const MAX_CONCURRENCY: usize = 4;

/// Result of processing a single token.
enum Outcome {
    Resolved(MoleculeRecord),
    Failed(FailedIdentifier),
}

/// Accumulates outcomes in input order and numbers progress events.
struct Tally {
    records: Vec<MoleculeRecord>,
    failed: Vec<FailedIdentifier>,
    total_count: usize,
}

impl Tally {
    fn new(total_count: usize) -> Self {
        Self {
            records: Vec::new(),
            failed: Vec::new(),
            total_count,
        }
    }

    fn push(&mut self, outcome: Outcome) -> ProgressEvent {
        match outcome {
            Outcome::Resolved(record) => self.records.push(record),
            Outcome::Failed(failed) => self.failed.push(failed),
        }
        ProgressEvent {
            completed_count: self.records.len() + self.failed.len(),
            total_count: self.total_count,
        }
    }

    fn finish(self, elapsed: Duration, dropped_count: usize) -> BatchResult {
        let processed = self.records.len() + self.failed.len();
        let interrupted = processed < self.total_count;
        BatchResult::new(
            self.records,
            self.failed,
            elapsed,
            self.total_count,
            dropped_count,
            interrupted,
        )
    }
}

/// Resolves a whole [`ResolutionInput`] into a [`BatchResult`].
///
/// The resolver is stateless between runs: every call gets a fresh result owned by
/// the caller. All lookup starts pass through one shared [`PacingGate`], so the call
/// rate is the same whether identifiers are processed one at a time or by a small
/// worker pool.
///
/// # Concurrency Model
///
/// - With concurrency 1 (the default) lookups run strictly one after another
/// - With concurrency N > 1 each token runs in its own Tokio task, at most N in flight
/// - Either way, progress events are fired on the caller's task in input order
#[derive(Clone)]
pub struct BatchResolver {
    gateway: Arc<dyn CompoundGateway>,
    pacing: Arc<PacingGate>,
    concurrency: usize,
}

impl fmt::Debug for BatchResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchResolver")
            .field("gateway", &self.gateway.name())
            .field("pacing", &self.pacing)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl BatchResolver {
    /// Creates a sequential resolver.
    #[must_use]
    pub fn new(gateway: Arc<dyn CompoundGateway>, pacing: Arc<PacingGate>) -> Self {
        Self {
            gateway,
            pacing,
            concurrency: MIN_CONCURRENCY,
        }
    }

    /// Sets the worker count.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConcurrency`] if `concurrency` is outside
    /// `1..=4`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, BatchError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(BatchError::InvalidConcurrency { value: concurrency });
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn pacing(&self) -> &Arc<PacingGate> {
        &self.pacing
    }

    /// Runs a full pass. See [`BatchResolver::run_interruptible`].
    pub async fn run<F>(&self, input: ResolutionInput, on_progress: F) -> BatchResult
    where
        F: FnMut(ProgressEvent),
    {
        self.run_interruptible(input, on_progress, Arc::new(AtomicBool::new(false)))
            .await
    }

    /// Runs a full pass that stops early once `interrupted` is set.
    ///
    /// Input beyond [`MAX_BATCH_SIZE`] is dropped before any lookup. Each remaining
    /// token lands in either `records` or `failed`; `on_progress` fires once per
    /// processed token. The flag is checked between tokens and while waiting on the
    /// pacing gate. A cancelled pass returns what it accumulated, with
    /// `completed_count() < total_count()`.
    #[instrument(skip_all, fields(gateway = self.gateway.name(), concurrency = self.concurrency))]
    pub async fn run_interruptible<F>(
        &self,
        mut input: ResolutionInput,
        mut on_progress: F,
        interrupted: Arc<AtomicBool>,
    ) -> BatchResult
    where
        F: FnMut(ProgressEvent),
    {
        let dropped_count = input.truncate(MAX_BATCH_SIZE);
        if dropped_count > 0 {
            warn!(
                dropped = dropped_count,
                max = MAX_BATCH_SIZE,
                "batch exceeds maximum size; only the first {MAX_BATCH_SIZE} identifiers are processed"
            );
        }

        let started = Instant::now();
        let mut tally = Tally::new(input.len());
        info!(total = input.len(), "starting batch resolution");

        if self.concurrency == MIN_CONCURRENCY {
            self.run_sequential(input, &mut tally, &mut on_progress, &interrupted)
                .await;
        } else {
            self.run_pooled(input, &mut tally, &mut on_progress, &interrupted)
                .await;
        }

        let result = tally.finish(started.elapsed(), dropped_count);
        info!(
            resolved = result.records().len(),
            failed = result.failed().len(),
            interrupted = result.was_interrupted(),
            elapsed_ms = result.elapsed().as_millis(),
            "batch resolution complete"
        );
        result
    }

    async fn run_sequential<F>(
        &self,
        input: ResolutionInput,
        tally: &mut Tally,
        on_progress: &mut F,
        interrupted: &Arc<AtomicBool>,
    ) where
        F: FnMut(ProgressEvent),
    {
        for token in input {
            let Some(outcome) =
                paced_lookup(self.gateway.as_ref(), &self.pacing, &token, interrupted).await
            else {
                info!("batch interrupted; returning partial result");
                break;
            };
            on_progress(tally.push(outcome));
        }
    }

    async fn run_pooled<F>(
        &self,
        input: ResolutionInput,
        tally: &mut Tally,
        on_progress: &mut F,
        interrupted: &Arc<AtomicBool>,
    ) where
        F: FnMut(ProgressEvent),
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        // Dropping the set aborts every worker, so an abandoned run stops
        // calling the gateway.
        let mut workers = JoinSet::new();
        let mut task_slots = HashMap::with_capacity(input.len());
        let mut raws = Vec::with_capacity(input.len());

        for (slot, token) in input.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let gateway = Arc::clone(&self.gateway);
            let pacing = Arc::clone(&self.pacing);
            let interrupted = Arc::clone(interrupted);
            raws.push(token.raw().to_string());

            let handle = workers.spawn(async move {
                // Permit is dropped when this block exits
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };
                paced_lookup(gateway.as_ref(), &pacing, &token, &interrupted).await
            });
            task_slots.insert(handle.id(), slot);
        }

        debug!(task_count = workers.len(), "waiting for lookup workers");

        // Workers finish in any order; outcomes are released in input order.
        let mut finished: Vec<Option<Option<Outcome>>> = (0..raws.len()).map(|_| None).collect();
        let mut next_slot = 0;
        while let Some(joined) = workers.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => {
                    let id = e.id();
                    let raw = task_slots.get(&id).map_or("", |&slot| raws[slot].as_str());
                    warn!(identifier = %raw, error = %e, "lookup worker panicked");
                    (id, Some(Outcome::Failed(FailedIdentifier::new(raw))))
                }
            };
            if let Some(&slot) = task_slots.get(&id) {
                finished[slot] = Some(outcome);
            }
            while let Some(Some(outcome)) = finished.get_mut(next_slot).map(Option::take) {
                if let Some(outcome) = outcome {
                    on_progress(tally.push(outcome));
                }
                next_slot += 1;
            }
        }
    }
}

/// Waits for the pacing gate, then looks up one token.
///
/// Returns `None` without calling the gateway if `interrupted` is set first.
async fn paced_lookup(
    gateway: &dyn CompoundGateway,
    pacing: &PacingGate,
    token: &IdentifierToken,
    interrupted: &AtomicBool,
) -> Option<Outcome> {
    pacing.acquire_unless(interrupted).await?;
    Some(lookup(gateway, token).await)
}

#[instrument(skip(gateway), fields(kind = %token.kind()))]
async fn lookup(gateway: &dyn CompoundGateway, token: &IdentifierToken) -> Outcome {
    match gateway.resolve(token.raw(), token.kind()).await {
        Ok(Some(raw)) => {
            debug!(identifier = token.raw(), cid = raw.database_id, "identifier resolved");
            Outcome::Resolved(MoleculeRecord::from_raw(raw, token.raw()))
        }
        Ok(None) => {
            debug!(identifier = token.raw(), "no compound matched identifier");
            Outcome::Failed(FailedIdentifier::new(token.raw()))
        }
        Err(e) => {
            warn!(identifier = token.raw(), error = %e, "lookup failed");
            Outcome::Failed(FailedIdentifier::new(token.raw()))
        }
    }
}
