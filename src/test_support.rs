//! In-memory gateway for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::gateway::{CompoundGateway, LookupError, RawCompoundData};
use crate::parser::IdentifierKind;

/// Scripted gateway that records every call it receives.
#[derive(Debug, Default)]
pub(crate) struct StubGateway {
    compounds: HashMap<String, RawCompoundData>,
    failing: HashSet<String>,
    structures: HashMap<u64, Vec<u8>>,
    failing_structures: HashSet<u64>,
    delay: Duration,
    calls: Mutex<Vec<(String, IdentifierKind, Instant)>>,
    structure_calls: Mutex<Vec<u64>>,
}

impl StubGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_compound(mut self, identifier: &str, raw: RawCompoundData) -> Self {
        self.compounds.insert(identifier.to_string(), raw);
        self
    }

    /// Makes lookups of `identifier` return a transport error.
    pub(crate) fn with_failure(mut self, identifier: &str) -> Self {
        self.failing.insert(identifier.to_string());
        self
    }

    pub(crate) fn with_structure(mut self, database_id: u64, payload: &[u8]) -> Self {
        self.structures.insert(database_id, payload.to_vec());
        self
    }

    pub(crate) fn with_structure_failure(mut self, database_id: u64) -> Self {
        self.failing_structures.insert(database_id);
        self
    }

    /// Simulated latency of every lookup.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, IdentifierKind)> {
        self.calls
            .lock()
            .map(|calls| {
                calls
                    .iter()
                    .map(|(raw, kind, _)| (raw.clone(), *kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    pub(crate) fn was_called_with(&self, identifier: &str) -> bool {
        self.calls().iter().any(|(raw, _)| raw == identifier)
    }

    /// Start times of every lookup, in call order.
    pub(crate) fn call_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, _, at)| *at).collect())
            .unwrap_or_default()
    }

    pub(crate) fn structure_calls(&self) -> Vec<u64> {
        self.structure_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompoundGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    async fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<RawCompoundData>, LookupError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((identifier.to_string(), kind, Instant::now()));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(identifier) {
            return Err(LookupError::transport(identifier, "stubbed failure"));
        }
        Ok(self.compounds.get(identifier).cloned())
    }

    async fn fetch_structure_3d(&self, database_id: u64) -> Result<Option<Vec<u8>>, LookupError> {
        if let Ok(mut calls) = self.structure_calls.lock() {
            calls.push(database_id);
        }
        if self.failing_structures.contains(&database_id) {
            return Err(LookupError::http_status(&database_id.to_string(), 503));
        }
        Ok(self.structures.get(&database_id).cloned())
    }
}
