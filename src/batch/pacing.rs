//! Global pacing gate for external lookup calls.
//!
//! This module provides the [`PacingGate`] struct which enforces a minimum
//! interval between the *start* of consecutive calls to the compound database,
//! no matter how quickly each call returns and no matter how many workers share it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use chemly_core::batch::PacingGate;
//!
//! # async fn example() {
//! let gate = Arc::new(PacingGate::new(Duration::from_millis(1500)));
//!
//! // First call starts immediately
//! gate.acquire().await;
//!
//! // Second call starts no earlier than 1.5s after the first
//! gate.acquire().await;
//! # }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// How often a waiting caller re-checks its cancellation flag.
const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Fixed-interval gate shared by every caller of the external service.
///
/// The gate is a single slot: the lock is held while waiting out the interval,
/// so concurrent callers queue behind each other and call starts never come
/// closer together than the configured interval.
///
/// # Thread Safety
///
/// `PacingGate` is `Send + Sync`, making it safe to wrap in `Arc` and share
/// across spawned Tokio tasks.
#[derive(Debug)]
pub struct PacingGate {
    /// Minimum time between call starts.
    interval: Duration,

    /// Whether pacing is disabled (test stubs, local mirrors).
    disabled: bool,

    /// Start time of the previous call.
    /// `None` until the first call, which proceeds immediately.
    last_start: Mutex<Option<Instant>>,

    /// Total time callers have spent waiting at the gate (in milliseconds).
    cumulative_wait_ms: AtomicU64,
}

impl PacingGate {
    /// Creates a gate with the specified minimum interval between call starts.
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = interval.as_millis()))]
    pub fn new(interval: Duration) -> Self {
        debug!("creating pacing gate");
        Self {
            interval,
            disabled: false,
            last_start: Mutex::new(None),
            cumulative_wait_ms: AtomicU64::new(0),
        }
    }

    /// Creates a disabled gate that never waits.
    #[must_use]
    #[instrument]
    pub fn disabled() -> Self {
        debug!("creating disabled pacing gate");
        Self {
            interval: Duration::ZERO,
            disabled: true,
            last_start: Mutex::new(None),
            cumulative_wait_ms: AtomicU64::new(0),
        }
    }

    /// Returns whether pacing is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the minimum interval between call starts.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the total time spent waiting at the gate so far.
    #[must_use]
    pub fn cumulative_wait(&self) -> Duration {
        Duration::from_millis(self.cumulative_wait_ms.load(Ordering::SeqCst))
    }

    /// Waits until a call may start, then records the start time.
    ///
    /// Returns how long this caller waited. The first call proceeds immediately.
    /// If the returned future is dropped while waiting, no start is recorded.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Duration {
        if self.disabled {
            return Duration::ZERO;
        }

        let mut last_start_guard = self.last_start.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(last_start) = *last_start_guard {
            let elapsed = last_start.elapsed();
            if elapsed < self.interval {
                waited = self.interval.saturating_sub(elapsed);
                debug!(delay_ms = waited.as_millis(), "pacing external call");
                tokio::time::sleep(waited).await;
                self.add_cumulative_wait(waited);
            }
        } else {
            debug!("first external call - no delay");
        }

        *last_start_guard = Some(Instant::now());
        waited
    }

    /// Like [`PacingGate::acquire`], but gives up once `interrupted` is set.
    ///
    /// Returns `None` when interrupted; no start is recorded in that case.
    pub async fn acquire_unless(&self, interrupted: &AtomicBool) -> Option<Duration> {
        if interrupted.load(Ordering::SeqCst) {
            return None;
        }
        tokio::select! {
            waited = self.acquire() => Some(waited),
            () = wait_for_flag(interrupted) => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_wait(&self, delay: Duration) {
        self.cumulative_wait_ms
            .fetch_add(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

async fn wait_for_flag(flag: &AtomicBool) {
    while !flag.load(Ordering::SeqCst) {
        tokio::time::sleep(INTERRUPT_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_pacing_gate_new_keeps_interval() {
        let gate = PacingGate::new(Duration::from_millis(1500));
        assert_eq!(gate.interval(), Duration::from_millis(1500));
        assert!(!gate.is_disabled());
    }

    #[test]
    fn test_pacing_gate_disabled_has_zero_interval() {
        let gate = PacingGate::disabled();
        assert_eq!(gate.interval(), Duration::ZERO);
        assert!(gate.is_disabled());
    }

    #[tokio::test]
    async fn test_pacing_gate_disabled_never_waits() {
        tokio::time::pause();

        let gate = PacingGate::disabled();
        let start = Instant::now();
        for _ in 0..5 {
            assert_eq!(gate.acquire().await, Duration::ZERO);
        }
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_pacing_gate_first_call_is_immediate() {
        tokio::time::pause();

        let gate = PacingGate::new(Duration::from_millis(1500));
        let start = Instant::now();
        gate.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_pacing_gate_spaces_consecutive_starts() {
        tokio::time::pause();

        let gate = PacingGate::new(Duration::from_millis(1500));
        let start = Instant::now();

        gate.acquire().await;
        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(start.elapsed() < Duration::from_millis(1600));

        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_eq!(gate.cumulative_wait(), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_pacing_gate_counts_time_already_elapsed() {
        tokio::time::pause();

        let gate = PacingGate::new(Duration::from_millis(1500));
        gate.acquire().await;

        // A slow call consumes part of the interval
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let waited = gate.acquire().await;
        assert_eq!(waited, Duration::from_millis(500));

        // A call slower than the interval needs no wait at all
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(gate.acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_pacing_gate_serializes_concurrent_callers() {
        tokio::time::pause();

        let gate = Arc::new(PacingGate::new(Duration::from_millis(1500)));
        let origin = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                gate.acquire().await;
                Instant::now()
            }));
        }

        let mut starts = Vec::new();
        for handle in handles {
            starts.push(handle.await.unwrap());
        }
        starts.sort();

        for pair in starts.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(1500));
        }
        assert!(starts[3].duration_since(origin) >= Duration::from_millis(4500));
    }

    #[tokio::test]
    async fn test_pacing_gate_acquire_unless_gives_up_when_flag_set() {
        tokio::time::pause();

        let gate = Arc::new(PacingGate::new(Duration::from_secs(30)));
        let flag = Arc::new(AtomicBool::new(false));
        assert_eq!(gate.acquire_unless(&flag).await, Some(Duration::ZERO));

        let setter = Arc::clone(&flag);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            setter.store(true, Ordering::SeqCst);
        });

        let start = Instant::now();
        assert_eq!(gate.acquire_unless(&flag).await, None);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(gate.cumulative_wait(), Duration::ZERO);
    }
}
