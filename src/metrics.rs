//! Process-wide counters: raw HTTP outcomes plus, per orchestration operation,
//! how often the backend answered versus how often local content stood in.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Instant;

static REQUESTS_SENT: AtomicU64 = AtomicU64::new(0);
static REQUESTS_FAILED: AtomicU64 = AtomicU64::new(0);
static REQUEST_TIMEOUTS: AtomicU64 = AtomicU64::new(0);
static LATENCY_SUM_MS: AtomicU64 = AtomicU64::new(0);
static LATENCY_COUNT: AtomicU64 = AtomicU64::new(0);

static OPERATION_COUNTERS: OnceLock<Mutex<HashMap<String, OperationCounter>>> = OnceLock::new();

pub fn inc_requests_sent() {
    REQUESTS_SENT.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_requests_failed() {
    REQUESTS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_request_timeouts() {
    REQUEST_TIMEOUTS.fetch_add(1, Ordering::Relaxed);
}

pub fn observe_latency(started_at: Instant) {
    let ms = started_at.elapsed().as_millis() as u64;
    LATENCY_SUM_MS.fetch_add(ms, Ordering::Relaxed);
    LATENCY_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounter {
    pub backend: u64,
    pub fallback: u64,
}

impl OperationCounter {
    pub fn total(&self) -> u64 {
        self.backend.saturating_add(self.fallback)
    }
}

fn operation_lock() -> MutexGuard<'static, HashMap<String, OperationCounter>> {
    OPERATION_COUNTERS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Count a result the backend produced for `operation`.
pub fn record_backend(operation: &str) -> OperationCounter {
    let mut guard = operation_lock();
    let counter = guard.entry(operation.to_string()).or_default();
    counter.backend = counter.backend.saturating_add(1);
    *counter
}

/// Count a result served from local fallback content for `operation`.
pub fn record_fallback(operation: &str) -> OperationCounter {
    let mut guard = operation_lock();
    let counter = guard.entry(operation.to_string()).or_default();
    counter.fallback = counter.fallback.saturating_add(1);
    *counter
}

pub fn operation_counter(operation: &str) -> OperationCounter {
    operation_lock()
        .get(operation)
        .copied()
        .unwrap_or_default()
}

pub fn operation_counters_snapshot() -> HashMap<String, OperationCounter> {
    operation_lock().clone()
}

#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub requests_sent: u64,
    pub requests_failed: u64,
    pub request_timeouts: u64,
    pub latency_avg_ms: Option<u64>,
}

pub fn snapshot() -> Snapshot {
    let sum = LATENCY_SUM_MS.load(Ordering::Relaxed);
    let count = LATENCY_COUNT.load(Ordering::Relaxed);
    Snapshot {
        requests_sent: REQUESTS_SENT.load(Ordering::Relaxed),
        requests_failed: REQUESTS_FAILED.load(Ordering::Relaxed),
        request_timeouts: REQUEST_TIMEOUTS.load(Ordering::Relaxed),
        latency_avg_ms: if count > 0 { Some(sum / count) } else { None },
    }
}
