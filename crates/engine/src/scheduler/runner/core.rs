use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::{watch, Semaphore};
use tracing::info;

use crate::error::EngineError;
use crate::scheduler::metrics::SchedulerMetrics;
use crate::scheduler::types::SchedulerConfig;

/// The validation scheduler. Runs one classification task per reference,
/// with at most `max_concurrency` tasks executing at any moment.
///
/// The admission gate belongs to the scheduler, so the bound also holds
/// across concurrent `validate_all` calls on the same instance.
pub struct Scheduler {
    pub(super) config: SchedulerConfig,
    /// Admission gate: one permit per in-flight task.
    pub(super) gate: Arc<Semaphore>,
    /// Scheduler metrics.
    pub(super) metrics: Arc<RwLock<SchedulerMetrics>>,
    /// Tasks currently executing.
    pub(super) in_flight: Arc<AtomicUsize>,
    /// High-water mark of `in_flight`.
    pub(super) peak_in_flight: Arc<AtomicUsize>,
    /// Shutdown signal.
    pub(super) shutdown: Arc<watch::Sender<bool>>,
}

impl Scheduler {
    /// Create a new scheduler. Fails on a configuration the gate cannot honor.
    pub fn new(config: SchedulerConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            gate: Arc::new(Semaphore::new(config.max_concurrency)),
            config,
            metrics: Arc::new(RwLock::new(SchedulerMetrics::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(shutdown),
        })
    }

    pub fn max_concurrency(&self) -> usize {
        self.config.max_concurrency
    }

    /// Get a snapshot of the current scheduler metrics.
    pub fn metrics(&self) -> SchedulerMetrics {
        let mut snapshot = match self.metrics.read() {
            Ok(m) => m.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        snapshot.in_flight = self.in_flight.load(Ordering::Relaxed);
        snapshot.peak_in_flight = self.peak_in_flight.load(Ordering::Relaxed);
        snapshot
    }

    /// Get an Arc to the metrics (for external reads without cloning).
    pub fn metrics_handle(&self) -> Arc<RwLock<SchedulerMetrics>> {
        Arc::clone(&self.metrics)
    }

    /// Signal the scheduler to stop. Running passes stop dispatching, drain
    /// their in-flight tasks and return an incomplete pass; later passes
    /// return immediately with nothing dispatched.
    pub fn shutdown(&self) {
        info!("Scheduler shutdown requested");
        self.shutdown.send_replace(true);
    }

    /// Get the shutdown sender (for external shutdown signaling, e.g. ctrl-c).
    pub fn shutdown_signal(&self) -> Arc<watch::Sender<bool>> {
        Arc::clone(&self.shutdown)
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }
}
