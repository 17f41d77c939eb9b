use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use refguard_core::{EntityRegistry, IntegrityStatus, Reference, ReferenceId, SplitMap};
use tokio::sync::{watch, OwnedSemaphorePermit};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::classifier;
use crate::error::EngineError;
use crate::scheduler::types::{PassOutcome, ValidationPass};

use super::Scheduler;

/// Counts a task as executing for as long as it is alive.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl InFlightGuard {
    fn enter(in_flight: Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolves once shutdown has been signalled.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        // Sender gone: shutdown can no longer be requested.
        std::future::pending::<()>().await;
    }
}

impl Scheduler {
    /// Classify every reference and return them in submission order.
    ///
    /// A gate slot is acquired before each task is spawned, so a full gate
    /// holds back dispatch. Returns only after every dispatched task has
    /// finished. On shutdown, dispatch stops and the pass comes back as
    /// [`PassOutcome::Incomplete`] listing the references never dispatched.
    ///
    /// `entities` and `split_map` must not change while the pass runs.
    pub async fn validate_all(
        &self,
        references: Vec<Reference>,
        entities: Arc<EntityRegistry>,
        split_map: Arc<SplitMap>,
    ) -> Result<ValidationPass, EngineError> {
        let started = Instant::now();
        let submitted = references.len();
        info!(
            references = submitted,
            entities = entities.len(),
            max_concurrency = self.config.max_concurrency,
            "Validation pass starting"
        );

        let ids: Vec<ReferenceId> = references.iter().map(|r| r.id).collect();
        let mut slots: Vec<Option<Reference>> = references.into_iter().map(Some).collect();
        let mut shutdown = self.shutdown.subscribe();
        let mut tasks: JoinSet<(usize, Reference)> = JoinSet::new();
        let mut unprocessed = Vec::new();

        for index in 0..slots.len() {
            let permit: Option<OwnedSemaphorePermit> = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => None,
                permit = Arc::clone(&self.gate).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                unprocessed.extend_from_slice(&ids[index..]);
                break;
            };
            let Some(mut reference) = slots[index].take() else {
                continue;
            };

            let entities = Arc::clone(&entities);
            let split_map = Arc::clone(&split_map);
            let in_flight = Arc::clone(&self.in_flight);
            let peak = Arc::clone(&self.peak_in_flight);
            tasks.spawn(async move {
                let _permit = permit;
                let _guard = InFlightGuard::enter(in_flight, &peak);
                classifier::validate(&mut reference, &entities, &split_map);
                (index, reference)
            });
        }

        // Join barrier: wait for every dispatched task.
        let mut status_counts: HashMap<IntegrityStatus, usize> = HashMap::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, reference)) => {
                    if let Some(status) = reference.status {
                        *status_counts.entry(status).or_default() += 1;
                    }
                    slots[index] = Some(reference);
                }
                Err(e) => {
                    error!(error = %e, "Classification task failed");
                    failures.push(e.to_string());
                }
            }
        }

        if !failures.is_empty() {
            let reference_ids = slots
                .iter()
                .zip(&ids)
                .filter(|(slot, _)| slot.is_none())
                .map(|(_, id)| *id)
                .collect();
            return Err(EngineError::TaskFailed {
                reference_ids,
                reason: failures.join("; "),
                references: slots.into_iter().flatten().collect(),
            });
        }

        let validated: usize = status_counts.values().sum();
        if validated + unprocessed.len() != submitted {
            error!(
                submitted,
                validated,
                unprocessed = unprocessed.len(),
                "Validation pass lost track of references"
            );
            return Err(EngineError::Accounting {
                submitted,
                validated,
                unprocessed: unprocessed.len(),
            });
        }

        let outcome = if unprocessed.is_empty() {
            PassOutcome::Complete
        } else {
            warn!(
                validated,
                unprocessed = unprocessed.len(),
                "Validation pass cancelled before all references were dispatched"
            );
            PassOutcome::Incomplete { unprocessed }
        };

        let pass = ValidationPass {
            references: slots.into_iter().flatten().collect(),
            outcome,
            status_counts,
            duration: started.elapsed(),
        };

        self.metrics
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record_pass(&pass);

        info!(
            validated,
            duration = ?pass.duration,
            peak_in_flight = self.peak_in_flight.load(Ordering::Relaxed),
            "Validation pass finished"
        );

        Ok(pass)
    }
}
