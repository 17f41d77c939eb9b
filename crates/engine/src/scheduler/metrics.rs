use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use refguard_core::IntegrityStatus;
use serde::Serialize;

use super::types::ValidationPass;

/// Scheduler operational metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Passes that ran to completion or were cancelled.
    pub passes_run: u64,
    /// Passes that stopped early on shutdown.
    pub passes_cancelled: u64,
    /// References classified across all passes.
    pub references_validated: u64,
    /// Classified references per status across all passes.
    pub status_counts: HashMap<IntegrityStatus, u64>,
    /// Classification tasks executing right now.
    pub in_flight: usize,
    /// High-water mark of simultaneously executing tasks.
    pub peak_in_flight: usize,
    pub last_pass_duration: Option<Duration>,
    pub avg_pass_duration: Duration,
    pub last_run: Option<DateTime<Utc>>,
}

impl SchedulerMetrics {
    /// Record a finished pass.
    pub fn record_pass(&mut self, pass: &ValidationPass) {
        self.passes_run += 1;
        if !pass.is_complete() {
            self.passes_cancelled += 1;
        }
        for (status, count) in &pass.status_counts {
            *self.status_counts.entry(*status).or_default() += *count as u64;
            self.references_validated += *count as u64;
        }
        self.last_pass_duration = Some(pass.duration);
        self.last_run = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        self.avg_pass_duration = if self.passes_run == 1 {
            pass.duration
        } else {
            let prev_nanos = self.avg_pass_duration.as_nanos() as f64;
            let cur_nanos = pass.duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / self.passes_run as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }
}
