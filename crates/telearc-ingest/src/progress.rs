// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state of the single ingestion job.
//!
//! The status byte is an atomic so that [`JobState::try_begin`] can claim the
//! job without taking the lock; the counters behind the mutex are only ever
//! written by the running job.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

use telearc_core::types::{IngestProgress, IngestStatus};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const COMPLETED: u8 = 2;
const FAILED: u8 = 3;

/// Messages-per-run count at which the estimate saturates.
const PROGRESS_SCALE: f64 = 1000.0;
/// Estimate ceiling until the job actually finishes.
const PROGRESS_CAP: f64 = 0.95;

#[derive(Debug)]
struct Inner {
    fraction: f64,
    processed: u64,
    label: Option<String>,
}

/// Observable state of the process-wide ingestion job.
#[derive(Debug)]
pub struct JobState {
    status: AtomicU8,
    inner: Mutex<Inner>,
}

impl JobState {
    pub fn new() -> Self {
        JobState {
            status: AtomicU8::new(IDLE),
            inner: Mutex::new(Inner {
                fraction: 0.0,
                processed: 0,
                label: None,
            }),
        }
    }

    /// Claim the job slot. Returns `false` when a job is already running;
    /// otherwise resets the counters for a fresh run and returns `true`.
    ///
    /// A finished job (completed or failed) may be superseded by a new one.
    pub fn try_begin(&self, label: &str) -> bool {
        loop {
            let current = self.status.load(Ordering::Acquire);
            if current == RUNNING {
                return false;
            }
            if self
                .status
                .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let mut inner = self.lock();
                inner.fraction = 0.0;
                inner.processed = 0;
                inner.label = Some(label.to_string());
                return true;
            }
        }
    }

    /// Seed the processed counter with rows already archived for the target
    /// chat before this run.
    pub fn set_baseline(&self, processed: u64) {
        self.lock().processed = processed;
    }

    /// Record a newly archived message.
    ///
    /// The fraction follows `min(0.95, inserted_this_run / 1000)` and never
    /// decreases within a run.
    pub fn record_insert(&self, processed_total: u64, inserted_this_run: u64) {
        let mut inner = self.lock();
        inner.processed = processed_total;
        let estimate = (inserted_this_run as f64 / PROGRESS_SCALE).min(PROGRESS_CAP);
        inner.fraction = inner.fraction.max(estimate);
    }

    /// Mark the job finished; the fraction jumps to exactly 1.0.
    pub fn complete(&self) {
        self.lock().fraction = 1.0;
        self.status.store(COMPLETED, Ordering::Release);
    }

    /// Mark the job failed, replacing the label with the error category.
    pub fn fail(&self, diagnostic: String) {
        self.lock().label = Some(diagnostic);
        self.status.store(FAILED, Ordering::Release);
    }

    /// A consistent snapshot for callers.
    pub fn snapshot(&self) -> IngestProgress {
        let status = match self.status.load(Ordering::Acquire) {
            RUNNING => IngestStatus::Running,
            COMPLETED => IngestStatus::Completed,
            FAILED => IngestStatus::Failed,
            _ => IngestStatus::Idle,
        };
        let inner = self.lock();
        IngestProgress {
            status,
            fraction_complete: inner.fraction,
            messages_processed: inner.processed,
            target_chat_label: inner.label.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panicked writer cannot leave the counters torn; keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}
