//! Diagnostic sinks for swallowed tap failures.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use repokit_core::{ErrorKind, RepositoryError};

use super::TapOperation;

/// Observer of tap failures.
///
/// Tap decorators never return the tap's error to their caller; a sink is the
/// only place where it can be observed (besides the warning log).
pub trait TapSink: Send + Sync {
    fn tap_failed(&self, operation: TapOperation, error: &RepositoryError);
}

/// One swallowed tap failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapFailure {
    pub operation: TapOperation,
    pub kind: ErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Sink that keeps every failure in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<TapFailure>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures recorded so far, oldest first.
    pub fn failures(&self) -> Vec<TapFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TapSink for RecordingSink {
    fn tap_failed(&self, operation: TapOperation, error: &RepositoryError) {
        let failure = TapFailure {
            operation,
            kind: error.kind(),
            message: error.to_string(),
            occurred_at: Utc::now(),
        };
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }
}
