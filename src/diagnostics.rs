// ABOUTME: Diagnostics accumulator for per-entity failures inside a batch.
// ABOUTME: Failures are logged where they happen and surfaced when the batch ends.

use crate::config::ReferenceError;
use crate::lifecycle::LifecycleError;

/// Collects failures that must not abort the rest of a batch.
#[derive(Debug, Default)]
pub struct Diagnostics {
    failures: Vec<Failure>,
}

impl Diagnostics {
    /// Record a failure, auto-logging it via tracing.
    pub fn record(&mut self, failure: Failure) {
        tracing::error!("{}: {}", failure.subject, failure.message);
        self.failures.push(failure);
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One machine or bridge that could not be processed.
#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    /// Machine or bridge name.
    pub subject: String,
    pub message: String,
}

impl Failure {
    pub fn config_reference(subject: impl Into<String>, err: &ReferenceError) -> Self {
        Self {
            kind: FailureKind::ConfigReference,
            subject: subject.into(),
            message: err.to_string(),
        }
    }

    pub fn backend(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Backend,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Classify a non-fatal lifecycle error.
    pub fn from_lifecycle(subject: impl Into<String>, err: &LifecycleError) -> Self {
        let kind = match err {
            LifecycleError::Reference(_) => FailureKind::ConfigReference,
            LifecycleError::ConvergenceTimeout { .. } => FailureKind::ConvergenceTimeout,
            _ => FailureKind::Backend,
        };
        Self {
            kind,
            subject: subject.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Name not present in the topology.
    ConfigReference,
    /// Backend did not reach the requested status in time.
    ConvergenceTimeout,
    /// A backend call failed.
    Backend,
}
