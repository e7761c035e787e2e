// ABOUTME: Error types for machine lifecycle operations.
// ABOUTME: Separates fatal request errors from per-machine failures.

use crate::config::ReferenceError;
use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// No provider table row for a machine type.
    #[error("unknown provider type: {0}")]
    UnknownProviderType(String),

    /// A status change other than start or stop was requested.
    #[error("unknown status change requested: {0}")]
    UnknownStatusValue(String),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("machine {machine} did not reach status {target} after {attempts} attempt(s)")]
    ConvergenceTimeout {
        machine: String,
        target: String,
        attempts: u32,
    },

    #[error("provider call for machine {machine} failed: {source}")]
    Provider {
        machine: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to render network document for {machine}: {source}")]
    Render {
        machine: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The confirmation gate was declined.
    #[error("aborted by user")]
    Aborted,
}

impl LifecycleError {
    /// Fatal errors abort a batch; everything else is reported per machine.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LifecycleError::UnknownProviderType(_) | LifecycleError::UnknownStatusValue(_)
        )
    }

    pub(crate) fn provider(machine: &str, source: ProviderError) -> Self {
        LifecycleError::Provider {
            machine: machine.to_string(),
            source,
        }
    }
}
