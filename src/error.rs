// ABOUTME: Application-wide error types for vnet.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ReferenceError;
use crate::environment::HostCheckError;
use crate::lifecycle::LifecycleError;
use crate::runtime::RuntimeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    HostCheck(#[from] HostCheckError),

    #[error("{0} operation(s) failed, see the log above")]
    PartialFailure(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Follow-up advice for errors the operator can act on.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Runtime(e) => Some(e.kind().hint()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
