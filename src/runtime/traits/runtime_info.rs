// ABOUTME: Runtime info trait for the container backend.
// ABOUTME: Connectivity check performed once when connecting.

use async_trait::async_trait;

/// Runtime metadata operations.
#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    /// Ping the runtime, returning the API version it reports.
    async fn ping(&self) -> Result<String, RuntimeInfoError>;
}

/// Errors from runtime info operations.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
