// ABOUTME: Container operations trait for the machine backend.
// ABOUTME: Existence, live status, create, start, stop, delete, and file placement.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Container lifecycle operations.
///
/// Idempotency is the caller's job: `create_container` on an existing name
/// and `delete_container` on a missing one are errors here.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Check whether a container with this name exists.
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError>;

    /// Fetch the live status string (e.g. "Running", "Stopped").
    ///
    /// Returns `ContainerError::NotFound` for unknown containers.
    async fn container_status(&self, name: &str) -> Result<String, ContainerError>;

    /// Create a container and wait for the backend to finish creating it.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<(), ContainerError>;

    /// Ask the backend to start a container. Does not wait for convergence.
    async fn start_container(&self, name: &str) -> Result<(), ContainerError>;

    /// Ask the backend to stop a container. Does not wait for convergence.
    async fn stop_container(&self, name: &str) -> Result<(), ContainerError>;

    /// Delete a stopped container.
    async fn delete_container(&self, name: &str) -> Result<(), ContainerError>;

    /// Write a file inside the container, replacing any existing file.
    async fn write_file(
        &self,
        name: &str,
        path: &str,
        contents: &[u8],
    ) -> Result<(), ContainerError>;
}

/// Everything the backend needs to create one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    /// Image alias to create from.
    pub image_alias: String,
    /// Instance configuration keys.
    pub config: BTreeMap<String, String>,
    /// Device name -> device options.
    pub devices: BTreeMap<String, BTreeMap<String, String>>,
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("backend call timed out: {0}")]
    Timeout(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
