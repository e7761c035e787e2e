// ABOUTME: Provider dispatch: machine type -> provider kind -> capability set.
// ABOUTME: Static lookup tables; adding a provider means adding a table row.

mod lxc;
mod post_create;
mod status;

pub use lxc::LxcProvider;
pub use post_create::{PostCreateStep, post_create_steps};
pub use status::{MachineStatus, StatusChange};

use crate::lifecycle::LifecycleError;
use crate::netplan::DeviceMap;
use crate::runtime::ContainerError;
use async_trait::async_trait;
use std::fmt;

/// Backend technology that realizes a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Lxc,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Lxc => write!(f, "LXC"),
        }
    }
}

const MACHINE_PROVIDERS: &[(&str, ProviderKind)] = &[
    ("host", ProviderKind::Lxc),
    ("router", ProviderKind::Lxc),
    ("lxc", ProviderKind::Lxc),
];

/// Table lookup without an error, for validation.
pub fn kind_for(machine_type: &str) -> Option<ProviderKind> {
    MACHINE_PROVIDERS
        .iter()
        .find(|(t, _)| *t == machine_type)
        .map(|(_, kind)| *kind)
}

/// Map a declared machine type to its provider kind.
pub fn resolve(machine_type: &str) -> Result<ProviderKind, LifecycleError> {
    kind_for(machine_type)
        .ok_or_else(|| LifecycleError::UnknownProviderType(machine_type.to_string()))
}

/// What a provider needs to create one machine.
#[derive(Debug, Clone)]
pub struct CreateRequest<'a> {
    pub name: &'a str,
    pub image_alias: &'a str,
    pub devices: &'a DeviceMap,
}

/// The fixed capability set every provider implements.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn exists(&self, name: &str) -> Result<bool, ProviderError>;

    /// Live status; `MachineStatus::Absent` when the machine does not exist.
    async fn status(&self, name: &str) -> Result<MachineStatus, ProviderError>;

    async fn create(&self, request: &CreateRequest<'_>) -> Result<(), ProviderError>;

    async fn destroy(&self, name: &str) -> Result<(), ProviderError>;

    /// Issue a start or stop. Returns once the backend accepted the request.
    async fn set_status(&self, name: &str, change: StatusChange) -> Result<(), ProviderError>;

    /// Write a file inside the machine.
    async fn place_file(&self, name: &str, path: &str, contents: &str) -> Result<(), ProviderError>;
}

/// Errors from provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("machine not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(ContainerError),
}

impl From<ContainerError> for ProviderError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::NotFound(name) => ProviderError::NotFound(name),
            other => ProviderError::Backend(other),
        }
    }
}

/// The providers available for this run, keyed by kind.
#[derive(Default)]
pub struct Providers {
    entries: Vec<(ProviderKind, Box<dyn Provider>)>,
}

impl Providers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own kind.
    pub fn with(mut self, provider: Box<dyn Provider>) -> Self {
        self.entries.push((provider.kind(), provider));
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Result<&dyn Provider, LifecycleError> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| p.as_ref())
            .ok_or_else(|| LifecycleError::UnknownProviderType(kind.to_string()))
    }

    /// Resolve a machine type all the way to its provider.
    pub fn for_machine_type(&self, machine_type: &str) -> Result<&dyn Provider, LifecycleError> {
        self.get(resolve(machine_type)?)
    }
}
