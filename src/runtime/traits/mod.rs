// ABOUTME: Capability traits for the external collaborators.
// ABOUTME: Defines ContainerOps, RuntimeInfo, LinkOps, FirewallOps, ProcessOps.

mod container;
mod firewall;
mod link;
mod process;
mod runtime_info;

pub use container::{ContainerError, ContainerOps, ContainerSpec};
pub use firewall::{FirewallOps, FirewallRule};
pub use link::{LinkInfo, LinkOps, LinkState};
pub use process::{ProcessInfo, ProcessOps, capture_running};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};

use std::time::Duration;

/// Errors from host-level backends (links, firewall, processes).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} exited with {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{command} did not finish within {limit:?}")]
    Timeout { command: String, limit: Duration },

    #[error("unexpected output from {command}: {message}")]
    Parse { command: String, message: String },

    #[error("netlink {operation} failed: {message}")]
    Netlink { operation: String, message: String },
}
