// ABOUTME: Link operations trait for host network devices.
// ABOUTME: Query, create bridges, set state and address, delete.

use super::HostError;
use crate::types::MacAddress;
use async_trait::async_trait;
use std::fmt;

/// Administrative state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Up,
    Down,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed link attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub name: String,
    pub state: LinkState,
    pub mac_address: String,
}

/// Host link operations.
#[async_trait]
pub trait LinkOps: Send + Sync {
    async fn link_exists(&self, ifname: &str) -> Result<bool, HostError>;

    /// Create a bridge device. The new device starts down.
    async fn create_bridge(&self, ifname: &str) -> Result<(), HostError>;

    async fn set_link_state(&self, ifname: &str, state: LinkState) -> Result<(), HostError>;

    async fn set_link_address(&self, ifname: &str, mac: &MacAddress) -> Result<(), HostError>;

    /// Returns `None` when the link does not exist.
    async fn get_link(&self, ifname: &str) -> Result<Option<LinkInfo>, HostError>;

    async fn delete_link(&self, ifname: &str) -> Result<(), HostError>;
}
