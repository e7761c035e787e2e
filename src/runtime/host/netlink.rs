// ABOUTME: Link backend speaking netlink through nispor.
// ABOUTME: Creates, queries, and deletes bridge devices on the host.

use crate::runtime::traits::{HostError, LinkInfo, LinkOps, LinkState};
use crate::types::MacAddress;
use async_trait::async_trait;
use std::time::Duration;

/// nispor runs its own executor, so every call goes to a blocking thread
/// and is bounded by `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct Netlink {
    timeout: Duration,
}

impl Netlink {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn blocking<T, F>(&self, operation: String, f: F) -> Result<T, HostError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, nispor::NisporError> + Send + 'static,
    {
        tracing::debug!("netlink: {}", operation);

        let joined = tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(f))
            .await
            .map_err(|_| HostError::Timeout {
                command: operation.clone(),
                limit: self.timeout,
            })?;

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(HostError::Netlink {
                operation,
                message: format!("{}: {}", e.kind, e.msg),
            }),
            Err(e) => Err(HostError::Netlink {
                operation,
                message: e.to_string(),
            }),
        }
    }

    async fn apply(&self, operation: String, iface: nispor::IfaceConf) -> Result<(), HostError> {
        let mut conf = nispor::NetConf::default();
        conf.ifaces = Some(vec![iface]);
        self.blocking(operation, move || conf.apply()).await
    }
}

fn iface_conf(ifname: &str, state: nispor::IfaceState) -> nispor::IfaceConf {
    let mut conf = nispor::IfaceConf::default();
    conf.name = ifname.to_string();
    conf.state = state;
    conf
}

fn bridge_conf(ifname: &str) -> nispor::IfaceConf {
    let mut conf = iface_conf(ifname, nispor::IfaceState::Down);
    conf.iface_type = Some(nispor::IfaceType::Bridge);
    conf
}

fn state_conf(ifname: &str, state: LinkState) -> nispor::IfaceConf {
    let state = match state {
        LinkState::Up => nispor::IfaceState::Up,
        LinkState::Down => nispor::IfaceState::Down,
    };
    iface_conf(ifname, state)
}

/// Address changes keep the link down.
fn address_conf(ifname: &str, mac: &MacAddress) -> nispor::IfaceConf {
    let mut conf = iface_conf(ifname, nispor::IfaceState::Down);
    conf.mac_address = Some(mac.as_str().to_string());
    conf
}

/// Administrative state comes from the UP flag; a bridge without ports
/// reports its operational state as down even when it is up.
fn link_info(iface: &nispor::Iface) -> LinkInfo {
    LinkInfo {
        name: iface.name.clone(),
        state: if iface.flags.contains(&nispor::IfaceFlag::Up) {
            LinkState::Up
        } else {
            LinkState::Down
        },
        mac_address: iface.mac_address.clone(),
    }
}

#[async_trait]
impl LinkOps for Netlink {
    async fn link_exists(&self, ifname: &str) -> Result<bool, HostError> {
        Ok(self.get_link(ifname).await?.is_some())
    }

    async fn create_bridge(&self, ifname: &str) -> Result<(), HostError> {
        self.apply(format!("create bridge {ifname}"), bridge_conf(ifname))
            .await
    }

    async fn set_link_state(&self, ifname: &str, state: LinkState) -> Result<(), HostError> {
        self.apply(format!("set {ifname} {state}"), state_conf(ifname, state))
            .await
    }

    async fn set_link_address(&self, ifname: &str, mac: &MacAddress) -> Result<(), HostError> {
        self.apply(
            format!("set {ifname} address {mac}"),
            address_conf(ifname, mac),
        )
        .await
    }

    async fn get_link(&self, ifname: &str) -> Result<Option<LinkInfo>, HostError> {
        let name = ifname.to_string();
        self.blocking(format!("get {ifname}"), move || {
            let state = nispor::NetState::retrieve()?;
            Ok(state.ifaces.get(&name).map(link_info))
        })
        .await
    }

    async fn delete_link(&self, ifname: &str) -> Result<(), HostError> {
        self.apply(
            format!("delete {ifname}"),
            iface_conf(ifname, nispor::IfaceState::Absent),
        )
        .await
    }
}
