// ABOUTME: Host bridge management: one isolated L2 segment per declared switch.
// ABOUTME: Idempotent bring-up, egress firewalling, optional packet capture, teardown.

mod error;

pub use error::BridgeError;

use crate::config::{Settings, Topology};
use crate::diagnostics::{Diagnostics, Failure};
use crate::runtime::{
    FirewallOps, FirewallRule, LinkOps, LinkState, ProcessOps, capture_running,
};
use crate::types::MacAddress;
use serde::Serialize;

/// One row of the bridge status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeStatusRow {
    pub name: String,
    pub status: String,
    pub l2_addr: String,
    pub sniffer_active: String,
    pub used_by: String,
}

/// Converges the host bridges of a topology.
///
/// Every mutating call is preceded by a check, so running any operation twice
/// leaves the host as the first run did.
pub struct BridgeManager<'a> {
    topology: &'a Topology,
    settings: &'a Settings,
    links: &'a dyn LinkOps,
    firewall: &'a dyn FirewallOps,
    processes: &'a dyn ProcessOps,
}

impl<'a> BridgeManager<'a> {
    pub fn new(
        topology: &'a Topology,
        settings: &'a Settings,
        links: &'a dyn LinkOps,
        firewall: &'a dyn FirewallOps,
        processes: &'a dyn ProcessOps,
    ) -> Self {
        Self {
            topology,
            settings,
            links,
            firewall,
            processes,
        }
    }

    /// Ensure every bridge exists, is firewalled, and is up.
    pub async fn bring_up(&self, sniffer: bool, diag: &mut Diagnostics) {
        for name in self.topology.bridge_names(self.settings) {
            if let Err(e) = self.bring_up_one(&name, sniffer).await {
                diag.record(Failure::backend(&name, e.to_string()));
            }
        }
    }

    async fn bring_up_one(&self, name: &str, sniffer: bool) -> Result<(), BridgeError> {
        let exists = self
            .links
            .link_exists(name)
            .await
            .map_err(|e| BridgeError::link(name, e))?;
        if !exists {
            self.create(name).await?;
        }

        self.ensure_firewalled(name).await?;

        self.links
            .set_link_state(name, LinkState::Up)
            .await
            .map_err(|e| BridgeError::link(name, e))?;

        if sniffer {
            self.ensure_capture(name).await?;
        }
        Ok(())
    }

    async fn create(&self, name: &str) -> Result<(), BridgeError> {
        tracing::info!("Creating bridge {}", name);
        let mac = MacAddress::random();
        let link = |e| BridgeError::link(name, e);

        self.links.create_bridge(name).await.map_err(link)?;
        // The address can only be changed while the link is down.
        self.links
            .set_link_state(name, LinkState::Down)
            .await
            .map_err(link)?;
        self.links.set_link_address(name, &mac).await.map_err(link)?;
        self.links
            .set_link_state(name, LinkState::Up)
            .await
            .map_err(link)?;
        tracing::debug!("Bridge {} has address {}", name, mac);
        Ok(())
    }

    async fn ensure_firewalled(&self, name: &str) -> Result<(), BridgeError> {
        let rule = FirewallRule::drop_egress(name);
        let firewall = |e| BridgeError::firewall(name, e);

        if self.firewall.rule_exists(&rule).await.map_err(firewall)? {
            tracing::debug!("Firewall rule '{}' already present", rule);
            return Ok(());
        }

        tracing::info!("Blocking outside traffic from bridge {}", name);
        self.firewall.add_rule(&rule).await.map_err(firewall)
    }

    async fn ensure_capture(&self, name: &str) -> Result<(), BridgeError> {
        let capture = |e| BridgeError::capture(name, e);
        let processes = self.processes.list_processes().await.map_err(capture)?;
        if capture_running(&processes, name) {
            tracing::debug!("Capture on {} already running", name);
            return Ok(());
        }

        let path = self.settings.pcap_dir.join(format!("{name}.pcap"));
        tracing::info!("Starting capture on {}, writing {}", name, path.display());
        self.processes
            .spawn_capture(name, &path)
            .await
            .map_err(capture)
    }

    /// Set every existing bridge down. Missing bridges are only warned about.
    pub async fn bring_down(&self, diag: &mut Diagnostics) {
        for name in self.topology.bridge_names(self.settings) {
            if let Err(e) = self.bring_down_one(&name).await {
                diag.record(Failure::backend(&name, e.to_string()));
            }
        }
    }

    async fn bring_down_one(&self, name: &str) -> Result<(), BridgeError> {
        let link = |e| BridgeError::link(name, e);
        if !self.links.link_exists(name).await.map_err(link)? {
            tracing::warn!("Bridge {} does not exist, cannot bring it down", name);
            return Ok(());
        }

        tracing::info!("Bringing down bridge {}", name);
        self.links
            .set_link_state(name, LinkState::Down)
            .await
            .map_err(link)
    }

    /// Delete every bridge. Deleting a device also ends captures attached to it.
    pub async fn delete(&self, diag: &mut Diagnostics) {
        for name in self.topology.bridge_names(self.settings) {
            if let Err(e) = self.delete_one(&name).await {
                diag.record(Failure::backend(&name, e.to_string()));
            }
        }
    }

    async fn delete_one(&self, name: &str) -> Result<(), BridgeError> {
        let link = |e| BridgeError::link(name, e);
        if !self.links.link_exists(name).await.map_err(link)? {
            tracing::info!("Bridge {} is already gone", name);
            return Ok(());
        }

        tracing::info!("Deleting bridge {}", name);
        self.links.delete_link(name).await.map_err(link)
    }

    /// Status of every declared bridge. Unreadable fields show `NA`.
    pub async fn status_rows(&self) -> Vec<BridgeStatusRow> {
        let processes = match self.processes.list_processes().await {
            Ok(processes) => Some(processes),
            Err(e) => {
                tracing::warn!("Could not list processes: {}", e);
                None
            }
        };

        let mut rows = Vec::with_capacity(self.topology.switches);
        for index in 0..self.topology.switches {
            let name = self.settings.bridge_name(index);
            let used_by = self
                .topology
                .machines_using_bridge(index)
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            let link = match self.links.get_link(&name).await {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!("Could not read bridge {}: {}", name, e);
                    None
                }
            };

            let row = match link {
                Some(link) => BridgeStatusRow {
                    status: link.state.to_string(),
                    l2_addr: link.mac_address,
                    sniffer_active: processes
                        .as_deref()
                        .map(|p| capture_running(p, &name).to_string())
                        .unwrap_or_else(|| "NA".to_string()),
                    name,
                    used_by,
                },
                None => BridgeStatusRow {
                    name,
                    status: "NA".to_string(),
                    l2_addr: "NA".to_string(),
                    sniffer_active: "NA".to_string(),
                    used_by,
                },
            };
            rows.push(row);
        }

        rows
    }
}
