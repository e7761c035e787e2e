// ABOUTME: Wires the production backends for a run.
// ABOUTME: LXD for machines; netlink, iptables, and tcpdump for bridges.

use std::sync::Arc;
use vnet::bridge::BridgeManager;
use vnet::config::Config;
use vnet::output::Output;
use vnet::provider::{LxcProvider, Providers};
use vnet::runtime::host::{HostCommand, HostProcesses, Iptables, Netlink};
use vnet::runtime::{LxdRuntime, RuntimeError};

/// Connect to LXD and register the providers.
pub async fn connect_providers(config: &Config, output: &Output) -> Result<Providers, RuntimeError> {
    output.progress("  → Connecting to LXD...");
    let runtime = LxdRuntime::connect(&config.settings).await?;
    output.progress(&format!(
        "  → Connected via {}",
        runtime.socket_path().display()
    ));

    Ok(Providers::new().with(Box::new(LxcProvider::new(Arc::new(runtime)))))
}

/// Host-side link, firewall, and process backends.
pub struct HostBackends {
    links: Netlink,
    firewall: Iptables,
    processes: HostProcesses,
}

impl HostBackends {
    pub fn new(config: &Config) -> Self {
        let cmd = HostCommand::new(config.settings.backend_timeout);
        Self {
            links: Netlink::new(config.settings.backend_timeout),
            firewall: Iptables::new(cmd),
            processes: HostProcesses::new(),
        }
    }

    pub fn bridges<'a>(&'a self, config: &'a Config) -> BridgeManager<'a> {
        BridgeManager::new(
            &config.topology,
            &config.settings,
            &self.links,
            &self.firewall,
            &self.processes,
        )
    }
}
