// ABOUTME: Compiles a machine's declaration into its in-guest network document.
// ABOUTME: Pure and per-machine: no I/O and no lookups into other machines.

mod devices;
mod hosts;

pub use devices::{DeviceMap, compile_devices};
pub use hosts::render_hosts_file;

use crate::config::{ReferenceError, RouteSpec, Topology, validate_machine};
use crate::types::CidrAddress;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendered as `network:` at the top of the guest's netplan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkDocument {
    pub network: NetworkSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSection {
    pub version: u8,
    pub renderer: String,
    pub ethernets: BTreeMap<String, EthernetEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vlans: BTreeMap<String, VlanEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bridges: BTreeMap<String, BridgeEntry>,
}

/// DHCP is never used inside the testbed; addressing is always static.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dhcp {
    #[serde(rename = "no")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacMatch {
    pub macaddress: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthernetEntry {
    #[serde(rename = "match")]
    pub matcher: MacMatch,
    #[serde(rename = "set-name")]
    pub set_name: String,
    pub addresses: Vec<String>,
    pub dhcp4: Dhcp,
    pub dhcp6: Dhcp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteSpec>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanEntry {
    pub id: u16,
    pub link: String,
    pub addresses: Vec<String>,
    pub dhcp4: Dhcp,
    pub dhcp6: Dhcp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeEntry {
    pub interfaces: Vec<String>,
    pub addresses: Vec<String>,
    pub dhcp4: Dhcp,
    pub dhcp6: Dhcp,
}

impl NetworkDocument {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn address_list(addresses: &[CidrAddress]) -> Vec<String> {
    addresses.iter().map(|a| a.to_string()).collect()
}

/// Build the network document for one machine.
///
/// Interfaces are matched by MAC address rather than by kernel name, so the
/// name the backend gives a NIC before netplan runs does not matter.
///
/// # Errors
///
/// `ReferenceError::UnknownMachine` if the machine is not declared, or any
/// reference error found in that machine's own declaration.
pub fn compile(topology: &Topology, machine: &str) -> Result<NetworkDocument, ReferenceError> {
    let spec = topology
        .machine(machine)
        .ok_or_else(|| ReferenceError::UnknownMachine(machine.to_string()))?;
    validate_machine(topology, machine, spec)?;

    let ethernets = spec
        .interfaces
        .iter()
        .map(|(ifname, iface)| {
            let entry = EthernetEntry {
                matcher: MacMatch {
                    macaddress: iface.mac.to_string(),
                },
                set_name: ifname.clone(),
                addresses: address_list(&iface.addresses()),
                dhcp4: Dhcp::Disabled,
                dhcp6: Dhcp::Disabled,
                routes: iface.routes.clone(),
            };
            (ifname.clone(), entry)
        })
        .collect();

    let vlans = spec
        .vlans
        .iter()
        .map(|(name, vlan)| {
            let entry = VlanEntry {
                id: vlan.id,
                link: vlan.link.clone(),
                addresses: address_list(&vlan.addresses),
                dhcp4: Dhcp::Disabled,
                dhcp6: Dhcp::Disabled,
            };
            (name.clone(), entry)
        })
        .collect();

    let bridges = spec
        .bridges
        .iter()
        .map(|(name, bridge)| {
            let entry = BridgeEntry {
                interfaces: bridge.slaves.iter().cloned().collect(),
                addresses: address_list(&bridge.addresses()),
                dhcp4: Dhcp::Disabled,
                dhcp6: Dhcp::Disabled,
            };
            (name.clone(), entry)
        })
        .collect();

    Ok(NetworkDocument {
        network: NetworkSection {
            version: 2,
            renderer: "networkd".to_string(),
            ethernets,
            vlans,
            bridges,
        },
    })
}
