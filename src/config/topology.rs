// ABOUTME: Declarative topology model: switches, machines, interfaces, VLANs, bridges.
// ABOUTME: Read-only once loaded; lookups derive bridge names and bridge users.

use super::deserialize::deserialize_slaves;
use super::settings::Settings;
use crate::types::{CidrAddress, MacAddress, MachineName};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full declared test network.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Number of host bridges; bridge `i` is named `{bridge_prefix}{i}`.
    pub switches: usize,
    pub machines: BTreeMap<MachineName, MachineSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineSpec {
    #[serde(rename = "type")]
    pub machine_type: String,

    pub interfaces: BTreeMap<String, InterfaceSpec>,

    #[serde(default)]
    pub vlans: BTreeMap<String, VlanSpec>,

    #[serde(default)]
    pub bridges: BTreeMap<String, BridgeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawInterfaceSpec")]
pub struct InterfaceSpec {
    pub bridge: usize,
    pub mac: MacAddress,
    pub ipv4: Option<CidrAddress>,
    pub ipv6: Option<CidrAddress>,
    pub routes: Option<Vec<RouteSpec>>,
    /// True when `mac` was generated at load time instead of declared.
    pub mac_generated: bool,
}

impl InterfaceSpec {
    /// Present addresses, IPv4 first.
    pub fn addresses(&self) -> Vec<CidrAddress> {
        self.ipv4.iter().chain(self.ipv6.iter()).cloned().collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInterfaceSpec {
    bridge: usize,
    #[serde(default)]
    mac: Option<MacAddress>,
    #[serde(default)]
    ipv4: Option<CidrAddress>,
    #[serde(default)]
    ipv6: Option<CidrAddress>,
    #[serde(default)]
    routes: Option<Vec<RouteSpec>>,
}

impl From<RawInterfaceSpec> for InterfaceSpec {
    fn from(raw: RawInterfaceSpec) -> Self {
        let mac_generated = raw.mac.is_none();
        InterfaceSpec {
            bridge: raw.bridge,
            mac: raw.mac.unwrap_or_else(MacAddress::random),
            ipv4: raw.ipv4,
            ipv6: raw.ipv6,
            routes: raw.routes,
            mac_generated,
        }
    }
}

/// A route descriptor, copied into the network document as declared.
/// Any netplan route key is accepted; key order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSpec(serde_yaml::Mapping);

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VlanSpec {
    pub id: u16,
    pub link: String,
    #[serde(default)]
    pub addresses: Vec<CidrAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSpec {
    #[serde(deserialize_with = "deserialize_slaves")]
    pub slaves: NonEmpty<String>,
    #[serde(default)]
    pub ipv4: Option<CidrAddress>,
    #[serde(default)]
    pub ipv6: Option<CidrAddress>,
}

impl BridgeSpec {
    /// Present addresses, IPv4 first.
    pub fn addresses(&self) -> Vec<CidrAddress> {
        self.ipv4.iter().chain(self.ipv6.iter()).cloned().collect()
    }
}

impl Topology {
    /// Look up a machine by name.
    pub fn machine(&self, name: &str) -> Option<&MachineSpec> {
        self.machines.get(name)
    }

    /// Resolve the machine selection of a batch: all machines when none are given.
    pub fn select(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.machines.keys().map(|n| n.to_string()).collect()
        } else {
            requested.to_vec()
        }
    }

    /// Host bridge names in switch index order.
    pub fn bridge_names(&self, settings: &Settings) -> Vec<String> {
        (0..self.switches).map(|i| settings.bridge_name(i)).collect()
    }

    /// Machines with at least one interface attached to the given switch index.
    pub fn machines_using_bridge(&self, index: usize) -> Vec<&MachineName> {
        self.machines
            .iter()
            .filter(|(_, spec)| spec.interfaces.values().any(|i| i.bridge == index))
            .map(|(name, _)| name)
            .collect()
    }
}
