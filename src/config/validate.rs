// ABOUTME: Cross-reference checks between machines, interfaces, switches, and providers.
// ABOUTME: Produces ReferenceError for any declaration pointing at something undeclared.

use super::topology::{MachineSpec, Topology};
use crate::provider;
use std::collections::HashMap;

/// A declaration names an entity that does not exist in the topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("there is no config entry for machine {0}")]
    UnknownMachine(String),

    #[error(
        "interface {interface} of machine {machine} is attached to bridge {bridge}, but only {switches} switch(es) are declared"
    )]
    BridgeOutOfRange {
        machine: String,
        interface: String,
        bridge: usize,
        switches: usize,
    },

    #[error("vlan {vlan} of machine {machine} links to undeclared interface {link}")]
    UnknownVlanLink {
        machine: String,
        vlan: String,
        link: String,
    },

    #[error("vlan {vlan} of machine {machine} has id {id}, expected 1-4094")]
    InvalidVlanId { machine: String, vlan: String, id: u16 },

    #[error("bridge {bridge} of machine {machine} enslaves undeclared interface {slave}")]
    UnknownBridgeSlave {
        machine: String,
        bridge: String,
        slave: String,
    },

    #[error("MAC address {mac} is assigned to both {first} and {second}")]
    DuplicateMac {
        mac: String,
        first: String,
        second: String,
    },

    #[error("machine {machine} has type {machine_type}, which no provider handles")]
    UnknownMachineType {
        machine: String,
        machine_type: String,
    },
}

/// Check every reference in the topology. Stops at the first problem.
pub fn validate(topology: &Topology) -> Result<(), ReferenceError> {
    let mut macs: HashMap<String, String> = HashMap::new();

    for (name, spec) in &topology.machines {
        if provider::kind_for(&spec.machine_type).is_none() {
            return Err(ReferenceError::UnknownMachineType {
                machine: name.to_string(),
                machine_type: spec.machine_type.clone(),
            });
        }

        validate_machine(topology, name.as_str(), spec)?;

        for (ifname, iface) in &spec.interfaces {
            let owner = format!("{name}/{ifname}");
            if let Some(first) = macs.insert(iface.mac.normalized(), owner.clone()) {
                return Err(ReferenceError::DuplicateMac {
                    mac: iface.mac.to_string(),
                    first,
                    second: owner,
                });
            }
        }
    }

    Ok(())
}

/// Checks that only involve a single machine's declaration.
pub fn validate_machine(
    topology: &Topology,
    name: &str,
    spec: &MachineSpec,
) -> Result<(), ReferenceError> {
    for (ifname, iface) in &spec.interfaces {
        if iface.bridge >= topology.switches {
            return Err(ReferenceError::BridgeOutOfRange {
                machine: name.to_string(),
                interface: ifname.clone(),
                bridge: iface.bridge,
                switches: topology.switches,
            });
        }
    }

    for (vlan_name, vlan) in &spec.vlans {
        if !(1..=4094).contains(&vlan.id) {
            return Err(ReferenceError::InvalidVlanId {
                machine: name.to_string(),
                vlan: vlan_name.clone(),
                id: vlan.id,
            });
        }
        if !spec.interfaces.contains_key(&vlan.link) {
            return Err(ReferenceError::UnknownVlanLink {
                machine: name.to_string(),
                vlan: vlan_name.clone(),
                link: vlan.link.clone(),
            });
        }
    }

    for (bridge_name, bridge) in &spec.bridges {
        for slave in bridge.slaves.iter() {
            let declared = spec.interfaces.contains_key(slave) || spec.vlans.contains_key(slave);
            if !declared {
                return Err(ReferenceError::UnknownBridgeSlave {
                    machine: name.to_string(),
                    bridge: bridge_name.clone(),
                    slave: slave.clone(),
                });
            }
        }
    }

    Ok(())
}
