// ABOUTME: Per-machine container device map: one bridged NIC per declared interface.
// ABOUTME: The default eth0 is neutralised so only declared links reach the guest.

use crate::config::{ReferenceError, Settings, Topology, validate_machine};
use std::collections::BTreeMap;

/// Device name -> backend device options.
pub type DeviceMap = BTreeMap<String, BTreeMap<String, String>>;

/// Build the device map a machine is created with.
pub fn compile_devices(
    topology: &Topology,
    settings: &Settings,
    machine: &str,
) -> Result<DeviceMap, ReferenceError> {
    let spec = topology
        .machine(machine)
        .ok_or_else(|| ReferenceError::UnknownMachine(machine.to_string()))?;
    validate_machine(topology, machine, spec)?;

    let mut devices = DeviceMap::new();
    devices.insert(
        "eth0".to_string(),
        BTreeMap::from([("type".to_string(), "none".to_string())]),
    );

    for (ifname, iface) in &spec.interfaces {
        let nic = BTreeMap::from([
            ("name".to_string(), ifname.clone()),
            ("host_name".to_string(), format!("{machine}-{ifname}")),
            ("parent".to_string(), settings.bridge_name(iface.bridge)),
            ("type".to_string(), "nic".to_string()),
            ("nictype".to_string(), "bridged".to_string()),
        ]);
        devices.insert(ifname.clone(), nic);
    }

    Ok(devices)
}
