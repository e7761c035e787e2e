// ABOUTME: Generates the hosts file placed on every machine of the testbed.
// ABOUTME: Maps each declared address (prefix stripped) to its machine name.

use crate::config::Topology;
use std::fmt::Write;

const HOSTS_HEADER: &str = "\
127.0.0.1 localhost
::1 localhost ip6-localhost ip6-loopback
ff02::1 ip6-allnodes
ff02::2 ip6-allrouters
";

/// Render a hosts file listing every machine address in the topology.
pub fn render_hosts_file(topology: &Topology) -> String {
    let mut out = String::from(HOSTS_HEADER);
    out.push_str("# vnet machines\n");

    for (name, spec) in &topology.machines {
        let addresses = spec
            .interfaces
            .values()
            .flat_map(|i| i.addresses())
            .chain(spec.vlans.values().flat_map(|v| v.addresses.iter().cloned()))
            .chain(spec.bridges.values().flat_map(|b| b.addresses()));

        for address in addresses {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{} {}", address.address(), name);
        }
    }

    out
}
