// ABOUTME: Host-side backends for links, firewall rules, and processes.
// ABOUTME: Links go over netlink; firewall rules and captures run through HostCommand.

mod command;
mod iptables;
mod netlink;
mod processes;

pub use command::{CommandOutput, HostCommand};
pub use iptables::Iptables;
pub use netlink::Netlink;
pub use processes::HostProcesses;
