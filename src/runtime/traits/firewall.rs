// ABOUTME: Firewall operations trait for host packet filtering.
// ABOUTME: Rules are checked before they are added so repeated runs stay no-ops.

use super::HostError;
use async_trait::async_trait;
use std::fmt;

/// A single filter rule in iptables terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallRule {
    pub chain: String,
    pub out_interface: String,
    pub target: String,
}

impl FirewallRule {
    /// Drop everything the host would send out through `ifname`.
    pub fn drop_egress(ifname: &str) -> Self {
        FirewallRule {
            chain: "OUTPUT".to_string(),
            out_interface: ifname.to_string(),
            target: "DROP".to_string(),
        }
    }

    /// Rule specification without the action flag.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.chain.clone(),
            "-o".to_string(),
            self.out_interface.clone(),
            "-j".to_string(),
            self.target.clone(),
        ]
    }
}

impl fmt::Display for FirewallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

#[async_trait]
pub trait FirewallOps: Send + Sync {
    async fn rule_exists(&self, rule: &FirewallRule) -> Result<bool, HostError>;

    async fn add_rule(&self, rule: &FirewallRule) -> Result<(), HostError>;
}
