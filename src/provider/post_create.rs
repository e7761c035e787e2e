// ABOUTME: Machine-type specific steps run after a machine is created.
// ABOUTME: A static type -> steps table, looked up the same way providers are.

use super::{Provider, ProviderError};

const IP_FORWARDING_PATH: &str = "/etc/sysctl.d/10-vnet-ip-forwarding.conf";
const IP_FORWARDING_CONF: &str = "net.ipv4.ip_forward=1\nnet.ipv6.conf.all.forwarding=1\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCreateStep {
    /// Let the machine route between its interfaces.
    EnableIpForwarding,
}

const POST_CREATE_STEPS: &[(&str, &[PostCreateStep])] =
    &[("router", &[PostCreateStep::EnableIpForwarding])];

/// Steps for a machine type. Types without a table row have none.
pub fn post_create_steps(machine_type: &str) -> &'static [PostCreateStep] {
    POST_CREATE_STEPS
        .iter()
        .find(|(t, _)| *t == machine_type)
        .map(|(_, steps)| *steps)
        .unwrap_or(&[])
}

impl PostCreateStep {
    pub fn name(&self) -> &'static str {
        match self {
            PostCreateStep::EnableIpForwarding => "enable-ip-forwarding",
        }
    }

    pub async fn apply(&self, provider: &dyn Provider, machine: &str) -> Result<(), ProviderError> {
        match self {
            PostCreateStep::EnableIpForwarding => {
                provider
                    .place_file(machine, IP_FORWARDING_PATH, IP_FORWARDING_CONF)
                    .await
            }
        }
    }
}
