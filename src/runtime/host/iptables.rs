// ABOUTME: Firewall backend driven by the iptables command.
// ABOUTME: `-C` checks for a rule, `-A` appends it.

use super::command::{HostCommand, describe};
use crate::runtime::traits::{FirewallOps, FirewallRule, HostError};
use async_trait::async_trait;

pub struct Iptables {
    cmd: HostCommand,
}

impl Iptables {
    pub fn new(cmd: HostCommand) -> Self {
        Self { cmd }
    }
}

fn rule_args<'a>(action: &'a str, spec: &'a [String]) -> Vec<&'a str> {
    std::iter::once(action)
        .chain(spec.iter().map(String::as_str))
        .collect()
}

#[async_trait]
impl FirewallOps for Iptables {
    async fn rule_exists(&self, rule: &FirewallRule) -> Result<bool, HostError> {
        let spec = rule.to_args();
        let args = rule_args("-C", &spec);
        let output = self.cmd.run("iptables", &args).await?;

        match output.exit_code {
            Some(0) => Ok(true),
            // iptables reports a missing rule with status 1
            Some(1) => Ok(false),
            code => Err(HostError::CommandFailed {
                command: describe("iptables", &args),
                code,
                stderr: output.stderr,
            }),
        }
    }

    async fn add_rule(&self, rule: &FirewallRule) -> Result<(), HostError> {
        let spec = rule.to_args();
        self.cmd
            .run_checked("iptables", &rule_args("-A", &spec))
            .await?;
        Ok(())
    }
}
