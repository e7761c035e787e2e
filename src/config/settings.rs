// ABOUTME: Run-wide settings: naming, backend paths, timeouts, and wait policy.
// ABOUTME: Built once from the config file's `settings` block, immutable afterwards.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Bridge device name prefix; the switch index is appended.
    pub bridge_prefix: String,

    /// Image alias new containers are created from.
    pub base_image: String,

    /// Explicit LXD socket path (overrides detection).
    pub lxd_socket: Option<PathBuf>,

    pub wait: WaitPolicy,

    /// Pause between issuing a start/stop and the first status probe.
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,

    /// Deadline applied to every individual backend call.
    #[serde(with = "humantime_serde")]
    pub backend_timeout: Duration,

    pub pcap_dir: PathBuf,

    /// In-guest path of the compiled network document.
    pub netplan_path: String,

    /// In-guest path of the generated hosts file.
    pub hosts_path: String,

    pub supported_operating_systems: Vec<String>,

    pub required_host_packages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bridge_prefix: "vnet-br".to_string(),
            base_image: "vnet-base".to_string(),
            lxd_socket: None,
            wait: WaitPolicy::default(),
            settle_delay: Duration::from_secs(1),
            backend_timeout: Duration::from_secs(60),
            pcap_dir: PathBuf::from("/tmp/vnet-pcap"),
            netplan_path: "/etc/netplan/10-vnet-config.yaml".to_string(),
            hosts_path: "/etc/hosts".to_string(),
            supported_operating_systems: vec![
                "focal".to_string(),
                "jammy".to_string(),
                "noble".to_string(),
            ],
            required_host_packages: vec![
                "iptables".to_string(),
                "tcpdump".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Name of the host bridge for a switch index.
    pub fn bridge_name(&self, index: usize) -> String {
        format!("{}{}", self.bridge_prefix, index)
    }
}

/// Bounded, linearly growing retry schedule for convergence waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitPolicy {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    pub backoff_multiplier: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy {
            max_attempts: 15,
            interval: Duration::from_secs(1),
            backoff_multiplier: 1,
        }
    }
}

impl WaitPolicy {
    /// Sleep after the `attempt`-th failed probe (1-based). Saturates at
    /// `Duration::MAX` instead of overflowing.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.interval
            .checked_mul(attempt.saturating_mul(self.backoff_multiplier))
            .unwrap_or(Duration::MAX)
    }
}
