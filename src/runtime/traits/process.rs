// ABOUTME: Process operations trait for packet capture management.
// ABOUTME: Spawn detached captures and list running command lines.

use super::HostError;
use async_trait::async_trait;
use std::path::Path;

/// A running host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub cmdline: Vec<String>,
}

#[async_trait]
pub trait ProcessOps: Send + Sync {
    /// Start a capture on `ifname` writing to `output`. Returns without waiting.
    async fn spawn_capture(&self, ifname: &str, output: &Path) -> Result<(), HostError>;

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, HostError>;
}

/// Whether a capture process for `ifname` is among `processes`.
pub fn capture_running(processes: &[ProcessInfo], ifname: &str) -> bool {
    processes.iter().any(|p| {
        let is_capture = p
            .cmdline
            .first()
            .map(|program| program == "tcpdump" || program.ends_with("/tcpdump"))
            .unwrap_or(false);
        is_capture && p.cmdline.iter().any(|arg| arg == ifname)
    })
}
