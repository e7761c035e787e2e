// ABOUTME: Process backend: sysinfo for listing, tcpdump for captures.
// ABOUTME: Captures outlive vnet; deleting the bridge ends them.

use crate::runtime::traits::{HostError, ProcessInfo, ProcessOps};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use sysinfo::System;
use tokio::process::Command;

#[derive(Debug, Default)]
pub struct HostProcesses;

impl HostProcesses {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessOps for HostProcesses {
    async fn spawn_capture(&self, ifname: &str, output: &Path) -> Result<(), HostError> {
        let command = format!("tcpdump -i {} -U -w {}", ifname, output.display());

        if let Some(dir) = output.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| HostError::Spawn {
                    command: command.clone(),
                    source,
                })?;
        }

        // The child handle is dropped on purpose: the capture keeps running.
        Command::new("tcpdump")
            .arg("-i")
            .arg(ifname)
            .arg("-U")
            .arg("-w")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| HostError::Spawn { command, source })?;

        Ok(())
    }

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, HostError> {
        tokio::task::spawn_blocking(|| {
            let system = System::new_all();
            system
                .processes()
                .iter()
                .map(|(pid, process)| ProcessInfo {
                    pid: pid.as_u32(),
                    cmdline: process
                        .cmd()
                        .iter()
                        .map(|arg| arg.to_string_lossy().into_owned())
                        .collect(),
                })
                .collect()
        })
        .await
        .map_err(|e| HostError::Parse {
            command: "process listing".to_string(),
            message: e.to_string(),
        })
    }
}
