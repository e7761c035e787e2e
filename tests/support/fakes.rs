// ABOUTME: In-memory stand-ins for the container, link, firewall, and process backends.
// ABOUTME: Every call is recorded so tests can assert on what was (not) mutated.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;
use std::time::Duration;
use vnet::confirm::Confirm;
use vnet::lifecycle::Clock;
use vnet::runtime::{
    ContainerError, ContainerOps, ContainerSpec, FirewallOps, FirewallRule, HostError, LinkInfo,
    LinkOps, LinkState, ProcessInfo, ProcessOps,
};
use vnet::types::MacAddress;

// =============================================================================
// Containers
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub status: String,
    pub spec: Option<ContainerSpec>,
    pub files: BTreeMap<String, String>,
}

#[derive(Default)]
struct ContainerState {
    containers: BTreeMap<String, FakeContainer>,
    /// Scripted status answers, consumed before the real status.
    scripts: BTreeMap<String, VecDeque<String>>,
    /// Containers that accept start/stop but never change status.
    stuck: BTreeSet<String>,
    calls: Vec<String>,
}

/// Container backend where start/stop take effect immediately unless stuck.
#[derive(Default)]
pub struct FakeContainers {
    state: Mutex<ContainerState>,
}

impl FakeContainers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, name: &str, status: &str) -> Self {
        self.state.lock().containers.insert(
            name.to_string(),
            FakeContainer {
                status: status.to_string(),
                spec: None,
                files: BTreeMap::new(),
            },
        );
        self
    }

    /// Answer the next status probes for `name` with these values.
    pub fn script_status(&self, name: &str, statuses: &[&str]) {
        self.state.lock().scripts.insert(
            name.to_string(),
            statuses.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn make_stuck(&self, name: &str) {
        self.state.lock().stuck.insert(name.to_string());
    }

    pub fn container(&self, name: &str) -> Option<FakeContainer> {
        self.state.lock().containers.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Calls that change backend state (everything but reads).
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("status ") && !c.starts_with("exists "))
            .collect()
    }
}

#[async_trait]
impl ContainerOps for FakeContainers {
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("exists {name}"));
        Ok(state.containers.contains_key(name))
    }

    async fn container_status(&self, name: &str) -> Result<String, ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("status {name}"));
        if let Some(next) = state.scripts.get_mut(name).and_then(|q| q.pop_front()) {
            return Ok(next);
        }
        state
            .containers
            .get(name)
            .map(|c| c.status.clone())
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("create {}", spec.name));
        if state.containers.contains_key(&spec.name) {
            return Err(ContainerError::AlreadyExists(spec.name.clone()));
        }
        state.containers.insert(
            spec.name.clone(),
            FakeContainer {
                status: "Stopped".to_string(),
                spec: Some(spec.clone()),
                files: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn start_container(&self, name: &str) -> Result<(), ContainerError> {
        self.set_status(name, "start", "Running")
    }

    async fn stop_container(&self, name: &str) -> Result<(), ContainerError> {
        self.set_status(name, "stop", "Stopped")
    }

    async fn delete_container(&self, name: &str) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("delete {name}"));
        state
            .containers
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))
    }

    async fn write_file(
        &self,
        name: &str,
        path: &str,
        contents: &[u8],
    ) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("write {name} {path}"));
        let container = state
            .containers
            .get_mut(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;
        container.files.insert(
            path.to_string(),
            String::from_utf8_lossy(contents).to_string(),
        );
        Ok(())
    }
}

impl FakeContainers {
    fn set_status(&self, name: &str, action: &str, status: &str) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("{action} {name}"));
        let stuck = state.stuck.contains(name);
        let container = state
            .containers
            .get_mut(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;
        if !stuck {
            container.status = status.to_string();
        }
        Ok(())
    }
}

// =============================================================================
// Links
// =============================================================================

#[derive(Default)]
pub struct FakeLinks {
    links: Mutex<BTreeMap<String, LinkInfo>>,
    calls: Mutex<Vec<String>>,
}

impl FakeLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bridge(self, name: &str, state: LinkState, mac: &str) -> Self {
        self.links.lock().insert(
            name.to_string(),
            LinkInfo {
                name: name.to_string(),
                state,
                mac_address: mac.to_string(),
            },
        );
        self
    }

    pub fn link(&self, name: &str) -> Option<LinkInfo> {
        self.links.lock().get(name).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn missing(ifname: &str) -> HostError {
        HostError::CommandFailed {
            command: format!("ip link ... dev {ifname}"),
            code: Some(1),
            stderr: format!("Device \"{ifname}\" does not exist."),
        }
    }
}

#[async_trait]
impl LinkOps for FakeLinks {
    async fn link_exists(&self, ifname: &str) -> Result<bool, HostError> {
        Ok(self.links.lock().contains_key(ifname))
    }

    async fn create_bridge(&self, ifname: &str) -> Result<(), HostError> {
        self.record(format!("create {ifname}"));
        self.links.lock().insert(
            ifname.to_string(),
            LinkInfo {
                name: ifname.to_string(),
                state: LinkState::Down,
                mac_address: "00:00:00:00:00:00".to_string(),
            },
        );
        Ok(())
    }

    async fn set_link_state(&self, ifname: &str, state: LinkState) -> Result<(), HostError> {
        self.record(format!("set {ifname} {state}"));
        let mut links = self.links.lock();
        let link = links.get_mut(ifname).ok_or_else(|| Self::missing(ifname))?;
        link.state = state;
        Ok(())
    }

    async fn set_link_address(&self, ifname: &str, mac: &MacAddress) -> Result<(), HostError> {
        self.record(format!("address {ifname}"));
        let mut links = self.links.lock();
        let link = links.get_mut(ifname).ok_or_else(|| Self::missing(ifname))?;
        link.mac_address = mac.to_string();
        Ok(())
    }

    async fn get_link(&self, ifname: &str) -> Result<Option<LinkInfo>, HostError> {
        Ok(self.links.lock().get(ifname).cloned())
    }

    async fn delete_link(&self, ifname: &str) -> Result<(), HostError> {
        self.record(format!("delete {ifname}"));
        self.links
            .lock()
            .remove(ifname)
            .map(|_| ())
            .ok_or_else(|| Self::missing(ifname))
    }
}

// =============================================================================
// Firewall
// =============================================================================

#[derive(Default)]
pub struct FakeFirewall {
    rules: Mutex<Vec<FirewallRule>>,
    adds: Mutex<usize>,
}

impl FakeFirewall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> Vec<FirewallRule> {
        self.rules.lock().clone()
    }

    pub fn adds(&self) -> usize {
        *self.adds.lock()
    }
}

#[async_trait]
impl FirewallOps for FakeFirewall {
    async fn rule_exists(&self, rule: &FirewallRule) -> Result<bool, HostError> {
        Ok(self.rules.lock().contains(rule))
    }

    async fn add_rule(&self, rule: &FirewallRule) -> Result<(), HostError> {
        *self.adds.lock() += 1;
        self.rules.lock().push(rule.clone());
        Ok(())
    }
}

// =============================================================================
// Processes
// =============================================================================

#[derive(Default)]
pub struct FakeProcesses {
    processes: Mutex<Vec<ProcessInfo>>,
    spawned: Mutex<Vec<String>>,
}

impl FakeProcesses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(self, cmdline: &[&str]) -> Self {
        {
            let mut processes = self.processes.lock();
            let pid = processes.len() as u32 + 100;
            processes.push(ProcessInfo {
                pid,
                cmdline: cmdline.iter().map(|s| s.to_string()).collect(),
            });
        }
        self
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().clone()
    }
}

#[async_trait]
impl ProcessOps for FakeProcesses {
    async fn spawn_capture(&self, ifname: &str, output: &Path) -> Result<(), HostError> {
        let path = output.display().to_string();
        self.spawned.lock().push(path.clone());
        let mut processes = self.processes.lock();
        let pid = processes.len() as u32 + 100;
        processes.push(ProcessInfo {
            pid,
            cmdline: vec![
                "tcpdump".to_string(),
                "-i".to_string(),
                ifname.to_string(),
                "-U".to_string(),
                "-w".to_string(),
                path,
            ],
        });
        Ok(())
    }

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, HostError> {
        Ok(self.processes.lock().clone())
    }
}

// =============================================================================
// Clock and confirmation
// =============================================================================

/// Records requested sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

/// Answers every confirmation the same way and remembers the questions.
pub struct FixedConfirm {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl FixedConfirm {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, message: &str, _prompt: &str) -> bool {
        self.asked.lock().push(message.to_string());
        self.answer
    }
}
