// ABOUTME: Observed machine status and requested status changes.
// ABOUTME: Status values are read from the backend on every use, never cached.

use crate::lifecycle::LifecycleError;
use std::fmt;
use std::str::FromStr;

/// Live status of a machine as reported by its provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineStatus {
    /// The backend has no such machine.
    Absent,
    Running,
    Stopped,
    /// Any other backend state (frozen, error, ...), verbatim.
    Other(String),
}

impl MachineStatus {
    /// Interpret a backend status string, ignoring case.
    pub fn from_backend(value: &str) -> Self {
        if value.eq_ignore_ascii_case("running") {
            MachineStatus::Running
        } else if value.eq_ignore_ascii_case("stopped") {
            MachineStatus::Stopped
        } else {
            MachineStatus::Other(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MachineStatus::Absent => "NA",
            MachineStatus::Running => "Running",
            MachineStatus::Stopped => "Stopped",
            MachineStatus::Other(s) => s,
        }
    }
}

impl AsRef<str> for MachineStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested start or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Start,
    Stop,
}

impl StatusChange {
    /// The status the machine must reach for the change to count as done.
    pub fn target(&self) -> MachineStatus {
        match self {
            StatusChange::Start => MachineStatus::Running,
            StatusChange::Stop => MachineStatus::Stopped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusChange::Start => "start",
            StatusChange::Stop => "stop",
        }
    }

    /// Progressive form for log lines.
    pub fn verb(&self) -> &'static str {
        match self {
            StatusChange::Start => "Starting",
            StatusChange::Stop => "Stopping",
        }
    }
}

impl FromStr for StatusChange {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(StatusChange::Start),
            "stop" => Ok(StatusChange::Stop),
            other => Err(LifecycleError::UnknownStatusValue(other.to_string())),
        }
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
