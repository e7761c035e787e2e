// ABOUTME: Configuration types and parsing for topology files.
// ABOUTME: Handles YAML parsing, generated MAC reporting, and reference validation.

mod deserialize;
mod settings;
mod topology;
mod validate;

pub use settings::{Settings, WaitPolicy};
pub use topology::{BridgeSpec, InterfaceSpec, MachineSpec, RouteSpec, Topology, VlanSpec};
pub use validate::{ReferenceError, validate, validate_machine};

use crate::error::{Error, Result};
use crate::types::MachineName;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A loaded, validated topology together with the run settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub topology: Topology,
    pub settings: Settings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    switches: usize,
    machines: BTreeMap<MachineName, MachineSpec>,
    #[serde(default)]
    settings: Settings,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        let config = Config {
            topology: Topology {
                switches: file.switches,
                machines: file.machines,
            },
            settings: file.settings,
        };

        config.report_generated_macs();
        validate(&config.topology)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn report_generated_macs(&self) {
        for (name, spec) in &self.topology.machines {
            for (ifname, iface) in &spec.interfaces {
                if iface.mac_generated {
                    tracing::warn!(
                        "No MAC address declared for interface {} of machine {}, generated {}",
                        ifname,
                        name,
                        iface.mac
                    );
                }
            }
        }
    }
}
