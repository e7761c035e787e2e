// ABOUTME: Host preflight: supported OS release and required host packages.
// ABOUTME: Reads /etc/os-release and asks dpkg about each package.

use crate::config::Settings;
use crate::runtime::HostError;
use crate::runtime::host::HostCommand;
use std::path::{Path, PathBuf};

const OS_RELEASE: &str = "/etc/os-release";

#[derive(Debug, thiserror::Error)]
pub enum HostCheckError {
    #[error("failed to read {}: {source}", .path.display())]
    OsRelease {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Outcome of the host preflight.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HostReport {
    /// Release codename, when the OS declares one.
    pub codename: Option<String>,
    pub os_supported: bool,
    pub missing_packages: Vec<String>,
}

impl HostReport {
    pub fn passed(&self) -> bool {
        self.os_supported && self.missing_packages.is_empty()
    }
}

pub struct HostCheck {
    cmd: HostCommand,
    os_release: PathBuf,
}

impl HostCheck {
    pub fn new(cmd: HostCommand) -> Self {
        Self {
            cmd,
            os_release: PathBuf::from(OS_RELEASE),
        }
    }

    /// Read the OS release from another file.
    pub fn with_os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    pub async fn run(&self, settings: &Settings) -> Result<HostReport, HostCheckError> {
        let codename = read_codename(&self.os_release).await?;
        let os_supported = match &codename {
            Some(name) => settings
                .supported_operating_systems
                .iter()
                .any(|s| s.eq_ignore_ascii_case(name)),
            None => false,
        };
        if os_supported {
            tracing::debug!("Host OS {:?} is supported", codename);
        } else {
            tracing::error!(
                "Host OS {} is not supported, expected one of: {}",
                codename.as_deref().unwrap_or("unknown"),
                settings.supported_operating_systems.join(", ")
            );
        }

        let mut missing_packages = Vec::new();
        for package in &settings.required_host_packages {
            if !self.package_installed(package).await? {
                tracing::error!("Required host package {} is not installed", package);
                missing_packages.push(package.clone());
            }
        }

        Ok(HostReport {
            codename,
            os_supported,
            missing_packages,
        })
    }

    async fn package_installed(&self, package: &str) -> Result<bool, HostError> {
        let output = self
            .cmd
            .run("dpkg-query", &["-W", "-f=${Status}", package])
            .await?;
        Ok(output.success && package_status_installed(&output.stdout))
    }
}

async fn read_codename(path: &Path) -> Result<Option<String>, HostCheckError> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| HostCheckError::OsRelease {
                path: path.to_path_buf(),
                source,
            })?;
    Ok(parse_codename(&content))
}

/// Extract the release codename from os-release contents.
pub fn parse_codename(os_release: &str) -> Option<String> {
    let field = |key: &str| {
        os_release.lines().find_map(|line| {
            let value = line.strip_prefix(key)?.strip_prefix('=')?;
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_lowercase())
        })
    };
    field("VERSION_CODENAME").or_else(|| field("UBUNTU_CODENAME"))
}

// dpkg reports "<want> <error> <status>", e.g. "install ok installed".
fn package_status_installed(status: &str) -> bool {
    status.split_whitespace().last() == Some("installed")
}
