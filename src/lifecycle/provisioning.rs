// ABOUTME: One machine moving through absent -> created -> configured.
// ABOUTME: Each transition consumes self and returns the next state on success.

use std::marker::PhantomData;

use crate::config::{MachineSpec, Settings, Topology};
use crate::netplan::{compile, compile_devices, render_hosts_file};
use crate::provider::{CreateRequest, Provider, post_create_steps};

use super::error::LifecycleError;
use super::state::{Absent, Configured, Created};

/// A machine being provisioned, parameterized by how far it has come.
pub struct Provisioning<'a, S> {
    topology: &'a Topology,
    settings: &'a Settings,
    name: &'a str,
    spec: &'a MachineSpec,
    provider: &'a dyn Provider,
    _state: PhantomData<S>,
}

impl<'a, S> Provisioning<'a, S> {
    fn transition<T>(self) -> Provisioning<'a, T> {
        Provisioning {
            topology: self.topology,
            settings: self.settings,
            name: self.name,
            spec: self.spec,
            provider: self.provider,
            _state: PhantomData,
        }
    }

    fn at<T>(
        topology: &'a Topology,
        settings: &'a Settings,
        name: &'a str,
        spec: &'a MachineSpec,
        provider: &'a dyn Provider,
    ) -> Provisioning<'a, T> {
        Provisioning {
            topology,
            settings,
            name,
            spec,
            provider,
            _state: PhantomData,
        }
    }
}

impl<'a> Provisioning<'a, Absent> {
    /// Start provisioning a machine the backend does not have yet.
    pub fn new(
        topology: &'a Topology,
        settings: &'a Settings,
        name: &'a str,
        spec: &'a MachineSpec,
        provider: &'a dyn Provider,
    ) -> Self {
        Self::at(topology, settings, name, spec, provider)
    }

    /// Create the machine with one bridged NIC per declared interface.
    pub async fn create(self) -> Result<Provisioning<'a, Created>, LifecycleError> {
        let devices = compile_devices(self.topology, self.settings, self.name)?;
        let request = CreateRequest {
            name: self.name,
            image_alias: &self.settings.base_image,
            devices: &devices,
        };

        tracing::info!(
            "Creating {} machine {} from image {}",
            self.provider.kind(),
            self.name,
            self.settings.base_image
        );
        self.provider
            .create(&request)
            .await
            .map_err(|e| LifecycleError::provider(self.name, e))?;

        Ok(self.transition())
    }
}

impl<'a> Provisioning<'a, Created> {
    /// Pick up a machine that already exists, to (re)write its configuration.
    pub fn existing(
        topology: &'a Topology,
        settings: &'a Settings,
        name: &'a str,
        spec: &'a MachineSpec,
        provider: &'a dyn Provider,
    ) -> Self {
        Self::at(topology, settings, name, spec, provider)
    }

    /// Place the network document and hosts file, then run post-create steps.
    pub async fn configure(self) -> Result<Provisioning<'a, Configured>, LifecycleError> {
        let document = compile(self.topology, self.name)?;
        let yaml = document.to_yaml().map_err(|source| LifecycleError::Render {
            machine: self.name.to_string(),
            source,
        })?;

        tracing::debug!("Placing network document on {}", self.name);
        self.place(&self.settings.netplan_path, &yaml).await?;

        tracing::debug!("Placing hosts file on {}", self.name);
        self.place(&self.settings.hosts_path, &render_hosts_file(self.topology))
            .await?;

        for step in post_create_steps(&self.spec.machine_type) {
            tracing::info!("Running {} on {}", step.name(), self.name);
            step.apply(self.provider, self.name)
                .await
                .map_err(|e| LifecycleError::provider(self.name, e))?;
        }

        Ok(self.transition())
    }

    async fn place(&self, path: &str, contents: &str) -> Result<(), LifecycleError> {
        self.provider
            .place_file(self.name, path, contents)
            .await
            .map_err(|e| LifecycleError::provider(self.name, e))
    }
}
