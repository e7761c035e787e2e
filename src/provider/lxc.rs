// ABOUTME: LXC provider: realizes machines as system containers.
// ABOUTME: Translates provider capabilities onto any ContainerOps backend.

use super::status::{MachineStatus, StatusChange};
use super::{CreateRequest, Provider, ProviderError, ProviderKind};
use crate::runtime::{ContainerError, ContainerOps, ContainerSpec};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct LxcProvider {
    containers: Arc<dyn ContainerOps>,
}

impl LxcProvider {
    pub fn new(containers: Arc<dyn ContainerOps>) -> Self {
        Self { containers }
    }
}

#[async_trait]
impl Provider for LxcProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lxc
    }

    async fn exists(&self, name: &str) -> Result<bool, ProviderError> {
        Ok(self.containers.container_exists(name).await?)
    }

    async fn status(&self, name: &str) -> Result<MachineStatus, ProviderError> {
        match self.containers.container_status(name).await {
            Ok(status) => Ok(MachineStatus::from_backend(&status)),
            Err(ContainerError::NotFound(_)) => Ok(MachineStatus::Absent),
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, request: &CreateRequest<'_>) -> Result<(), ProviderError> {
        // Addressing comes from the netplan file, not from cloud-init.
        let config = BTreeMap::from([(
            "user.network-config".to_string(),
            "disabled".to_string(),
        )]);

        let spec = ContainerSpec {
            name: request.name.to_string(),
            image_alias: request.image_alias.to_string(),
            config,
            devices: request.devices.clone(),
        };

        self.containers.create_container(&spec).await?;
        Ok(())
    }

    async fn destroy(&self, name: &str) -> Result<(), ProviderError> {
        self.containers.delete_container(name).await?;
        Ok(())
    }

    async fn set_status(&self, name: &str, change: StatusChange) -> Result<(), ProviderError> {
        match change {
            StatusChange::Start => self.containers.start_container(name).await?,
            StatusChange::Stop => self.containers.stop_container(name).await?,
        }
        Ok(())
    }

    async fn place_file(&self, name: &str, path: &str, contents: &str) -> Result<(), ProviderError> {
        self.containers
            .write_file(name, path, contents.as_bytes())
            .await?;
        Ok(())
    }
}
