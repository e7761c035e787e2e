// ABOUTME: Batch lifecycle operations over a selection of machines.
// ABOUTME: Per-machine failures go to Diagnostics; only fatal errors end a batch.

use crate::config::{Config, MachineSpec, ReferenceError, Settings, Topology};
use crate::confirm::Confirm;
use crate::diagnostics::{Diagnostics, Failure};
use crate::provider::{MachineStatus, Provider, Providers, StatusChange};

use super::error::LifecycleError;
use super::provisioning::Provisioning;
use super::wait::{Clock, WaitError, await_status};

/// What a create batch did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub created: Vec<String>,
    /// Machines that already existed and were reconfigured after confirmation.
    pub reconfigured: Vec<String>,
    /// Machines that already existed and were left untouched.
    pub skipped: Vec<String>,
}

/// One row of the machine status table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MachineStatusRow {
    pub name: String,
    pub status: String,
    pub provider: String,
}

/// Drives machines of one topology through their provider.
pub struct Lifecycle<'a> {
    topology: &'a Topology,
    settings: &'a Settings,
    providers: &'a Providers,
    clock: &'a dyn Clock,
    confirm: &'a dyn Confirm,
}

impl<'a> Lifecycle<'a> {
    pub fn new(
        config: &'a Config,
        providers: &'a Providers,
        clock: &'a dyn Clock,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            topology: &config.topology,
            settings: &config.settings,
            providers,
            clock,
            confirm,
        }
    }

    /// Look up a machine; unknown names are recorded and skipped.
    fn lookup(&self, name: &str, diag: &mut Diagnostics) -> Option<&'a MachineSpec> {
        let spec = self.topology.machine(name);
        if spec.is_none() {
            diag.record(Failure::config_reference(
                name,
                &ReferenceError::UnknownMachine(name.to_string()),
            ));
        }
        spec
    }

    /// Live status, or `None` after recording the backend failure.
    async fn observe(
        &self,
        name: &str,
        provider: &dyn Provider,
        diag: &mut Diagnostics,
    ) -> Option<MachineStatus> {
        match provider.status(name).await {
            Ok(status) => Some(status),
            Err(e) => {
                diag.record(Failure::from_lifecycle(
                    name,
                    &LifecycleError::provider(name, e),
                ));
                None
            }
        }
    }

    /// Issue a start or stop, let the backend settle, then wait for the target status.
    async fn converge(
        &self,
        name: &str,
        provider: &dyn Provider,
        change: StatusChange,
    ) -> Result<(), LifecycleError> {
        provider
            .set_status(name, change)
            .await
            .map_err(|e| LifecycleError::provider(name, e))?;

        self.clock.sleep(self.settings.settle_delay).await;

        let target = change.target();
        tracing::debug!("Waiting for machine {} to reach status {}", name, target);
        match await_status(
            || provider.status(name),
            target.as_str(),
            &self.settings.wait,
            self.clock,
        )
        .await
        {
            Ok(_) => {
                tracing::debug!("Machine {} is {}", name, target);
                Ok(())
            }
            Err(WaitError::Timeout { target, attempts }) => {
                Err(LifecycleError::ConvergenceTimeout {
                    machine: name.to_string(),
                    target,
                    attempts,
                })
            }
            Err(WaitError::Probe(e)) => Err(LifecycleError::provider(name, e)),
        }
    }

    async fn provision(
        &self,
        name: &str,
        spec: &MachineSpec,
        provider: &dyn Provider,
    ) -> Result<(), LifecycleError> {
        Provisioning::new(self.topology, self.settings, name, spec, provider)
            .create()
            .await?
            .configure()
            .await?;
        Ok(())
    }

    /// Start or stop machines (all of them when `machines` is empty).
    ///
    /// # Errors
    ///
    /// Only `UnknownStatusValue` and `UnknownProviderType` are returned; every
    /// other failure is recorded in `diag` and the batch moves on.
    pub async fn change_machine_status(
        &self,
        machines: &[String],
        status: &str,
        diag: &mut Diagnostics,
    ) -> Result<(), LifecycleError> {
        let change: StatusChange = status.parse()?;

        for name in self.topology.select(machines) {
            let Some(spec) = self.lookup(&name, diag) else {
                continue;
            };
            let provider = self.providers.for_machine_type(&spec.machine_type)?;

            tracing::info!(
                "{} machine {} with provider {}",
                change.verb(),
                name,
                provider.kind()
            );

            match self.observe(&name, provider, diag).await {
                None => continue,
                Some(MachineStatus::Absent) => {
                    diag.record(Failure::backend(
                        &name,
                        format!("cannot {change} machine {name}, it does not exist"),
                    ));
                    continue;
                }
                Some(current) if current == change.target() => {
                    tracing::info!("Machine {} is already {}", name, current);
                    continue;
                }
                Some(_) => {}
            }

            if let Err(e) = self.converge(&name, provider, change).await {
                diag.record(Failure::from_lifecycle(&name, &e));
            }
        }

        Ok(())
    }

    /// Create and configure machines (all of them when `machines` is empty).
    ///
    /// Machines that already exist are not created again. If any are found,
    /// the confirmation gate decides whether their configuration is rewritten.
    pub async fn create_machines(
        &self,
        machines: &[String],
        diag: &mut Diagnostics,
    ) -> Result<CreateReport, LifecycleError> {
        let mut report = CreateReport::default();
        let mut existing = Vec::new();

        for name in self.topology.select(machines) {
            let Some(spec) = self.lookup(&name, diag) else {
                continue;
            };
            let provider = self.providers.for_machine_type(&spec.machine_type)?;

            match provider.exists(&name).await {
                Ok(false) => {}
                Ok(true) => {
                    tracing::warn!("Machine {} already exists, skipping creation", name);
                    existing.push(name);
                    continue;
                }
                Err(e) => {
                    diag.record(Failure::from_lifecycle(
                        &name,
                        &LifecycleError::provider(&name, e),
                    ));
                    continue;
                }
            }

            match self.provision(&name, spec, provider).await {
                Ok(()) => report.created.push(name),
                Err(e) => diag.record(Failure::from_lifecycle(&name, &e)),
            }
        }

        if existing.is_empty() {
            return Ok(report);
        }

        let message = format!(
            "The following machines already exist: {}. Their network configuration will be overwritten.",
            existing.join(", ")
        );
        if !self.confirm.confirm(&message, "Reconfigure them?") {
            tracing::info!("Leaving existing machines untouched");
            report.skipped = existing;
            return Ok(report);
        }

        for name in existing {
            let Some(spec) = self.topology.machine(&name) else {
                continue;
            };
            let provider = self.providers.for_machine_type(&spec.machine_type)?;
            let configured =
                Provisioning::existing(self.topology, self.settings, &name, spec, provider)
                    .configure()
                    .await;
            match configured {
                Ok(_) => report.reconfigured.push(name),
                Err(e) => diag.record(Failure::from_lifecycle(&name, &e)),
            }
        }

        Ok(report)
    }

    /// Destroy machines (all of them when `machines` is empty).
    ///
    /// Asks for confirmation once before anything is touched. Running machines
    /// are stopped first on a best-effort basis; machines that do not exist
    /// count as destroyed. Returns the names actually deleted.
    pub async fn destroy_machines(
        &self,
        machines: &[String],
        diag: &mut Diagnostics,
    ) -> Result<Vec<String>, LifecycleError> {
        let selection = self.topology.select(machines);
        let message = format!("About to destroy machines: {}", selection.join(", "));
        if !self.confirm.confirm(&message, "Are you sure?") {
            return Err(LifecycleError::Aborted);
        }

        let mut destroyed = Vec::new();
        for name in selection {
            let Some(spec) = self.lookup(&name, diag) else {
                continue;
            };
            let provider = self.providers.for_machine_type(&spec.machine_type)?;

            match self.observe(&name, provider, diag).await {
                None => continue,
                Some(MachineStatus::Absent) => {
                    tracing::info!("Machine {} does not exist, nothing to destroy", name);
                    continue;
                }
                Some(MachineStatus::Running) => {
                    tracing::info!("Stopping machine {} before destroying it", name);
                    if let Err(e) = self.converge(&name, provider, StatusChange::Stop).await {
                        tracing::warn!("{}, destroying anyway", e);
                    }
                }
                Some(_) => {}
            }

            tracing::info!("Destroying {} machine {}", provider.kind(), name);
            match provider.destroy(&name).await {
                Ok(()) => destroyed.push(name),
                Err(e) => {
                    let err = LifecycleError::provider(&name, e);
                    diag.record(Failure::from_lifecycle(&name, &err));
                }
            }
        }

        Ok(destroyed)
    }

    /// Status of every declared machine. Entries that cannot be resolved show `NA`.
    pub async fn machine_status_rows(&self) -> Vec<MachineStatusRow> {
        let mut rows = Vec::with_capacity(self.topology.machines.len());

        for (name, spec) in &self.topology.machines {
            let row = match self.providers.for_machine_type(&spec.machine_type) {
                Ok(provider) => {
                    let status = match provider.status(name.as_str()).await {
                        Ok(status) => status.to_string(),
                        Err(e) => {
                            tracing::warn!("Could not get status of machine {}: {}", name, e);
                            MachineStatus::Absent.to_string()
                        }
                    };
                    MachineStatusRow {
                        name: name.to_string(),
                        status,
                        provider: provider.kind().to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!("Machine {}: {}", name, e);
                    MachineStatusRow {
                        name: name.to_string(),
                        status: "NA".to_string(),
                        provider: "NA".to_string(),
                    }
                }
            };
            rows.push(row);
        }

        rows
    }
}
