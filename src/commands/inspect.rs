// ABOUTME: Read-only commands: show, validate, netplan, check.
// ABOUTME: None of these change machines or bridges.

use super::backends::{HostBackends, connect_providers};
use vnet::config::Config;
use vnet::confirm::TerminalConfirm;
use vnet::environment::HostCheck;
use vnet::error::{Error, Result};
use vnet::lifecycle::{Lifecycle, TokioClock};
use vnet::netplan::compile;
use vnet::output::{BRIDGE_HEADERS, MACHINE_HEADERS, Output, OutputMode};
use vnet::provider::Providers;
use vnet::runtime::RuntimeErrorKind;
use vnet::runtime::host::HostCommand;

/// Print machine and bridge status tables.
///
/// An unreachable LXD daemon is not an error here: machine rows show `NA`.
pub async fn show(config: &Config, output: Output) -> Result<()> {
    let providers = match connect_providers(config, &output).await {
        Ok(providers) => providers,
        Err(e) => {
            match e.kind() {
                RuntimeErrorKind::NoSocketFound => {
                    tracing::info!("LXD not installed, machine status unavailable")
                }
                kind => tracing::warn!("{}, machine status unavailable ({})", e, kind.hint()),
            }
            Providers::new()
        }
    };

    let lifecycle = Lifecycle::new(config, &providers, &TokioClock, &TerminalConfirm);
    let machines = lifecycle.machine_status_rows().await;
    output.table(MACHINE_HEADERS, &machines);

    let hosts = HostBackends::new(config);
    let bridges = hosts.bridges(config).status_rows().await;
    output.table(BRIDGE_HEADERS, &bridges);

    Ok(())
}

pub fn validate(config: &Config, output: Output) -> Result<()> {
    output.success(&format!(
        "Configuration is valid: {} machine(s), {} switch(es)",
        config.topology.machines.len(),
        config.topology.switches
    ));
    Ok(())
}

/// Print the compiled network document for one machine.
pub fn netplan(config: &Config, machine: &str, output: Output) -> Result<()> {
    let document = compile(&config.topology, machine)?;
    if output.mode() == OutputMode::Json {
        let json = serde_json::to_string(&document)?;
        println!("{json}");
    } else {
        print!("{}", document.to_yaml()?);
    }
    Ok(())
}

/// Check the host OS and required packages.
pub async fn check(config: &Config, output: Output) -> Result<()> {
    let report = HostCheck::new(HostCommand::new(config.settings.backend_timeout))
        .run(&config.settings)
        .await?;

    if output.mode() == OutputMode::Json {
        let json = serde_json::to_string(&report)?;
        println!("{json}");
    }

    if report.passed() {
        output.success("Host checks passed");
        Ok(())
    } else {
        let failures = usize::from(!report.os_supported) + report.missing_packages.len();
        Err(Error::PartialFailure(failures))
    }
}
