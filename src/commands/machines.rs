// ABOUTME: Mutating commands: create, start, stop, destroy.
// ABOUTME: Each runs its batch to the end, then reports collected failures.

use super::backends::{HostBackends, connect_providers};
use vnet::config::Config;
use vnet::confirm::{AssumeYes, Confirm, TerminalConfirm};
use vnet::diagnostics::Diagnostics;
use vnet::error::{Error, Result};
use vnet::lifecycle::{Lifecycle, TokioClock};
use vnet::output::Output;

/// Bring up bridges, then create and configure machines.
pub async fn create(
    config: &Config,
    machines: &[String],
    sniffer: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let hosts = HostBackends::new(config);
    output.progress("Bringing up bridges");
    hosts.bridges(config).bring_up(sniffer, &mut diag).await;

    let providers = connect_providers(config, &output).await?;
    let lifecycle = Lifecycle::new(config, &providers, &TokioClock, &TerminalConfirm);

    output.progress("Creating machines");
    let report = lifecycle.create_machines(machines, &mut diag).await?;
    for name in &report.skipped {
        output.progress(&format!("  → {name} already existed, left untouched"));
    }

    finish(
        &output,
        &diag,
        &format!(
            "Created {} machine(s), reconfigured {}",
            report.created.len(),
            report.reconfigured.len()
        ),
    )
}

/// Bring up bridges, then start machines.
pub async fn start(
    config: &Config,
    machines: &[String],
    sniffer: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let hosts = HostBackends::new(config);
    output.progress("Bringing up bridges");
    hosts.bridges(config).bring_up(sniffer, &mut diag).await;

    let providers = connect_providers(config, &output).await?;
    let lifecycle = Lifecycle::new(config, &providers, &TokioClock, &TerminalConfirm);

    output.progress("Starting machines");
    lifecycle
        .change_machine_status(machines, "start", &mut diag)
        .await?;

    finish(&output, &diag, "Machines started")
}

/// Stop machines. A full stop also brings the bridges down.
pub async fn stop(config: &Config, machines: &[String], mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let providers = connect_providers(config, &output).await?;
    let lifecycle = Lifecycle::new(config, &providers, &TokioClock, &TerminalConfirm);

    output.progress("Stopping machines");
    lifecycle
        .change_machine_status(machines, "stop", &mut diag)
        .await?;

    if machines.is_empty() {
        output.progress("Bringing down bridges");
        let hosts = HostBackends::new(config);
        hosts.bridges(config).bring_down(&mut diag).await;
    }

    finish(&output, &diag, "Machines stopped")
}

/// Destroy machines. A full destroy also deletes the bridges.
pub async fn destroy(
    config: &Config,
    machines: &[String],
    yes: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let confirm: &dyn Confirm = if yes { &AssumeYes } else { &TerminalConfirm };
    let providers = connect_providers(config, &output).await?;
    let lifecycle = Lifecycle::new(config, &providers, &TokioClock, confirm);

    output.progress("Destroying machines");
    let destroyed = lifecycle.destroy_machines(machines, &mut diag).await?;

    if machines.is_empty() {
        output.progress("Deleting bridges");
        let hosts = HostBackends::new(config);
        hosts.bridges(config).delete(&mut diag).await;
    }

    finish(
        &output,
        &diag,
        &format!("Destroyed {} machine(s)", destroyed.len()),
    )
}

fn finish(output: &Output, diag: &Diagnostics, message: &str) -> Result<()> {
    if diag.has_failures() {
        for failure in diag.failures() {
            output.error(&format!("{}: {}", failure.subject, failure.message));
        }
        return Err(Error::PartialFailure(diag.len()));
    }

    output.success(message);
    Ok(())
}
