// ABOUTME: Entry point for the vnet CLI application.
// ABOUTME: Parses arguments, sets up logging, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use vnet::config::Config;
use vnet::error::Result;
use vnet::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("vnet=info,warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mode = cli.output;
    if let Err(e) = run(cli.command, mode).await {
        let output = Output::new(mode);
        output.error(&e.to_string());
        if let Some(hint) = e.hint() {
            output.hint(hint);
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    match command {
        Commands::Show { config } => commands::show(&Config::load(&config)?, output).await,
        Commands::Create {
            config,
            machines,
            sniffer,
        } => commands::create(&Config::load(&config)?, &machines, sniffer, output).await,
        Commands::Start {
            config,
            machines,
            sniffer,
        } => commands::start(&Config::load(&config)?, &machines, sniffer, output).await,
        Commands::Stop { config, machines } => {
            commands::stop(&Config::load(&config)?, &machines, output).await
        }
        Commands::Destroy {
            config,
            machines,
            yes,
        } => commands::destroy(&Config::load(&config)?, &machines, yes, output).await,
        Commands::Validate { config } => commands::validate(&Config::load(&config)?, output),
        Commands::Netplan { config, machine } => {
            commands::netplan(&Config::load(&config)?, &machine, output)
        }
        Commands::Check { config } => commands::check(&Config::load(&config)?, output).await,
    }
}
