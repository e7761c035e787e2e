// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vnet::output::OutputMode;

#[derive(Parser)]
#[command(name = "vnet")]
#[command(about = "Declarative virtual network testbeds from Linux bridges and LXD containers")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputMode::Normal, global = true)]
    pub output: OutputMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show machine and bridge status
    Show {
        /// Topology file
        config: PathBuf,
    },

    /// Bring up bridges, then create and configure machines
    Create {
        /// Topology file
        config: PathBuf,

        /// Only these machines (default: all)
        #[arg(short = 'm', long = "machines", num_args = 1..)]
        machines: Vec<String>,

        /// Start a packet capture on every bridge
        #[arg(long)]
        sniffer: bool,
    },

    /// Bring up bridges, then start machines
    Start {
        /// Topology file
        config: PathBuf,

        /// Only these machines (default: all)
        #[arg(short = 'm', long = "machines", num_args = 1..)]
        machines: Vec<String>,

        /// Start a packet capture on every bridge
        #[arg(long)]
        sniffer: bool,
    },

    /// Stop machines; without --machines also bring bridges down
    Stop {
        /// Topology file
        config: PathBuf,

        /// Only these machines (default: all)
        #[arg(short = 'm', long = "machines", num_args = 1..)]
        machines: Vec<String>,
    },

    /// Destroy machines; without --machines also delete bridges
    Destroy {
        /// Topology file
        config: PathBuf,

        /// Only these machines (default: all)
        #[arg(short = 'm', long = "machines", num_args = 1..)]
        machines: Vec<String>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Load and validate a topology file
    Validate {
        /// Topology file
        config: PathBuf,
    },

    /// Print the compiled network document of one machine
    Netplan {
        /// Topology file
        config: PathBuf,

        /// Machine name
        machine: String,
    },

    /// Check that this host can run testbeds
    Check {
        /// Topology file
        config: PathBuf,
    },
}
