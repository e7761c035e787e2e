// ABOUTME: Command module aggregator for the vnet CLI.
// ABOUTME: Re-exports the machine lifecycle and inspection command handlers.

mod backends;
mod inspect;
mod machines;

pub use inspect::{check, netplan, show, validate};
pub use machines::{create, destroy, start, stop};
