// ABOUTME: Library root for vnet - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod bridge;
pub mod config;
pub mod confirm;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod netplan;
pub mod output;
pub mod provider;
pub mod runtime;
pub mod types;
