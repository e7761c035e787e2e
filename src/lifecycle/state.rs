// ABOUTME: Provisioning state markers for the type state pattern.
// ABOUTME: Zero-sized types enforce create -> configure ordering at compile time.

/// The backend has no machine by this name.
/// Available actions: `create()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Absent;

/// The machine exists but carries no network configuration yet.
/// Available actions: `configure()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Created;

/// Network document, hosts file, and post-create steps are in place.
/// Start and stop go through the status-change batch from here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Configured;
