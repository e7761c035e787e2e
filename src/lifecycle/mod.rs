// ABOUTME: Machine lifecycle: provisioning, status convergence, and batch operations.
// ABOUTME: Exports state markers, the poller, and the Lifecycle orchestrator.

mod error;
mod orchestrator;
mod provisioning;
mod state;
mod wait;

pub use error::LifecycleError;
pub use orchestrator::{CreateReport, Lifecycle, MachineStatusRow};
pub use provisioning::Provisioning;
pub use state::{Absent, Configured, Created};
pub use wait::{Clock, TokioClock, WaitError, await_status};
