// ABOUTME: Backends the core drives: LXD containers and host networking tools.
// ABOUTME: Capability traits plus their production implementations.

mod detection;
mod error;
pub mod host;
mod lxd;
pub mod traits;

pub use detection::{DetectionError, detect_lxd_socket};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use lxd::LxdRuntime;
pub use traits::*;
