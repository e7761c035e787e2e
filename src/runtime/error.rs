// ABOUTME: Errors raised while locating and reaching the LXD daemon.
// ABOUTME: Classifies them so the CLI can tell a missing install from a down daemon.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("LXD socket detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime connection failed: {source}"))]
    Connection { source: RuntimeInfoError },
}

/// Why LXD could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No socket at any known install location.
    NoSocketFound,
    /// A socket path exists but nothing answered on it.
    ConnectionFailed,
    /// The daemon answered with an error.
    RuntimeOperation,
}

impl RuntimeErrorKind {
    /// What the operator should look at next.
    pub fn hint(self) -> &'static str {
        match self {
            RuntimeErrorKind::NoSocketFound => {
                "LXD does not look installed; install it or set settings.lxd_socket"
            }
            RuntimeErrorKind::ConnectionFailed => {
                "check that the LXD daemon is running and that this user may open its socket"
            }
            RuntimeErrorKind::RuntimeOperation => {
                "LXD rejected the request; run `lxd init` if the daemon was never initialised"
            }
        }
    }
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection {
                source: DetectionError::NoSocketFound,
            } => RuntimeErrorKind::NoSocketFound,
            RuntimeError::Connection {
                source: RuntimeInfoError::ConnectionFailed(_),
            } => RuntimeErrorKind::ConnectionFailed,
            RuntimeError::Connection {
                source: RuntimeInfoError::Runtime(_),
            } => RuntimeErrorKind::RuntimeOperation,
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<RuntimeInfoError> for RuntimeError {
    fn from(source: RuntimeInfoError) -> Self {
        RuntimeError::Connection { source }
    }
}
