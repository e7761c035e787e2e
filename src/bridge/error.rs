// ABOUTME: Error types for bridge operations.
// ABOUTME: Names the bridge and the backend that failed.

use crate::runtime::HostError;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("link operation on bridge {bridge} failed: {source}")]
    Link {
        bridge: String,
        #[source]
        source: HostError,
    },

    #[error("firewall operation for bridge {bridge} failed: {source}")]
    Firewall {
        bridge: String,
        #[source]
        source: HostError,
    },

    #[error("capture on bridge {bridge} failed: {source}")]
    Capture {
        bridge: String,
        #[source]
        source: HostError,
    },
}

impl BridgeError {
    pub(crate) fn link(bridge: &str, source: HostError) -> Self {
        BridgeError::Link {
            bridge: bridge.to_string(),
            source,
        }
    }

    pub(crate) fn firewall(bridge: &str, source: HostError) -> Self {
        BridgeError::Firewall {
            bridge: bridge.to_string(),
            source,
        }
    }

    pub(crate) fn capture(bridge: &str, source: HostError) -> Self {
        BridgeError::Capture {
            bridge: bridge.to_string(),
            source,
        }
    }
}
