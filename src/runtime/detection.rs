// ABOUTME: LXD socket detection on the local host.
// ABOUTME: Checks explicit config, LXD_DIR, then snap and distro package paths.

use std::path::{Path, PathBuf};

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no LXD socket found (checked LXD_DIR, snap and package install paths)")]
    NoSocketFound,
}

const SNAP_SOCKET: &str = "/var/snap/lxd/common/lxd/unix.socket";
const PACKAGE_SOCKET: &str = "/var/lib/lxd/unix.socket";

/// Locate the LXD Unix socket.
///
/// Detection order:
/// 1. Explicit path from settings (used as-is)
/// 2. `$LXD_DIR/unix.socket`
/// 3. Snap install (`/var/snap/lxd/common/lxd/unix.socket`)
/// 4. Package install (`/var/lib/lxd/unix.socket`)
pub fn detect_lxd_socket(explicit: Option<&Path>) -> Result<PathBuf, DetectionError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(dir) = std::env::var("LXD_DIR") {
        let socket = Path::new(&dir).join("unix.socket");
        if socket.exists() {
            return Ok(socket);
        }
    }

    for candidate in [SNAP_SOCKET, PACKAGE_SOCKET] {
        if Path::new(candidate).exists() {
            return Ok(PathBuf::from(candidate));
        }
    }

    Err(DetectionError::NoSocketFound)
}
