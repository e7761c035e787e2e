// ABOUTME: Test support utilities.
// ABOUTME: In-memory backends, a fake LXD socket, and shared topology fixtures.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fakes;
#[allow(dead_code)]
pub mod lxd_server;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("vnet=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Two switches, a router between two hosts.
#[allow(dead_code)]
pub const ROUTED_TOPOLOGY: &str = r#"
switches: 2
machines:
  router-100:
    type: router
    interfaces:
      eth12:
        bridge: 0
        mac: "00:16:3e:00:00:01"
        ipv4: 192.168.0.1/24
        ipv6: fc00:12::1/64
      eth13:
        bridge: 1
        mac: "00:16:3e:00:00:02"
        ipv4: 192.168.1.1/24
  host-1:
    type: host
    interfaces:
      eth12:
        bridge: 0
        mac: "00:16:3e:00:00:11"
        ipv4: 192.168.0.2/24
        routes:
          - to: default
            via: 192.168.0.1
  host-2:
    type: host
    interfaces:
      eth13:
        bridge: 1
        mac: "00:16:3e:00:00:21"
        ipv4: 192.168.1.2/24
settings:
  settle_delay: 1s
  wait:
    max_attempts: 3
    interval: 1s
    backoff_multiplier: 1
"#;
