// ABOUTME: Integration tests for the per-machine network document, device map, and hosts file.
// ABOUTME: Checks field layout, determinism, and address ordering of compiled output.

mod support;

use proptest::prelude::*;
use serde_json::json;
use support::ROUTED_TOPOLOGY;
use vnet::config::{Config, ReferenceError};
use vnet::netplan::{compile, compile_devices, render_hosts_file};

const SINGLE_MACHINE: &str = r#"
switches: 1
machines:
  m1:
    type: lxc
    interfaces:
      eth1:
        bridge: 0
        mac: "AA:BB:CC:00:00:01"
        ipv4: 10.0.0.1/24
"#;

mod document {
    use super::*;

    #[test]
    fn single_interface_entry() {
        let config = Config::from_yaml(SINGLE_MACHINE).unwrap();
        let doc = compile(&config.topology, "m1").unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["network"]["version"], json!(2));
        assert_eq!(
            value["network"]["ethernets"]["eth1"],
            json!({
                "match": {"macaddress": "AA:BB:CC:00:00:01"},
                "set-name": "eth1",
                "addresses": ["10.0.0.1/24"],
                "dhcp4": "no",
                "dhcp6": "no",
            })
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let config = Config::from_yaml(SINGLE_MACHINE).unwrap();
        let doc = compile(&config.topology, "m1").unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value["network"].get("vlans").is_none());
        assert!(value["network"].get("bridges").is_none());
    }

    #[test]
    fn yaml_round_trips_as_strings() {
        let config = Config::from_yaml(SINGLE_MACHINE).unwrap();
        let yaml = compile(&config.topology, "m1").unwrap().to_yaml().unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let eth1 = &parsed["network"]["ethernets"]["eth1"];
        assert_eq!(eth1["dhcp4"].as_str(), Some("no"));
        assert_eq!(eth1["match"]["macaddress"].as_str(), Some("AA:BB:CC:00:00:01"));
    }

    #[test]
    fn ipv4_listed_before_ipv6_and_routes_copied() {
        let config = Config::from_yaml(ROUTED_TOPOLOGY).unwrap();

        let router = serde_json::to_value(compile(&config.topology, "router-100").unwrap()).unwrap();
        assert_eq!(
            router["network"]["ethernets"]["eth12"]["addresses"],
            json!(["192.168.0.1/24", "fc00:12::1/64"])
        );
        assert!(router["network"]["ethernets"]["eth12"].get("routes").is_none());

        let host = serde_json::to_value(compile(&config.topology, "host-1").unwrap()).unwrap();
        assert_eq!(
            host["network"]["ethernets"]["eth12"]["routes"],
            json!([{"to": "default", "via": "192.168.0.1"}])
        );
    }

    #[test]
    fn routes_are_copied_verbatim() {
        let yaml = r#"
switches: 1
machines:
  m1:
    type: host
    interfaces:
      eth1:
        bridge: 0
        mac: "00:16:3e:00:00:01"
        ipv4: 10.0.0.1/24
        routes:
          - to: 10.1.0.0/16
            scope: link
          - to: default
            via: 10.0.0.254
            table: 100
            on-link: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let doc = compile(&config.topology, "m1").unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["network"]["ethernets"]["eth1"]["routes"],
            json!([
                {"to": "10.1.0.0/16", "scope": "link"},
                {"to": "default", "via": "10.0.0.254", "table": 100, "on-link": true},
            ])
        );

        let rendered: serde_yaml::Value =
            serde_yaml::from_str(&serde_yaml::to_string(&doc).unwrap()).unwrap();
        let second = rendered["network"]["ethernets"]["eth1"]["routes"][1]
            .as_mapping()
            .unwrap();
        let keys: Vec<&str> = second.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["to", "via", "table", "on-link"]);
    }

    #[test]
    fn interface_without_addresses_has_empty_list() {
        let yaml = r#"
switches: 1
machines:
  m1:
    type: host
    interfaces:
      eth1:
        bridge: 0
        mac: "00:16:3e:00:00:01"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let value = serde_json::to_value(compile(&config.topology, "m1").unwrap()).unwrap();
        assert_eq!(value["network"]["ethernets"]["eth1"]["addresses"], json!([]));
    }

    #[test]
    fn vlans_and_bridges() {
        let yaml = r#"
switches: 1
machines:
  r1:
    type: router
    interfaces:
      eth1:
        bridge: 0
        mac: "00:16:3e:00:00:01"
      eth2:
        bridge: 0
        mac: "00:16:3e:00:00:02"
    vlans:
      vlan.10:
        id: 10
        link: eth1
        addresses: [10.10.0.1/24]
    bridges:
      br0:
        slaves: [eth2, vlan.10]
        ipv4: 10.20.0.1/24
        ipv6: fc00:20::1/64
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let value = serde_json::to_value(compile(&config.topology, "r1").unwrap()).unwrap();

        assert_eq!(
            value["network"]["vlans"]["vlan.10"],
            json!({
                "id": 10,
                "link": "eth1",
                "addresses": ["10.10.0.1/24"],
                "dhcp4": "no",
                "dhcp6": "no",
            })
        );
        assert_eq!(
            value["network"]["bridges"]["br0"],
            json!({
                "interfaces": ["eth2", "vlan.10"],
                "addresses": ["10.20.0.1/24", "fc00:20::1/64"],
                "dhcp4": "no",
                "dhcp6": "no",
            })
        );
    }

    #[test]
    fn unknown_machine() {
        let config = Config::from_yaml(SINGLE_MACHINE).unwrap();
        assert_eq!(
            compile(&config.topology, "m9").unwrap_err(),
            ReferenceError::UnknownMachine("m9".to_string())
        );
    }
}

mod devices {
    use super::*;

    #[test]
    fn one_bridged_nic_per_interface() {
        let config = Config::from_yaml(ROUTED_TOPOLOGY).unwrap();
        let devices = compile_devices(&config.topology, &config.settings, "router-100").unwrap();

        assert_eq!(devices.len(), 3);
        assert_eq!(devices["eth0"]["type"], "none");

        let eth13 = &devices["eth13"];
        assert_eq!(eth13["name"], "eth13");
        assert_eq!(eth13["host_name"], "router-100-eth13");
        assert_eq!(eth13["parent"], "vnet-br1");
        assert_eq!(eth13["type"], "nic");
        assert_eq!(eth13["nictype"], "bridged");
    }

    #[test]
    fn unknown_machine() {
        let config = Config::from_yaml(ROUTED_TOPOLOGY).unwrap();
        assert!(matches!(
            compile_devices(&config.topology, &config.settings, "m9"),
            Err(ReferenceError::UnknownMachine(_))
        ));
    }
}

mod hosts {
    use super::*;

    #[test]
    fn lists_every_machine_address() {
        let config = Config::from_yaml(ROUTED_TOPOLOGY).unwrap();
        let hosts = render_hosts_file(&config.topology);

        assert!(hosts.starts_with("127.0.0.1 localhost\n"));
        let machine_lines: Vec<&str> = hosts
            .lines()
            .skip_while(|l| *l != "# vnet machines")
            .skip(1)
            .collect();
        assert_eq!(
            machine_lines,
            vec![
                "192.168.0.2 host-1",
                "192.168.1.2 host-2",
                "192.168.0.1 router-100",
                "fc00:12::1 router-100",
                "192.168.1.1 router-100",
            ]
        );
    }
}

fn machine_yaml(octets: [u8; 4], prefix: u8, with_ipv6: bool) -> String {
    let ipv6 = if with_ipv6 {
        "        ipv6: fc00::1/64\n"
    } else {
        ""
    };
    format!(
        "switches: 1\nmachines:\n  m1:\n    type: host\n    interfaces:\n      eth1:\n        bridge: 0\n        mac: \"00:16:3e:00:00:01\"\n        ipv4: {}.{}.{}.{}/{}\n{}",
        octets[0], octets[1], octets[2], octets[3], prefix, ipv6
    )
}

proptest! {
    #[test]
    fn compile_is_deterministic(octets in any::<[u8; 4]>(), prefix in 0u8..=32, with_ipv6 in any::<bool>()) {
        let config = Config::from_yaml(&machine_yaml(octets, prefix, with_ipv6)).unwrap();
        let first = compile(&config.topology, "m1").unwrap();
        let second = compile(&config.topology, "m1").unwrap();
        prop_assert_eq!(first.to_yaml().unwrap(), second.to_yaml().unwrap());
    }

    #[test]
    fn ipv4_always_first(octets in any::<[u8; 4]>(), prefix in 0u8..=32) {
        let config = Config::from_yaml(&machine_yaml(octets, prefix, true)).unwrap();
        let doc = compile(&config.topology, "m1").unwrap();
        let addresses = &doc.network.ethernets["eth1"].addresses;
        prop_assert_eq!(addresses.len(), 2);
        let expected = format!("{}.{}.{}.{}/{}", octets[0], octets[1], octets[2], octets[3], prefix);
        prop_assert_eq!(&addresses[0], &expected);
        prop_assert_eq!(addresses[1].as_str(), "fc00::1/64");
    }
}
