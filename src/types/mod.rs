// ABOUTME: Validated domain types: machine names, MAC addresses, and CIDR addresses.
// ABOUTME: Each parses on construction and rejects invalid values.

mod cidr;
mod mac_address;
mod machine_name;

pub use cidr::{CidrAddress, CidrError};
pub use mac_address::{MacAddress, MacAddressError};
pub use machine_name::{MachineName, MachineNameError};
