// ABOUTME: Link-layer (MAC) address type with validation and random generation.
// ABOUTME: Keeps the caller's spelling so compiled documents echo it verbatim.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacAddressError {
    #[error("MAC address must have 6 colon-separated octets: {0}")]
    WrongLength(String),

    #[error("invalid hex octet in MAC address: {0}")]
    InvalidOctet(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn parse(value: &str) -> Result<Self, MacAddressError> {
        let octets: Vec<&str> = value.split(':').collect();
        if octets.len() != 6 {
            return Err(MacAddressError::WrongLength(value.to_string()));
        }

        for octet in &octets {
            if octet.len() != 2 || u8::from_str_radix(octet, 16).is_err() {
                return Err(MacAddressError::InvalidOctet(value.to_string()));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Generate a random locally administered, unicast address.
    pub fn random() -> Self {
        let mut octets = [0u8; 6];
        rand::thread_rng().fill(&mut octets[..]);
        octets[0] = (octets[0] & 0xfe) | 0x02;
        let text = octets
            .iter()
            .map(|o| format!("{o:02x}"))
            .collect::<Vec<_>>()
            .join(":");
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive form used for uniqueness checks.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for MacAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for MacAddress {}

impl TryFrom<String> for MacAddress {
    type Error = MacAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
