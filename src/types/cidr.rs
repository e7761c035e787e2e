// ABOUTME: Address/prefix strings such as "10.0.0.1/24" or "fd00::1/64".
// ABOUTME: Validated on load, rendered verbatim into network documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CidrError {
    #[error("address must be in address/prefix form: {0}")]
    MissingPrefix(String),

    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix length in {0}")]
    InvalidPrefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrAddress {
    text: String,
    address: IpAddr,
    prefix: u8,
}

impl CidrAddress {
    pub fn parse(value: &str) -> Result<Self, CidrError> {
        let (addr, prefix) = value
            .split_once('/')
            .ok_or_else(|| CidrError::MissingPrefix(value.to_string()))?;

        let address: IpAddr = addr
            .parse()
            .map_err(|_| CidrError::InvalidAddress(value.to_string()))?;

        let prefix: u8 = prefix
            .parse()
            .map_err(|_| CidrError::InvalidPrefix(value.to_string()))?;
        let max = if address.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(CidrError::InvalidPrefix(value.to_string()));
        }

        Ok(Self {
            text: value.to_string(),
            address,
            prefix,
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TryFrom<String> for CidrAddress {
    type Error = CidrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CidrAddress> for String {
    fn from(cidr: CidrAddress) -> Self {
        cidr.text
    }
}

impl fmt::Display for CidrAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
