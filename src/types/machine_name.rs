// ABOUTME: Validated machine (container) name.
// ABOUTME: Enforces the naming rules LXD applies to instance names.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineNameError {
    #[error("machine name cannot be empty")]
    Empty,

    #[error("machine name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("machine name must start with a letter")]
    InvalidStart,

    #[error("machine name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("invalid character in machine name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineName(String);

impl MachineName {
    pub fn new(value: &str) -> Result<Self, MachineNameError> {
        if value.is_empty() {
            return Err(MachineNameError::Empty);
        }

        if value.len() > 63 {
            return Err(MachineNameError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(MachineNameError::InvalidStart);
        }

        if value.ends_with('-') {
            return Err(MachineNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' {
                return Err(MachineNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MachineName {
    type Error = MachineNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<MachineName> for String {
    fn from(name: MachineName) -> Self {
        name.0
    }
}

impl Borrow<str> for MachineName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
