use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::utils::is_address;
use crate::utils::normalize;
use crate::utils::short_address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a 0x-prefixed 20-byte hex address: {0:?}")]
pub struct InvalidAddress(pub String);

/// A validated, lowercase `0x`-prefixed 20-byte address.
///
/// The only way in is [`Address::parse`], so every value used as a graph key is
/// already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(value: &str) -> Result<Self, InvalidAddress> {
        let trimmed = value.trim();
        if !is_address(trimmed) {
            return Err(InvalidAddress(value.to_string()));
        }
        Ok(Self(normalize(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234…abcd`
    pub fn short(&self) -> String {
        short_address(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = InvalidAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
