use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical account address used in operation contexts and condition operands.
///
/// Normalization rules:
/// - `0x` prefix followed by exactly 40 hex digits (20 bytes)
/// - stored lowercase, so checksummed and lowercase spellings compare equal
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Address(String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("address must have 40 hex digits, got {len}: {input}")]
    BadLength { input: String, len: usize },
    #[error("address contains a non-hex character: {0}")]
    NotHex(String),
}

impl Address {
    pub const HEX_LEN: usize = 40;

    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        let Some(digits) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        else {
            return Err(AddressError::MissingPrefix(input.to_string()));
        };
        if digits.len() != Self::HEX_LEN {
            return Err(AddressError::BadLength {
                input: input.to_string(),
                len: digits.len(),
            });
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::NotHex(input.to_string()));
        }
        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
