//! Helpers for (de)serializing function selectors.

use std::str::FromStr;

use alloy::{json_abi::Function, primitives::FixedBytes};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a function selector as a `0x`-prefixed 4-byte hex string.
pub fn serialize<S>(selector: &FixedBytes<4>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    selector.serialize(serializer)
}

/// Deserialize a function selector from either a signature or a valid 4-byte hex string.
///
/// See [`Function::parse`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<FixedBytes<4>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

/// Parses a function selector from either a signature or a valid 4-byte hex string.
pub fn parse(s: &str) -> Result<FixedBytes<4>, alloy::json_abi::parser::Error> {
    FixedBytes::<4>::from_str(s).or_else(|_| Function::parse(s).map(|f| f.selector()))
}
