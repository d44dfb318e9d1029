//! Parsing and rendering of call targets.

use crate::{constants::TRON_ADDRESS_PREFIX, error::AddressError};
use alloy::{hex, primitives::Address};

/// Parses a call target.
///
/// Accepted forms:
/// - EVM hex, with or without `0x`: `0x` + 40 hex digits
/// - TRON hex, with or without `0x`: `41` + 40 hex digits
///
/// The TRON form is the one a TRON node reports for deployed contracts; its leading `41` byte is
/// dropped to obtain the EVM address used in call data.
pub fn parse_target(input: &str) -> Result<Address, AddressError> {
    let invalid = || AddressError::InvalidTarget(input.to_string());

    let digits = input.trim();
    let digits = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")).unwrap_or(digits);
    let bytes = hex::decode(digits).map_err(|_| invalid())?;

    match bytes.as_slice() {
        raw if raw.len() == 20 => Ok(Address::from_slice(raw)),
        [TRON_ADDRESS_PREFIX, rest @ ..] if rest.len() == 20 => Ok(Address::from_slice(rest)),
        _ => Err(invalid()),
    }
}

/// Renders an address in TRON hex form (`41` + 40 lowercase hex digits).
pub fn to_tron_hex(address: Address) -> String {
    format!("{TRON_ADDRESS_PREFIX:02x}{}", hex::encode(address))
}
