//! Serde helpers.

pub mod duration;
pub mod fn_selector;
