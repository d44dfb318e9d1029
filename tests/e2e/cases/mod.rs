//! Test cases.

mod aggregate;
mod errors;
mod estimate;
mod nested;
mod simulate;
