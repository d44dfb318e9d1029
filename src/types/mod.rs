//! Shared primitive types.
mod address;
pub use address::*;

mod call;
pub use call::*;

mod multicall;
pub use multicall::*;

mod payload;
pub use payload::*;

mod request;
pub use request::*;
