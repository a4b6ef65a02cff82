//! Error taxonomy and decode result types shared across the envelope codec crates.

pub mod error;
pub mod protocol;

pub use error::CodecError;
pub use protocol::{Decoded, DecodedResult, ErrorResponse};
