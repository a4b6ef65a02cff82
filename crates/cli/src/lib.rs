//! Shared plumbing for the `envelope-encode` and `envelope-decode` tools.

pub mod config;
pub mod decode;
pub mod encode;
pub mod render;
pub mod telemetry;

use common::CodecError;

/// Process exit status for a failed run.
///
/// Codec failures map to their own codes; anything else (I/O, config,
/// logging setup) exits with 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CodecError>()
        .map_or(1, CodecError::exit_code)
}
