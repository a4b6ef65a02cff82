//! `envelope-encode`: seal a stdin payload into a base64 request envelope.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use envelope::{encode_body, random_iv, random_nonce, EncodeTrace, InnerBody, Secret, IV_LEN};
use tracing::debug;

use crate::render::{parse_iv, parse_nonce, utc_millis};

/// Encrypt a payload read from stdin into a base64 request envelope.
///
/// The envelope goes to stdout. A diagnostic trace of every intermediate
/// value goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "envelope-encode", version)]
pub struct EncodeArgs {
    /// Base64-encoded AES key (16, 24 or 32 bytes once decoded)
    pub secret: String,

    /// Fixed iv as 24 hex characters [default: random]
    #[arg(long, value_parser = parse_iv)]
    pub iv: Option<[u8; IV_LEN]>,

    /// Fixed timestamp in milliseconds since the Unix epoch [default: now]
    #[arg(long, allow_negative_numbers = true)]
    pub timestamp: Option<i64>,

    /// Fixed body nonce as 16 hex characters [default: random]
    #[arg(long, value_parser = parse_nonce)]
    pub nonce: Option<u64>,

    /// Seal a refresh body: payload only, no timestamp or nonce
    #[arg(long)]
    pub refresh: bool,
}

impl EncodeArgs {
    /// Build the inner body, filling unset header fields from the clock and CSPRNG.
    fn body(&self, payload: &str) -> InnerBody {
        if self.refresh {
            return InnerBody::refresh(payload);
        }
        let timestamp_ms = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let nonce = self.nonce.unwrap_or_else(random_nonce);
        InnerBody::standard(timestamp_ms, nonce, payload)
    }
}

/// Encode `payload` per `args`, writing the trace to `diag`.
///
/// Returns the base64 envelope; the caller prints it to stdout.
///
/// # Errors
///
/// Returns a [`common::CodecError`] for an undecodable or wrong-length secret,
/// or an I/O error if the trace cannot be written.
pub fn run(args: &EncodeArgs, payload: &str, diag: &mut impl Write) -> Result<String> {
    let secret = Secret::from_base64(&args.secret)?;
    let iv = args.iv.unwrap_or_else(random_iv);
    let body = args.body(payload);

    debug!(
        secret = %secret.fingerprint(),
        fixed_iv = args.iv.is_some(),
        refresh = args.refresh,
        "encoding envelope"
    );

    let trace = encode_body(secret.as_bytes(), &body, &iv)?;
    write_trace(diag, &body, &trace)?;
    Ok(trace.text)
}

/// Write the human-readable dump of one encode.
pub fn write_trace(w: &mut impl Write, body: &InnerBody, trace: &EncodeTrace) -> Result<()> {
    writeln!(w, "Request iv: {}", hex::encode(trace.envelope.iv))?;
    match body {
        InnerBody::Standard {
            timestamp_ms,
            nonce,
            ..
        } => {
            writeln!(
                w,
                "Request timestamp: {timestamp_ms}  -  {}",
                utc_millis(*timestamp_ms)
            )?;
            writeln!(w, "Request nonce: {nonce} or hex: {nonce:016x}")?;
        }
        InnerBody::Refresh { .. } => {
            writeln!(w, "Request body: refresh (no timestamp or nonce)")?;
        }
    }
    writeln!(w, "Request payload: --{}--", body.payload())?;
    writeln!(w)?;

    if let Some(ts) = body.timestamp_ms() {
        writeln!(w, "Timestamp hex: {}", hex::encode(ts.to_be_bytes()))?;
    }
    writeln!(w, "Payload hex: {}", hex::encode(body.payload()))?;
    writeln!(w, "Body: {}", hex::encode(&trace.body))?;
    writeln!(w, "Ciphertext: {}", hex::encode(&trace.envelope.ciphertext))?;
    writeln!(w, "Tag: {}", hex::encode(trace.envelope.tag))?;
    writeln!(w, "Envelope: {}", trace.text)?;
    writeln!(w)?;
    Ok(())
}
