//! Text helpers shared by the encode trace and the decode report.

use anyhow::Result;
use chrono::{DateTime, Utc};
use envelope::IV_LEN;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Pretty-print JSON with four-space indentation, keeping key order.
///
/// Matches the indentation the other client implementations print, so the
/// reports can be diffed line by line.
pub fn pretty_json(value: &serde_json::Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Render epoch milliseconds as a UTC timestamp.
pub fn utc_millis(ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => "<out of range>".into(),
    }
}

/// Parse a 24-character hex iv.
pub fn parse_iv(s: &str) -> Result<[u8; IV_LEN], String> {
    let mut iv = [0u8; IV_LEN];
    hex::decode_to_slice(s.trim(), &mut iv)
        .map_err(|e| format!("expected {} hex characters: {e}", IV_LEN * 2))?;
    Ok(iv)
}

/// Parse a 16-character hex body nonce.
pub fn parse_nonce(s: &str) -> Result<u64, String> {
    let mut bytes = [0u8; 8];
    hex::decode_to_slice(s.trim(), &mut bytes)
        .map_err(|e| format!("expected 16 hex characters: {e}"))?;
    Ok(u64::from_be_bytes(bytes))
}
