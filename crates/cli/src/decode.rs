//! `envelope-decode`: open a base64 envelope, or echo a JSON error body.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use common::{Decoded, DecodedResult, ErrorResponse};
use envelope::{decode_with, DecodeOptions, EnvelopeFormat, Secret};
use tracing::debug;

use crate::render::{parse_nonce, pretty_json, utc_millis};

/// Decrypt an envelope read from stdin and print its contents.
///
/// A plaintext JSON body on stdin is treated as a server error response and
/// pretty-printed without decryption.
#[derive(Parser, Debug)]
#[command(name = "envelope-decode", version)]
pub struct DecodeArgs {
    /// Base64-encoded AES key (16, 24 or 32 bytes once decoded)
    pub secret: String,

    /// Expect a refresh body: payload only, no timestamp or nonce
    #[arg(long)]
    pub is_refresh: bool,

    /// Input has no leading version byte, as in server responses
    #[arg(long)]
    pub unversioned: bool,

    /// Fail unless the body nonce equals this request nonce (16 hex characters)
    #[arg(long, value_parser = parse_nonce)]
    pub expect_nonce: Option<u64>,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        let format = if self.unversioned {
            EnvelopeFormat::Unversioned
        } else {
            EnvelopeFormat::Versioned
        };
        let opts = DecodeOptions::new(self.is_refresh).with_format(format);
        match self.expect_nonce {
            Some(n) => opts.expecting_nonce(n),
            None => opts,
        }
    }
}

/// Decode `input` per `args` and write the report to `out`.
///
/// Nothing is written unless decoding succeeds.
///
/// # Errors
///
/// Returns a [`common::CodecError`] for any codec failure, or an I/O error if
/// the report cannot be written.
pub fn run(args: &DecodeArgs, input: &str, out: &mut impl Write) -> Result<()> {
    let secret = Secret::from_base64(&args.secret)?;
    let opts = args.options();
    debug!(secret = %secret.fingerprint(), ?opts, "decoding input");

    let decoded = decode_with(secret.as_bytes(), input, &opts)?;
    write_report(out, &secret, &decoded)
}

/// Write the human-readable report for one decode.
pub fn write_report(w: &mut impl Write, secret: &Secret, decoded: &Decoded) -> Result<()> {
    writeln!(w, "Secret fingerprint: {}", secret.fingerprint())?;
    writeln!(w)?;
    match decoded {
        Decoded::ErrorResponse(e) => write_error_response(w, e),
        Decoded::Envelope(r) => write_result(w, r),
    }
}

fn write_error_response(w: &mut impl Write, e: &ErrorResponse) -> Result<()> {
    writeln!(w, "Error response:")?;
    writeln!(w, "{}", pretty_json(&e.json)?)?;
    Ok(())
}

fn write_result(w: &mut impl Write, r: &DecodedResult) -> Result<()> {
    if let Some(ts) = r.timestamp_ms {
        writeln!(w, "Response timestamp: {}  ({ts})", utc_millis(ts))?;
    }
    if let Some(nonce) = r.nonce {
        writeln!(w, "Response nonce: {nonce} or hex: {nonce:016x}")?;
    }
    writeln!(w, "Response JSON:")?;
    writeln!(w, "{}", pretty_json(&r.payload)?)?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CodecError;

    const SECRET_B64: &str = "ioG3wKxAokmp+rERx6A4kM/13qhyolUXIu14WN16Spo=";
    const EMAIL_ENVELOPE: &str = "Acw8ysqYieqzgA54fifdV1TB6V+da8p/AFc8Ju/IYrD77pL7JYMJj8YqD9EsrG3d2d2j0H7kZjH41YsNLpFVCH+oce28z9L9ug==";

    fn args(extra: &[&str]) -> DecodeArgs {
        let mut argv = vec!["envelope-decode", SECRET_B64];
        argv.extend_from_slice(extra);
        DecodeArgs::try_parse_from(argv).unwrap()
    }

    fn run_to_string(args: &DecodeArgs, input: &str) -> (Result<()>, String) {
        let mut out = Vec::new();
        let r = run(args, input, &mut out);
        (r, String::from_utf8(out).unwrap())
    }

    fn codec_error(r: Result<()>) -> CodecError {
        r.unwrap_err()
            .downcast::<CodecError>()
            .expect("codec error")
    }

    #[test]
    fn standard_report() {
        let (r, out) = run_to_string(&args(&[]), &format!("{EMAIL_ENVELOPE}\n"));
        r.unwrap();
        let fingerprint = Secret::from_base64(SECRET_B64).unwrap().fingerprint();
        let expected = format!(
            "Secret fingerprint: {fingerprint}\n\
             \n\
             Response timestamp: 2022-11-08 05:33:17.644 UTC  (1667885597644)\n\
             Response nonce: 3544303950216994889 or hex: 312fe5aa08b2a049\n\
             Response JSON:\n\
             {{\n    \"email\": \"test@example.com\"\n}}\n\
             \n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn error_body_report() {
        let (r, out) = run_to_string(&args(&[]), "{\"message\":\"error\"}\n");
        r.unwrap();
        assert!(out.ends_with("Error response:\n{\n    \"message\": \"error\"\n}\n"));
        assert!(!out.contains("Response JSON"));
    }

    #[test]
    fn error_body_passes_with_wrong_length_secret() {
        let a = DecodeArgs::try_parse_from(["envelope-decode", "AAAA"]).unwrap();
        let (r, out) = run_to_string(&a, r#"{"message":"error"}"#);
        r.unwrap();
        assert!(out.contains("Error response:"));
    }

    #[test]
    fn refresh_report_has_no_header_lines() {
        let secret = Secret::from_base64(SECRET_B64).unwrap();
        let trace = envelope::encode_body(
            secret.as_bytes(),
            &envelope::InnerBody::refresh(r#"{"status":"success"}"#),
            &[3u8; 12],
        )
        .unwrap();

        let (r, out) = run_to_string(&args(&["--is-refresh"]), &trace.text);
        r.unwrap();
        assert!(!out.contains("Response timestamp"));
        assert!(!out.contains("Response nonce"));
        assert!(out.contains("\"status\": \"success\""));
    }

    #[test]
    fn unversioned_and_nonce_flags() {
        let a = args(&["--unversioned", "--expect-nonce", "312fe5aa08b2a049"]);
        let opts = a.options();
        assert_eq!(opts.format, EnvelopeFormat::Unversioned);
        assert_eq!(opts.expected_nonce, Some(0x312fe5aa08b2a049));
        assert_eq!(args(&[]).options(), DecodeOptions::default());
    }

    #[test]
    fn nonce_mismatch_writes_nothing() {
        let (r, out) = run_to_string(&args(&["--expect-nonce", "0000000000000001"]), EMAIL_ENVELOPE);
        assert!(matches!(codec_error(r), CodecError::NonceMismatch { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn wrong_key_is_authentication_error() {
        let a = DecodeArgs::try_parse_from([
            "envelope-decode",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
        ])
        .unwrap();
        let (r, out) = run_to_string(&a, EMAIL_ENVELOPE);
        assert_eq!(codec_error(r), CodecError::Authentication);
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_is_malformed() {
        let (r, _) = run_to_string(&args(&[]), "definitely not an envelope");
        assert!(matches!(codec_error(r), CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn report_never_contains_the_key() {
        let (r, out) = run_to_string(&args(&[]), EMAIL_ENVELOPE);
        r.unwrap();
        assert!(!out.contains(SECRET_B64));
        let raw = Secret::from_base64(SECRET_B64).unwrap();
        assert!(!out.contains(&hex::encode(raw.as_bytes())));
    }
}
