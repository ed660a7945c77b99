//! Time-based one-time codes for the MFA login step

use std::time::{SystemTime, UNIX_EPOCH};

use totp_rs::{Algorithm, Secret, TOTP};

use crate::error::{Error, Result};

/// Code length.
pub const DIGITS: usize = 6;

/// Seconds per code.
pub const STEP_SECS: u64 = 30;

/// Steps of clock skew the verifying server accepts on either side.
pub const SKEW_STEPS: u8 = 1;

const ISSUER: &str = "caseflow";
const ACCOUNT: &str = "e2e";

/// Generates codes for one shared secret.
pub struct OtpGenerator {
    totp: TOTP,
}

impl OtpGenerator {
    /// Build a generator from a base32 shared secret.
    ///
    /// Spaces and `=` padding are ignored and the secret is case-insensitive,
    /// matching what authenticator apps accept.
    pub fn new(secret_b32: &str) -> Result<Self> {
        let normalized: String = secret_b32
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if normalized.is_empty() {
            return Err(Error::InvalidOtpSecret("secret is empty".to_string()));
        }

        let bytes = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|e| Error::InvalidOtpSecret(format!("{:?}", e)))?;

        if bytes.is_empty() {
            return Err(Error::InvalidOtpSecret("secret decodes to no bytes".to_string()));
        }

        // Accepts secrets under 128 bits, e.g. 16 base32 characters
        let totp = TOTP::new_unchecked(
            Algorithm::SHA1,
            DIGITS,
            SKEW_STEPS,
            STEP_SECS,
            bytes,
            Some(ISSUER.to_string()),
            ACCOUNT.to_string(),
        );

        Ok(Self { totp })
    }

    /// The code for the step containing `unix_secs`.
    pub fn generate_at(&self, unix_secs: u64) -> String {
        self.totp.generate(unix_secs)
    }

    pub fn generate_now(&self) -> String {
        self.generate_at(now_epoch_secs())
    }

    /// Accept `code` for the step at `unix_secs` or one step either side.
    pub fn verify_at(&self, code: &str, unix_secs: u64) -> bool {
        let code = code.trim();
        if code.len() != DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        self.totp.check(code, unix_secs)
    }
}

impl std::fmt::Debug for OtpGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpGenerator")
            .field("digits", &DIGITS)
            .field("step", &STEP_SECS)
            .finish()
    }
}

/// One-shot generation for `(secret, time)`.
pub fn generate(secret_b32: &str, unix_secs: u64) -> Result<String> {
    Ok(OtpGenerator::new(secret_b32)?.generate_at(unix_secs))
}

/// Seconds until the code valid at `unix_secs` rolls over.
pub fn seconds_remaining(unix_secs: u64) -> u64 {
    STEP_SECS - unix_secs % STEP_SECS
}

pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
