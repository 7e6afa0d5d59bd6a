//! Short code generation and validation utilities.
//!
//! Codes are 7 characters of base62 (`0-9A-Za-z`). Each code is derived from
//! the current time in milliseconds mixed with a uniform random offset drawn
//! from the OS CSPRNG, then truncated to the 7 least significant digits.

use crate::error::AppError;
use serde_json::json;

/// Alphabet used for encoding, in digit order.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of characters in every generated code.
pub const SHORT_CODE_LENGTH: usize = 7;

/// 62^7, the number of distinct codes.
const CODE_SPACE: u64 = 3_521_614_606_208;

/// Random draws are masked to 42 bits (the smallest power of two above 62^7).
const DRAW_MASK: u64 = (1 << 42) - 1;

/// Generates a new short code.
///
/// The key is `unix_millis * 1000 + r` with `r` uniform in `[0, 62^7)`. Since
/// only the low 7 digits survive encoding, the code is uniformly distributed
/// over the whole code space regardless of the clock.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_short_code()?;
/// assert_eq!(code.len(), 7);
/// assert!(is_short_code(&code));
/// ```
pub fn generate_short_code() -> Result<String, AppError> {
    let millis = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
    let offset = random_below_code_space()?;

    let key = millis.wrapping_mul(1000).wrapping_add(offset);

    Ok(encode_base62(key))
}

/// Encodes an integer as exactly [`SHORT_CODE_LENGTH`] base62 characters.
///
/// Digits are produced most significant first; digits above the seventh are
/// dropped and short values are left-padded with `'0'`.
pub fn encode_base62(mut value: u64) -> String {
    let mut buf = [BASE62_ALPHABET[0]; SHORT_CODE_LENGTH];

    for slot in buf.iter_mut().rev() {
        *slot = BASE62_ALPHABET[(value % 62) as usize];
        value /= 62;
    }

    buf.iter().map(|&b| b as char).collect()
}

/// Returns true if `candidate` has the shape of a generated code.
pub fn is_short_code(candidate: &str) -> bool {
    candidate.len() == SHORT_CODE_LENGTH && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Draws a uniform integer in `[0, 62^7)` by rejection sampling.
fn random_below_code_space() -> Result<u64, AppError> {
    loop {
        let mut buffer = [0u8; 8];

        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Failed to generate random bytes",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let draw = u64::from_le_bytes(buffer) & DRAW_MASK;
        if draw < CODE_SPACE {
            return Ok(draw);
        }
    }
}
