//! Long URL normalization and validation.
//!
//! Input is trimmed and, when it does not start with `scheme://`, assumed to be
//! HTTPS. The result must parse as an absolute `http`/`https` URL with a host.
//! The stored form is the trimmed (and possibly prefixed) input itself, so the
//! redirect target matches what the user submitted.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Normalizes a user-submitted long URL.
///
/// # Rules
///
/// 1. Leading and trailing whitespace is removed
/// 2. Input not starting with `scheme://` gets `https://` prepended
/// 3. Scheme must be `http` or `https`
/// 4. Host must be present and non-empty
///
/// # Errors
///
/// Returns a [`UrlNormalizationError`] describing the first rule violated.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_long_url("example.com/page").unwrap(),
///     "https://example.com/page"
/// );
/// assert!(normalize_long_url("ftp://example.com").is_err());
/// ```
pub fn normalize_long_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(candidate),
        _ => Err(UrlNormalizationError::MissingHost),
    }
}

/// Whether `input` begins with `scheme://` (RFC 3986 scheme syntax).
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
