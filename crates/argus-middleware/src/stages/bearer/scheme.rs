//! Bearer scheme matching.
//!
//! Parses a raw `authorization` value of the form `Bearer <token>`. The
//! value must split on the space character into exactly two parts; the
//! scheme word is compared ignoring ASCII case and the token is passed on
//! exactly as received.

use thiserror::Error;

/// The only scheme accepted by the bearer stage.
pub const BEARER_SCHEME: &str = "Bearer";

/// A parsed `scheme token` pair, borrowed from the raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    scheme: &'a str,
    token: &'a str,
}

impl<'a> Credential<'a> {
    /// Returns the scheme word as sent by the caller (any case).
    #[must_use]
    pub const fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// Returns the opaque token.
    #[must_use]
    pub const fn token(&self) -> &'a str {
        self.token
    }
}

/// Why a raw field value was rejected.
///
/// Used for diagnostics only; callers never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCredential {
    /// The field is absent or empty.
    #[error("authorization field is missing or empty")]
    Missing,

    /// The value did not split into exactly two parts.
    #[error("expected `<scheme> <token>`, found {0} part(s)")]
    Malformed(usize),

    /// The scheme word is not `Bearer`.
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,

    /// The token part is empty.
    #[error("bearer token is empty")]
    EmptyToken,
}

impl InvalidCredential {
    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed(_) => "malformed",
            Self::UnsupportedScheme => "unsupported_scheme",
            Self::EmptyToken => "empty_token",
        }
    }
}

/// Matches a raw `authorization` value against the bearer scheme.
///
/// # Example
///
/// ```
/// use argus_middleware::stages::bearer::{parse_bearer, InvalidCredential};
///
/// let credential = parse_bearer(Some("bEArer 1111")).unwrap();
/// assert_eq!(credential.token(), "1111");
///
/// assert_eq!(parse_bearer(Some("Bearer")), Err(InvalidCredential::Malformed(1)));
/// assert_eq!(parse_bearer(Some("Bearer ")), Err(InvalidCredential::EmptyToken));
/// assert_eq!(parse_bearer(Some("Bearer1111")), Err(InvalidCredential::Malformed(1)));
/// assert_eq!(parse_bearer(None), Err(InvalidCredential::Missing));
/// ```
pub fn parse_bearer(raw: Option<&str>) -> Result<Credential<'_>, InvalidCredential> {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return Err(InvalidCredential::Missing),
    };

    let parts: Vec<&str> = raw.split(' ').collect();
    let &[scheme, token] = parts.as_slice() else {
        return Err(InvalidCredential::Malformed(parts.len()));
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(InvalidCredential::UnsupportedScheme);
    }
    if token.is_empty() {
        return Err(InvalidCredential::EmptyToken);
    }

    Ok(Credential { scheme, token })
}
