//! Verification URL construction
//!
//! A badge encodes `<origin><prefix>/<identifier>`, e.g.
//! `https://smartpass.example/p/SP000123`. The prefix is a printed contract:
//! once codes are distributed, changing it breaks every one of them, so it is
//! configuration rather than a literal.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::error::{QrError, QrResult};

/// Path prefix of the public profile page
pub const DEFAULT_PATH_PREFIX: &str = "/p";

/// Longest identifier accepted, in bytes
pub const MAX_IDENTIFIER_LEN: usize = 256;

/// Characters left alone by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path segment
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Check that an identifier survives as one URL path segment
pub fn validate_identifier(identifier: &str) -> QrResult<()> {
    if identifier.trim().is_empty() {
        return Err(QrError::InvalidIdentifier(
            "identifier must not be empty".to_string(),
        ));
    }
    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(QrError::InvalidIdentifier(format!(
            "identifier is too long ({} bytes, max {MAX_IDENTIFIER_LEN})",
            identifier.len()
        )));
    }
    if identifier.chars().any(|c| c.is_ascii_control()) {
        return Err(QrError::InvalidIdentifier(
            "identifier contains control characters".to_string(),
        ));
    }
    // Dot segments are collapsed by URL normalisation
    if identifier == "." || identifier == ".." {
        return Err(QrError::InvalidIdentifier(format!(
            "'{identifier}' is not a usable path segment"
        )));
    }
    Ok(())
}

/// Builds and parses verification URLs for one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationUrl {
    origin: String,
    prefix: String,
}

impl VerificationUrl {
    /// Use the default `/p` prefix under `origin`
    pub fn new(origin: &str) -> QrResult<Self> {
        Ok(Self {
            origin: normalize_origin(origin)?,
            prefix: DEFAULT_PATH_PREFIX.to_string(),
        })
    }

    /// Replace the path prefix (`/p`, `/verify`, ...)
    pub fn with_path_prefix(mut self, prefix: &str) -> QrResult<Self> {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty()
            || trimmed
                .split('/')
                .any(|s| s.is_empty() || encode_path_segment(s) != s)
        {
            return Err(QrError::InvalidOptions(format!(
                "invalid path prefix '{prefix}'"
            )));
        }
        self.prefix = format!("/{trimmed}");
        Ok(self)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full URL for `identifier`
    pub fn build(&self, identifier: &str) -> QrResult<String> {
        validate_identifier(identifier)?;
        Ok(format!(
            "{}{}/{}",
            self.origin,
            self.prefix,
            encode_path_segment(identifier)
        ))
    }

    /// Recover the identifier from a scanned URL
    pub fn identifier_from_url(&self, scanned: &str) -> QrResult<String> {
        let not_ours = || {
            QrError::InvalidIdentifier(format!("'{scanned}' is not a verification URL"))
        };

        let rest = scanned
            .strip_prefix(self.origin.as_str())
            .and_then(|s| s.strip_prefix(self.prefix.as_str()))
            .and_then(|s| s.strip_prefix('/'))
            .ok_or_else(not_ours)?;

        if rest.is_empty() || rest.contains(['/', '?', '#']) {
            return Err(not_ours());
        }

        let identifier = percent_decode_str(rest)
            .decode_utf8()
            .map_err(|_| not_ours())?
            .into_owned();
        validate_identifier(&identifier)?;
        Ok(identifier)
    }
}

/// `scheme://host[:port]` with no trailing slash
fn normalize_origin(origin: &str) -> QrResult<String> {
    let invalid = |why: &str| QrError::InvalidOrigin(format!("'{origin}': {why}"));

    let parsed = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("origin must not carry a path, query or fragment"));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("origin must not embed credentials"));
    }

    Ok(parsed.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://smartpass.example";

    #[test]
    fn test_build_plain_identifier() {
        let url = VerificationUrl::new(ORIGIN).unwrap();
        assert_eq!(
            url.build("SP000123").unwrap(),
            "https://smartpass.example/p/SP000123"
        );
    }

    #[test]
    fn test_build_escapes_reserved_characters() {
        let url = VerificationUrl::new(ORIGIN).unwrap();
        assert_eq!(
            url.build("SP 123/X").unwrap(),
            "https://smartpass.example/p/SP%20123%2FX"
        );
        assert_eq!(
            url.build("a?b#c&d").unwrap(),
            "https://smartpass.example/p/a%3Fb%23c%26d"
        );
    }

    #[test]
    fn test_encode_matches_encode_uri_component() {
        assert_eq!(encode_path_segment("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_path_segment("é"), "%C3%A9");
        assert_eq!(encode_path_segment("a+b=c"), "a%2Bb%3Dc");
    }

    #[test]
    fn test_trailing_slash_origin() {
        let url = VerificationUrl::new("https://smartpass.example/").unwrap();
        assert_eq!(url.origin(), ORIGIN);
    }

    #[test]
    fn test_origin_keeps_port() {
        let url = VerificationUrl::new("http://localhost:3000").unwrap();
        assert_eq!(url.build("1").unwrap(), "http://localhost:3000/p/1");
    }

    #[test]
    fn test_bad_origins() {
        for bad in [
            "smartpass.example",
            "ftp://smartpass.example",
            "https://smartpass.example/admin",
            "https://smartpass.example/?x=1",
            "https://user:pw@smartpass.example",
        ] {
            assert!(
                matches!(VerificationUrl::new(bad), Err(QrError::InvalidOrigin(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_custom_prefix() {
        let url = VerificationUrl::new(ORIGIN)
            .unwrap()
            .with_path_prefix("verify/")
            .unwrap();
        assert_eq!(url.prefix(), "/verify");
        assert_eq!(
            url.build("7").unwrap(),
            "https://smartpass.example/verify/7"
        );

        assert!(VerificationUrl::new(ORIGIN).unwrap().with_path_prefix("/").is_err());
        assert!(VerificationUrl::new(ORIGIN).unwrap().with_path_prefix("a b").is_err());
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("SP000123").is_ok());
        assert!(validate_identifier("john-doe").is_ok());
        for bad in ["", "   ", ".", "..", "tab\there"] {
            assert!(
                matches!(validate_identifier(bad), Err(QrError::InvalidIdentifier(_))),
                "accepted {bad:?}"
            );
        }
        let long = "x".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(validate_identifier(&long).is_err());
    }

    #[test]
    fn test_identifier_from_url_inverts_build() {
        let url = VerificationUrl::new(ORIGIN).unwrap();
        for id in ["SP000123", "SP 123/X", "josé", "a%b"] {
            let built = url.build(id).unwrap();
            assert_eq!(url.identifier_from_url(&built).unwrap(), id);
        }
    }

    #[test]
    fn test_identifier_from_foreign_url() {
        let url = VerificationUrl::new(ORIGIN).unwrap();
        for foreign in [
            "https://other.example/p/SP1",
            "https://smartpass.example/verify/SP1",
            "https://smartpass.example/p/",
            "https://smartpass.example/p/a/b",
            "https://smartpass.example/pSP1",
        ] {
            assert!(url.identifier_from_url(foreign).is_err(), "{foreign}");
        }
    }
}
