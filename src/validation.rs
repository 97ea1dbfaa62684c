//! Opt-in checks for values that end up as URL path segments.
//!
//! [`PowerDnsClient`](crate::PowerDnsClient) joins segments verbatim; run
//! these first when server ids or zone names come from untrusted input.
use regex::Regex;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("segment is empty")]
    Empty,
    #[error("segment too long (max 253 characters)")]
    TooLong,
    #[error("segment contains characters that would change the request URL")]
    InvalidCharacters,
    #[error("segment must not be '.' or '..'")]
    DotSegment,
    #[error("label '{0}' is empty or longer than 63 characters")]
    BadLabel(String),
}

lazy_static::lazy_static! {
    /// Unreserved URL characters, which PowerDNS ids and zone names stay within
    static ref SEGMENT_RE: Regex = Regex::new(r"^[A-Za-z0-9._~=-]+$").unwrap();
}

/// Check that `segment` survives verbatim joining into a request URL.
pub fn validate_segment(segment: &str) -> Result<(), ValidationError> {
    if segment.is_empty() {
        return Err(ValidationError::Empty);
    }
    if segment.len() > 253 {
        return Err(ValidationError::TooLong);
    }
    if segment == "." || segment == ".." {
        return Err(ValidationError::DotSegment);
    }
    if !SEGMENT_RE.is_match(segment) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Check a zone name (trailing dot optional) before using it as a segment.
pub fn validate_zone_name(zone: &str) -> Result<(), ValidationError> {
    validate_segment(zone)?;
    let d = zone.strip_suffix('.').unwrap_or(zone);
    for label in d.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(ValidationError::BadLabel(label.to_string()));
        }
    }
    Ok(())
}
