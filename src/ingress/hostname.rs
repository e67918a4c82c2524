//! Hostname allow-listing.

use regex::Regex;

use crate::core::RtcnError;

/// Checks reported hostnames against the configured pattern.
///
/// By default the pattern only has to match at the start of the hostname
/// (`^(?:pattern)`), so `ABC1DEF23.example.net` passes a pattern written for
/// `ABC1DEF23`. [`HostnameValidator::full_match`] requires the whole
/// hostname to match instead.
#[derive(Debug, Clone)]
pub struct HostnameValidator {
    pattern: Regex,
}

impl HostnameValidator {
    /// Compile `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Config`] when the pattern does not compile.
    pub fn new(format: &str) -> Result<Self, RtcnError> {
        Self::compile(&format!("^(?:{format})"))
    }

    /// Compile `format` so that it must match the entire hostname.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Config`] when the pattern does not compile.
    pub fn full_match(format: &str) -> Result<Self, RtcnError> {
        Self::compile(&format!("^(?:{format})$"))
    }

    fn compile(anchored: &str) -> Result<Self, RtcnError> {
        let pattern = Regex::new(anchored)
            .map_err(|e| RtcnError::Config(format!("hostname format: {e}")))?;
        Ok(Self { pattern })
    }

    /// Return `raw` if it is an acceptable hostname.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::InvalidHostname`] for empty or non-matching input.
    pub fn validate<'a>(&self, raw: &'a str) -> Result<&'a str, RtcnError> {
        if raw.is_empty() || !self.pattern.is_match(raw) {
            return Err(RtcnError::InvalidHostname(raw.to_string()));
        }
        Ok(raw)
    }
}
