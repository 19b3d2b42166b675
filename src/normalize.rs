//! Host normalization.
//!
//! Turns a bare hostname or a full URL into either an IP literal or a
//! sequence of lowercase labels ready for suffix matching.

use std::net::{Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExtractError, Result};

/// Leading `scheme://` or a scheme-relative `//`
static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+\-.]+:)?//")
        .expect("SCHEME_PATTERN: hardcoded regex is invalid")
});

/// Dot variants accepted as label separators (ideographic and fullwidth stops)
const UNICODE_DOTS: [char; 3] = ['\u{3002}', '\u{ff0e}', '\u{ff61}'];

/// A single domain label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Lowercased label as written, used in results
    pub text: String,
    /// Matching form: ASCII, with non-ASCII labels in `xn--` punycode
    pub key: String,
}

impl Label {
    /// Build a label from raw text
    pub fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let key = label_key(&text);
        Self { text, key }
    }
}

/// Normalized host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    /// Domain name split into labels, most significant last
    Domain(Vec<Label>),
    /// IPv4 literal
    Ipv4(Ipv4Addr),
    /// IPv6 literal, with or without brackets in the input
    Ipv6(Ipv6Addr),
}

/// Convert a lowercased label to its matching form.
///
/// ASCII labels are returned unchanged. Non-ASCII labels are IDNA-encoded;
/// when encoding fails the label is kept as is and will never match a rule.
pub(crate) fn label_key(label: &str) -> String {
    if label.is_ascii() {
        return label.to_string();
    }
    match idna::domain_to_ascii(label) {
        Ok(ascii) if !ascii.is_empty() => ascii,
        _ => label.to_string(),
    }
}

/// Normalize a hostname or URL.
///
/// Fails with [`ExtractError::InvalidHost`] when nothing is left after
/// stripping scheme, path, userinfo and port, or when the host contains
/// whitespace or control characters.
pub fn normalize(input: &str) -> Result<Host> {
    let trimmed = input.trim();
    let rest = match SCHEME_PATTERN.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    };

    if let Some(ip) = parse_ipv6(authority) {
        return Ok(Host::Ipv6(ip));
    }

    let hostname = authority.split(':').next().unwrap_or_default();
    let hostname = hostname.replace(UNICODE_DOTS, ".");
    let hostname = hostname.trim_end_matches('.');

    if hostname.is_empty() {
        return Err(ExtractError::InvalidHost(format!(
            "no host found in {:?}",
            input
        )));
    }
    if let Some(c) = hostname
        .chars()
        .find(|c| c.is_control() || c.is_whitespace())
    {
        return Err(ExtractError::InvalidHost(format!(
            "illegal character {:?} in {:?}",
            c, hostname
        )));
    }

    if let Ok(ip) = hostname.parse::<Ipv4Addr>() {
        return Ok(Host::Ipv4(ip));
    }

    Ok(Host::Domain(hostname.split('.').map(Label::new).collect()))
}

/// Bracketed (`[::1]`, `[::1]:443`) or bare IPv6 literal
fn parse_ipv6(authority: &str) -> Option<Ipv6Addr> {
    if let Some(inner) = authority.strip_prefix('[') {
        let (addr, _) = inner.split_once(']')?;
        return addr.parse().ok();
    }
    authority.parse().ok()
}
