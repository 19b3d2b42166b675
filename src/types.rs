use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// Result of splitting a host into subdomain, registrable domain and public suffix.
///
/// For IP literals only one of `ipv4`/`ipv6` is set and every string field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ExtractResult {
    /// Labels left of the registrable domain, e.g. `www` or `a.b`
    pub subdomain: String,
    /// The label directly left of the suffix
    pub domain: String,
    /// The public suffix, e.g. `co.uk`
    pub suffix: String,
    /// Whether the suffix came from the private-domains section of the list
    pub is_private: bool,
    /// IPv4 literal host
    pub ipv4: Option<Ipv4Addr>,
    /// IPv6 literal host (brackets stripped)
    pub ipv6: Option<Ipv6Addr>,
}

impl ExtractResult {
    /// Create a result from an IP literal
    pub fn from_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Self {
                ipv4: Some(v4),
                ..Self::default()
            },
            IpAddr::V6(v6) => Self {
                ipv6: Some(v6),
                ..Self::default()
            },
        }
    }

    /// IP address of the host, if it was an IP literal
    pub fn ip(&self) -> Option<IpAddr> {
        self.ipv4
            .map(IpAddr::V4)
            .or_else(|| self.ipv6.map(IpAddr::V6))
    }

    /// Full domain name: `subdomain.domain.suffix` with empty parts omitted.
    ///
    /// Empty when there is no domain, unless the suffix itself is a private
    /// rule (a hosting platform's own name is still a meaningful host).
    pub fn fqdn(&self) -> String {
        if self.suffix.is_empty() || (self.domain.is_empty() && !self.is_private) {
            return String::new();
        }
        [&self.subdomain, &self.domain, &self.suffix]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `domain.suffix`, or empty when there is no domain
    pub fn registered_domain(&self) -> String {
        if self.suffix.is_empty() || self.domain.is_empty() {
            return String::new();
        }
        format!("{}.{}", self.domain, self.suffix)
    }

    /// Labels in reverse order with the suffix kept as one unit.
    ///
    /// `www.example.co.uk` becomes `co.uk.example.www`.
    pub fn reverse_domain_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.suffix.is_empty() {
            parts.push(&self.suffix);
        }
        if !self.domain.is_empty() {
            parts.push(&self.domain);
        }
        if !self.subdomain.is_empty() {
            parts.extend(self.subdomain.rsplit('.'));
        }
        parts.join(".")
    }

    /// Host as text: the IP literal for IP results, otherwise [`fqdn`](Self::fqdn)
    pub fn host(&self) -> String {
        match self.ip() {
            Some(ip) => ip.to_string(),
            None => self.fqdn(),
        }
    }
}

impl fmt::Display for ExtractResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.suffix, self.domain, self.subdomain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(subdomain: &str, domain: &str, suffix: &str) -> ExtractResult {
        ExtractResult {
            subdomain: subdomain.to_string(),
            domain: domain.to_string(),
            suffix: suffix.to_string(),
            ..ExtractResult::default()
        }
    }

    #[test]
    fn test_fqdn_joins_non_empty_parts() {
        assert_eq!(result("www", "example", "co.uk").fqdn(), "www.example.co.uk");
        assert_eq!(result("", "example", "com").fqdn(), "example.com");
    }

    #[test]
    fn test_fqdn_empty_without_domain() {
        assert_eq!(result("", "", "co.uk").fqdn(), "");
    }

    #[test]
    fn test_fqdn_private_suffix_without_domain() {
        let mut r = result("", "", "blogspot.com");
        r.is_private = true;
        assert_eq!(r.fqdn(), "blogspot.com");
    }

    #[test]
    fn test_registered_domain() {
        assert_eq!(
            result("a.b", "example", "co.uk").registered_domain(),
            "example.co.uk"
        );
        assert_eq!(result("", "", "com").registered_domain(), "");
    }

    #[test]
    fn test_reverse_domain_name() {
        assert_eq!(
            result("www.foo.bar", "baz", "co.uk").reverse_domain_name(),
            "co.uk.baz.bar.foo.www"
        );
        assert_eq!(result("", "example", "com").reverse_domain_name(), "com.example");
    }

    #[test]
    fn test_ip_result_has_empty_parts() {
        let r = ExtractResult::from_ip("192.168.0.1".parse().unwrap());
        assert_eq!(r.ipv4, Some(Ipv4Addr::new(192, 168, 0, 1)));
        assert!(r.ipv6.is_none());
        assert!(r.domain.is_empty() && r.suffix.is_empty() && r.subdomain.is_empty());
        assert_eq!(r.fqdn(), "");
        assert_eq!(r.host(), "192.168.0.1");
    }

    #[test]
    fn test_display_matches_cli_plain_output() {
        assert_eq!(result("www", "example", "com").to_string(), "com example www");
    }

    #[test]
    fn test_serialize_ip_as_string() {
        let r = ExtractResult::from_ip("::1".parse().unwrap());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["ipv6"], "::1");
        assert!(json["ipv4"].is_null());
    }
}
