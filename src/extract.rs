//! Splitting normalized hosts into subdomain, domain and suffix.

use std::net::IpAddr;

use crate::normalize::{Host, Label};
use crate::suffix::SuffixTrie;
use crate::types::ExtractResult;

/// Split a normalized host using `trie`.
///
/// IP literals short-circuit. Domains always produce a result: a host that is
/// entirely public suffix has an empty domain and subdomain.
pub fn extract_host(trie: &SuffixTrie, host: &Host) -> ExtractResult {
    match host {
        Host::Ipv4(ip) => ExtractResult::from_ip(IpAddr::V4(*ip)),
        Host::Ipv6(ip) => ExtractResult::from_ip(IpAddr::V6(*ip)),
        Host::Domain(labels) => split_labels(trie, labels),
    }
}

fn split_labels(trie: &SuffixTrie, labels: &[Label]) -> ExtractResult {
    let keys: Vec<&str> = labels.iter().map(|l| l.key.as_str()).collect();
    let Some(found) = trie.longest_match(&keys) else {
        return ExtractResult::default();
    };

    let n = labels.len();
    let k = found.len.min(n);
    let join = |range: &[Label]| {
        range
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(".")
    };

    let (subdomain, domain) = if n > k {
        (join(&labels[..n - k - 1]), labels[n - k - 1].text.clone())
    } else {
        (String::new(), String::new())
    };

    ExtractResult {
        subdomain,
        domain,
        suffix: join(&labels[n - k..]),
        is_private: found.is_private,
        ipv4: None,
        ipv6: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::suffix::parse_rules;

    const RULES: &str = "\
com
uk
co.uk
jp
*.kawasaki.jp
!city.kawasaki.jp
de
// ===BEGIN PRIVATE DOMAINS===
blogspot.com
// ===END PRIVATE DOMAINS===
";

    fn run(input: &str, include_private: bool) -> ExtractResult {
        let trie = SuffixTrie::new(parse_rules(RULES), include_private);
        extract_host(&trie, &normalize(input).unwrap())
    }

    fn parts(r: &ExtractResult) -> (&str, &str, &str) {
        (&r.subdomain, &r.domain, &r.suffix)
    }

    #[test]
    fn test_subdomain_domain_suffix() {
        assert_eq!(parts(&run("www.example.co.uk", false)), ("www", "example", "co.uk"));
        assert_eq!(parts(&run("a.b.example.com", false)), ("a.b", "example", "com"));
        assert_eq!(parts(&run("example.com", false)), ("", "example", "com"));
    }

    #[test]
    fn test_host_is_only_suffix() {
        assert_eq!(parts(&run("co.uk", false)), ("", "", "co.uk"));
        assert_eq!(parts(&run("com", false)), ("", "", "com"));
    }

    #[test]
    fn test_unknown_tld() {
        assert_eq!(parts(&run("foo.bar.notatld", false)), ("foo", "bar", "notatld"));
    }

    #[test]
    fn test_wildcard_and_exception() {
        assert_eq!(
            parts(&run("www.foo.kawasaki.jp", false)),
            ("", "www", "foo.kawasaki.jp")
        );
        assert_eq!(
            parts(&run("www.city.kawasaki.jp", false)),
            ("www", "city", "kawasaki.jp")
        );
    }

    #[test]
    fn test_private_rule_visibility() {
        let hidden = run("foo.blogspot.com", false);
        assert_eq!(parts(&hidden), ("foo", "blogspot", "com"));
        assert!(!hidden.is_private);

        let visible = run("foo.blogspot.com", true);
        assert_eq!(parts(&visible), ("", "foo", "blogspot.com"));
        assert!(visible.is_private);
    }

    #[test]
    fn test_unicode_labels_kept_in_output() {
        let trie = SuffixTrie::new(parse_rules("cn\n公司.cn"), false);
        let r = extract_host(&trie, &normalize("www.例子.公司.cn").unwrap());
        assert_eq!(parts(&r), ("www", "例子", "公司.cn"));

        let punycode = extract_host(&trie, &normalize("www.example.xn--55qx5d.cn").unwrap());
        assert_eq!(parts(&punycode), ("www", "example", "xn--55qx5d.cn"));
    }

    #[test]
    fn test_empty_labels_are_best_effort() {
        assert_eq!(parts(&run("a..example.com", false)), ("a.", "example", "com"));
    }

    #[test]
    fn test_ip_short_circuit() {
        let r = run("192.168.0.1", false);
        assert_eq!(r.ipv4, Some("192.168.0.1".parse().unwrap()));
        assert_eq!(parts(&r), ("", "", ""));

        let r = run("[::1]", false);
        assert_eq!(r.ipv6, Some("::1".parse().unwrap()));
        assert!(r.ipv4.is_none());
    }
}
