use std::fmt;

use crate::normalize::label_key;

/// Marker opening the private-domains section of the list
pub const BEGIN_PRIVATE_MARKER: &str = "// ===BEGIN PRIVATE DOMAINS===";

/// Marker closing the private-domains section of the list
pub const END_PRIVATE_MARKER: &str = "// ===END PRIVATE DOMAINS===";

/// Kind of a suffix list rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Plain rule: `co.uk`
    Normal,
    /// Wildcard rule: `*.kawasaki.jp`
    Wildcard,
    /// Exception rule: `!city.kawasaki.jp`
    Exception,
}

/// A parsed suffix list rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Labels in matching form, leftmost first, without the `*` or `!` marker
    pub labels: Vec<String>,
    pub kind: RuleKind,
    /// Rule came from the private-domains section
    pub is_private: bool,
}

impl Rule {
    /// Parse a single rule token. Returns `None` for malformed rules.
    pub fn parse(token: &str, is_private: bool) -> Option<Self> {
        let token = token.to_lowercase();

        let (kind, body) = if let Some(rest) = token.strip_prefix('!') {
            (RuleKind::Exception, rest)
        } else if token == "*" {
            (RuleKind::Wildcard, "")
        } else if let Some(rest) = token.strip_prefix("*.") {
            (RuleKind::Wildcard, rest)
        } else {
            (RuleKind::Normal, token.as_str())
        };

        let labels: Vec<String> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('.').map(label_key).collect()
        };

        if labels.is_empty() && kind != RuleKind::Wildcard {
            return None;
        }
        if labels
            .iter()
            .any(|l| l.is_empty() || l.contains(['*', '!']))
        {
            return None;
        }

        Some(Self {
            labels,
            kind,
            is_private,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RuleKind::Normal => {}
            RuleKind::Exception => f.write_str("!")?,
            RuleKind::Wildcard if self.labels.is_empty() => return f.write_str("*"),
            RuleKind::Wildcard => f.write_str("*.")?,
        }
        f.write_str(&self.labels.join("."))
    }
}

/// Parse suffix list text into rules.
///
/// Only the first whitespace-separated token of each line is read. Comments,
/// blank lines and malformed rules are skipped.
pub fn parse_rules(text: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut is_private = false;

    for line in text.lines() {
        let line = line.trim();

        if line.starts_with(BEGIN_PRIVATE_MARKER) {
            is_private = true;
            continue;
        }
        if line.starts_with(END_PRIVATE_MARKER) {
            is_private = false;
            continue;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if let Some(rule) = Rule::parse(token, is_private) {
            rules.push(rule);
        }
    }

    rules
}
