use std::collections::HashMap;

use super::parser::{Rule, RuleKind};

/// A node in the reversed-label suffix trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: HashMap<String, TrieNode>,
    /// A plain rule ends here
    pub is_end_of_suffix: bool,
    /// An exception rule ends here
    pub is_exception: bool,
    /// A wildcard rule ends here: any one further label is part of the suffix
    pub is_wildcard: bool,
    /// Section of the plain rule ending here
    pub end_private: bool,
    /// Section of the exception rule ending here
    pub exception_private: bool,
    /// Section of the wildcard rule ending here
    pub wildcard_private: bool,
}

impl TrieNode {
    /// Child node for a label, if any
    pub fn child(&self, label: &str) -> Option<&TrieNode> {
        self.children.get(label)
    }
}

/// Longest public suffix found for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Number of rightmost labels forming the suffix (always at least 1)
    pub len: usize,
    pub is_private: bool,
}

/// Suffix trie built from suffix list rules.
///
/// Rules are stored as reversed label paths: `co.uk` is `uk` → `co`.
/// `*.ck` sets `is_wildcard` on the `ck` node and `!www.ck` marks the `www`
/// child of `ck` as an exception. The trie is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SuffixTrie {
    root: TrieNode,
    rules: Vec<Rule>,
}

impl SuffixTrie {
    /// Build a trie from rules.
    ///
    /// Private rules are left out unless `include_private_domains` is set.
    /// Duplicate rules are inserted once.
    pub fn new(rules: impl IntoIterator<Item = Rule>, include_private_domains: bool) -> Self {
        let mut trie = Self::default();
        for rule in rules {
            if rule.is_private && !include_private_domains {
                continue;
            }
            trie.insert(rule);
        }
        trie
    }

    fn insert(&mut self, rule: Rule) {
        let mut node = &mut self.root;
        for label in rule.labels.iter().rev() {
            node = node.children.entry(label.clone()).or_default();
        }

        let (flag, private) = match rule.kind {
            RuleKind::Normal => (&mut node.is_end_of_suffix, &mut node.end_private),
            RuleKind::Wildcard => (&mut node.is_wildcard, &mut node.wildcard_private),
            RuleKind::Exception => (&mut node.is_exception, &mut node.exception_private),
        };
        if std::mem::replace(flag, true) {
            return;
        }
        *private = rule.is_private;
        self.rules.push(rule);
    }

    /// Root node
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of distinct rules in the trie
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rules in insertion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check if the trie holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the public suffix of a host given as matching-form labels,
    /// leftmost first.
    ///
    /// Walks from the top-level label down, keeping the deepest rule that
    /// applies. An exception ends the match one label short of itself and
    /// overrides every other rule. Without any matching rule the rightmost
    /// label alone is the suffix. Returns `None` only for an empty label list.
    pub fn longest_match<S: AsRef<str>>(&self, labels: &[S]) -> Option<SuffixMatch> {
        if labels.is_empty() {
            return None;
        }

        let mut best: Option<SuffixMatch> = None;
        let mut node = &self.root;

        for (depth, label) in labels.iter().rev().enumerate() {
            let child = node.child(label.as_ref());

            if let Some(c) = child.filter(|c| c.is_exception) {
                return Some(SuffixMatch {
                    len: depth,
                    is_private: c.exception_private,
                }
                .or_implicit());
            }

            if node.is_wildcard {
                best = Some(SuffixMatch {
                    len: depth + 1,
                    is_private: node.wildcard_private,
                });
            }

            match child {
                Some(c) => {
                    if c.is_end_of_suffix {
                        best = Some(SuffixMatch {
                            len: depth + 1,
                            is_private: c.end_private,
                        });
                    }
                    node = c;
                }
                None => break,
            }
        }

        Some(best.unwrap_or(SuffixMatch::IMPLICIT))
    }
}

impl SuffixMatch {
    /// The implicit `*` rule: the rightmost label alone
    const IMPLICIT: SuffixMatch = SuffixMatch {
        len: 1,
        is_private: false,
    };

    /// An exception on a top-level label leaves nothing; fall back to `*`
    fn or_implicit(self) -> Self {
        if self.len == 0 {
            Self::IMPLICIT
        } else {
            self
        }
    }
}
