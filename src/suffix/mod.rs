//! Public Suffix List parsing and matching.
//!
//! ## Example
//!
//! ```
//! use tldextract_r::suffix::{parse_rules, SuffixTrie};
//!
//! let trie = SuffixTrie::new(parse_rules("uk\nco.uk\n*.ck\n!www.ck"), false);
//!
//! assert_eq!(trie.longest_match(&["www", "example", "co", "uk"]).unwrap().len, 2);
//! assert_eq!(trie.longest_match(&["foo", "bar", "ck"]).unwrap().len, 2);
//! assert_eq!(trie.longest_match(&["www", "ck"]).unwrap().len, 1);
//! ```

mod parser;
mod trie;

pub use parser::{parse_rules, Rule, RuleKind, BEGIN_PRIVATE_MARKER, END_PRIVATE_MARKER};
pub use trie::{SuffixMatch, SuffixTrie, TrieNode};
