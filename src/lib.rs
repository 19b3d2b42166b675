//! tldextract-r - Split hostnames and URLs using the Public Suffix List
//!
//! This library separates a host into:
//! - subdomain (`www`)
//! - registrable domain (`example`)
//! - public suffix (`co.uk`)
//!
//! It follows the Public Suffix List algorithm including wildcard and
//! exception rules, tells ICANN suffixes from private ones, recognizes IPv4
//! and IPv6 literals and matches internationalized names through IDNA.
//!
//! # Example
//!
//! ```rust
//! use tldextract_r::{Config, Engine};
//!
//! let dir = std::env::temp_dir().join("tldextract-r-doc");
//! let config = Config::new()
//!     .with_offline(true) // bundled snapshot only
//!     .with_cache_dir(&dir);
//! let engine = Engine::new(config).unwrap();
//!
//! let result = engine.extract("https://forums.news.example.co.uk/path").unwrap();
//! assert_eq!(result.subdomain, "forums.news");
//! assert_eq!(result.domain, "example");
//! assert_eq!(result.suffix, "co.uk");
//! assert_eq!(result.registered_domain(), "example.co.uk");
//!
//! let ip = engine.extract("http://[2001:db8::1]:8080/").unwrap();
//! assert!(ip.ipv6.is_some());
//! ```
//!
//! # Suffix list sources
//!
//! | Location | Example | Behavior |
//! |----------|---------|----------|
//! | URL | `https://publicsuffix.org/list/public_suffix_list.dat` | Fetched once, then cached on disk |
//! | File | `/etc/psl/public_suffix_list.dat` or `file:///etc/psl/...` | Read on every build |
//! | Directory | `/etc/psl` | Resolved to a list file inside it |
//! | Snapshot | (built in) | Used when everything else fails |
//!
//! With no locations configured the well-known PSL URLs are used;
//! [`Config::with_offline`] drops every remote location.
//!
//! Cached lists never expire on their own; call [`Engine::refresh`] with
//! `force = true` to fetch again.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod source;
pub mod suffix;
pub mod types;

// Re-export commonly used items
pub use config::Config;
pub use engine::{Engine, Generation};
pub use error::{ExtractError, FetchErrorKind, Result};
pub use normalize::{normalize, Host, Label};
pub use source::{Fetcher, HttpFetcher, ListOrigin, Source, SuffixListSpec, SNAPSHOT, SNAPSHOT_VERSION};
pub use suffix::{parse_rules, Rule, RuleKind, SuffixTrie};
pub use types::ExtractResult;
