//! Extraction engine.
//!
//! Owns the current suffix trie generation and rebuilds it on demand.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_host;
use crate::normalize::{normalize, Host};
use crate::source::{Fetcher, HttpFetcher, ListOrigin, SuffixListSpec, SuffixSource};
use crate::suffix::{parse_rules, Rule, SuffixTrie};
use crate::types::ExtractResult;

/// A built suffix trie and where its list came from
#[derive(Debug)]
pub struct Generation {
    /// Starts at 1 and increases with every successful rebuild
    pub number: u64,
    pub trie: SuffixTrie,
    pub origin: ListOrigin,
}

/// Splits hosts into subdomain, domain and public suffix.
///
/// The trie is built lazily on the first domain extraction and replaced
/// wholesale by [`refresh`](Self::refresh). Reads go through an `ArcSwap`
/// and never lock; rebuilds are serialized by a mutex and publish the new
/// trie with a single atomic store, so a reader sees either the old or the
/// new generation. A failed rebuild leaves the current generation in place.
pub struct Engine {
    source: SuffixSource,
    extra_rules: Vec<Rule>,
    current: ArcSwapOption<Generation>,
    build_lock: Mutex<()>,
}

impl Engine {
    /// Create an engine that fetches remote lists over HTTP
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout));
        Self::with_fetcher(config, fetcher)
    }

    /// Create an engine with a custom fetcher for remote lists
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let spec = config.resolve()?;

        let extra_rules = config
            .extra_suffixes
            .iter()
            .filter_map(|suffix| {
                let rule = Rule::parse(suffix.trim(), false);
                if rule.is_none() {
                    log::warn!("Ignoring malformed extra suffix {:?}", suffix);
                }
                rule
            })
            .collect();

        Ok(Self {
            source: SuffixSource::new(spec, fetcher),
            extra_rules,
            current: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        })
    }

    /// Split a hostname or URL.
    ///
    /// Fails only for unusable input (nothing left after stripping, or
    /// whitespace/control characters) or when the first trie build finds no
    /// suffix list at all.
    pub fn extract(&self, host_or_url: &str) -> Result<ExtractResult> {
        match normalize(host_or_url)? {
            Host::Ipv4(ip) => Ok(ExtractResult::from_ip(IpAddr::V4(ip))),
            Host::Ipv6(ip) => Ok(ExtractResult::from_ip(IpAddr::V6(ip))),
            host @ Host::Domain(_) => {
                let generation = self.current_or_build()?;
                Ok(extract_host(&generation.trie, &host))
            }
        }
    }

    /// Rebuild the trie.
    ///
    /// Without `force` a cached list is trusted and no remote location is
    /// contacted if a cache entry exists. With `force` remote locations are
    /// fetched again. On error the previous generation stays in use.
    pub fn refresh(&self, force: bool) -> Result<()> {
        let _guard = self.build_lock.lock();
        self.rebuild(force).map(|_| ())
    }

    /// Current generation number, 0 before the first build
    pub fn generation(&self) -> u64 {
        self.current.load_full().map_or(0, |g| g.number)
    }

    /// Current generation without triggering a build
    pub fn current_generation(&self) -> Option<Arc<Generation>> {
        self.current.load_full()
    }

    /// Rules of the current trie, building it if needed
    pub fn suffixes(&self) -> Result<Vec<String>> {
        let generation = self.current_or_build()?;
        Ok(generation
            .trie
            .rules()
            .iter()
            .map(|rule| rule.to_string())
            .collect())
    }

    /// Resolved suffix list configuration
    pub fn spec(&self) -> &SuffixListSpec {
        self.source.spec()
    }

    fn current_or_build(&self) -> Result<Arc<Generation>> {
        if let Some(generation) = self.current.load_full() {
            return Ok(generation);
        }

        let _guard = self.build_lock.lock();
        // Double-check: another thread may have built it while we waited
        if let Some(generation) = self.current.load_full() {
            return Ok(generation);
        }
        self.rebuild(false)
    }

    /// Fetch, parse and publish a new generation. Caller holds `build_lock`.
    fn rebuild(&self, force: bool) -> Result<Arc<Generation>> {
        let list = self.source.load(force)?;

        let rules = parse_rules(&list.text)
            .into_iter()
            .chain(self.extra_rules.iter().cloned());
        let trie = SuffixTrie::new(rules, self.source.spec().include_private_domains);

        let generation = Arc::new(Generation {
            number: self.generation() + 1,
            trie,
            origin: list.origin,
        });
        log::debug!(
            "Built suffix trie generation {} with {} rules from {:?}",
            generation.number,
            generation.trie.rule_count(),
            generation.origin
        );

        self.current.store(Some(generation.clone()));
        Ok(generation)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("spec", self.source.spec())
            .field("generation", &self.generation())
            .finish()
    }
}
