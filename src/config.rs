use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories_next::ProjectDirs;

use crate::error::Result;
use crate::source::{Source, SuffixListSpec, DEFAULT_FETCH_TIMEOUT, DEFAULT_SUFFIX_LIST_URLS};

/// Environment variable overriding the default cache directory
pub const CACHE_DIR_ENV: &str = "TLDEXTRACT_CACHE";

/// Environment variable overriding the default fetch timeout, in seconds
pub const FETCH_TIMEOUT_ENV: &str = "TLDEXTRACT_CACHE_TIMEOUT";

/// Engine configuration.
///
/// Built once and handed to [`Engine::new`](crate::Engine::new); the engine
/// never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Include rules from the private-domains section of the list
    pub include_private_domains: bool,
    /// Use the bundled snapshot when no source or cache produces a list
    pub fallback_to_snapshot: bool,
    /// Suffix list locations (URLs or local paths) in priority order.
    /// An empty list means the well-known PSL URLs.
    pub suffix_list_urls: Vec<String>,
    /// Never contact the network: remote locations are dropped and only
    /// local files, the cache and the snapshot are used
    pub offline: bool,
    /// Directory for cached suffix lists
    pub cache_dir: PathBuf,
    /// Timeout for each remote request
    pub fetch_timeout: Duration,
    /// Additional suffixes treated as ICANN rules
    pub extra_suffixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_private_domains: false,
            fallback_to_snapshot: true,
            suffix_list_urls: Vec::new(),
            offline: false,
            cache_dir: default_cache_dir(),
            fetch_timeout: default_fetch_timeout(),
            extra_suffixes: Vec::new(),
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Include or exclude private-domain rules
    pub fn with_private_domains(mut self, include: bool) -> Self {
        self.include_private_domains = include;
        self
    }

    /// Enable or disable the bundled snapshot fallback
    pub fn with_fallback_to_snapshot(mut self, fallback: bool) -> Self {
        self.fallback_to_snapshot = fallback;
        self
    }

    /// Replace the suffix list locations
    pub fn with_suffix_list_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffix_list_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Disable or enable remote sources
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set cache directory
    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the remote request timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Add suffixes on top of the list
    pub fn with_extra_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_suffixes
            .extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Resolve locations into a [`SuffixListSpec`].
    ///
    /// Fails with [`InvalidSource`](crate::ExtractError::InvalidSource) for
    /// locations that are neither a URL nor a usable local file.
    pub fn resolve(&self) -> Result<SuffixListSpec> {
        let mut sources = if self.suffix_list_urls.is_empty() {
            DEFAULT_SUFFIX_LIST_URLS
                .iter()
                .map(|url| Source::parse(url))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.suffix_list_urls
                .iter()
                .map(|location| Source::parse(location))
                .collect::<Result<Vec<_>>>()?
        };
        if self.offline {
            sources.retain(|source| matches!(source, Source::File(_)));
        }

        Ok(SuffixListSpec {
            sources,
            include_private_domains: self.include_private_domains,
            fallback_to_snapshot: self.fallback_to_snapshot,
            cache_dir: self.cache_dir.clone(),
            fetch_timeout: self.fetch_timeout,
        })
    }
}

/// `$TLDEXTRACT_CACHE`, else the platform cache directory, else a temp directory
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "tldextract-r")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| env::temp_dir().join("tldextract-r"))
}

/// `$TLDEXTRACT_CACHE_TIMEOUT` seconds when valid, else [`DEFAULT_FETCH_TIMEOUT`]
pub fn default_fetch_timeout() -> Duration {
    env::var(FETCH_TIMEOUT_ENV)
        .ok()
        .and_then(|secs| secs.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(DEFAULT_FETCH_TIMEOUT)
}
