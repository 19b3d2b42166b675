//! Suffix list acquisition.
//!
//! Resolves the configured locations into raw suffix list text. Local files
//! are read directly; remote lists are fetched once and cached on disk; the
//! bundled snapshot is the last resort.

pub mod cache;
pub mod fetch;
pub mod location;

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::{ExtractError, FetchErrorKind, Result};

pub use cache::{CacheEntry, SuffixCache, CACHE_SUBDIR};
pub use fetch::{Fetcher, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
pub use location::{Source, DEFAULT_SUFFIX_LIST_URLS, RECOGNIZED_FILENAMES};

/// Upstream revision of the bundled list
pub const SNAPSHOT_VERSION: &str = "20230209.2326";

/// Suffix list compiled into the crate, used when nothing else is available.
/// This is the complete published list at [`SNAPSHOT_VERSION`].
pub const SNAPSHOT: &str = include_str!("../../data/public_suffix_list.dat");

/// Resolved suffix list configuration of one engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixListSpec {
    /// Locations in priority order
    pub sources: Vec<Source>,
    pub include_private_domains: bool,
    pub fallback_to_snapshot: bool,
    pub cache_dir: PathBuf,
    pub fetch_timeout: Duration,
}

impl SuffixListSpec {
    /// Stable cache key for this spec.
    ///
    /// Changes whenever the sources, the fallback flag or the crate version
    /// change, so a reconfigured engine never reads another setup's entry.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
        for source in &self.sources {
            hasher.update([0u8]);
            hasher.update(source.location().as_bytes());
        }
        hasher.update([0xffu8, u8::from(self.fallback_to_snapshot)]);
        let hex = format!("{:x}", hasher.finalize());
        hex[..20].to_string()
    }
}

/// Where a loaded suffix list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOrigin {
    /// Read or fetched from a configured location
    Source(Source),
    /// Cache entry of an earlier fetch
    Cache,
    /// Bundled snapshot
    Snapshot,
}

/// Raw suffix list text and its origin
#[derive(Debug, Clone)]
pub struct SuffixListText {
    pub text: Cow<'static, str>,
    pub origin: ListOrigin,
}

/// Produces suffix list text for a [`SuffixListSpec`].
pub struct SuffixSource {
    spec: SuffixListSpec,
    cache: SuffixCache,
    fetcher: Arc<dyn Fetcher>,
}

impl SuffixSource {
    /// Create a source that fetches remote lists with `fetcher`
    pub fn new(spec: SuffixListSpec, fetcher: Arc<dyn Fetcher>) -> Self {
        let cache = SuffixCache::new(&spec.cache_dir);
        Self {
            spec,
            cache,
            fetcher,
        }
    }

    /// Resolved configuration
    pub fn spec(&self) -> &SuffixListSpec {
        &self.spec
    }

    /// Backing cache
    pub fn cache(&self) -> &SuffixCache {
        &self.cache
    }

    /// Load suffix list text.
    ///
    /// Locations are tried in order. A remote location is only fetched when
    /// `force` is set or no cache entry exists yet; otherwise the cached copy
    /// stands in for it. When every location fails, a cached copy is used if
    /// one exists, then the bundled snapshot if fallback is enabled.
    pub fn load(&self, force: bool) -> Result<SuffixListText> {
        let key = self.spec.cache_key();
        let mut cached = if force { None } else { self.cache.read(&key) };

        for source in &self.spec.sources {
            if matches!(source, Source::Remote(_)) {
                if let Some(entry) = cached.take() {
                    log::debug!(
                        "Using cached suffix list {} in place of {}",
                        self.cache.entry_path(&key).display(),
                        source
                    );
                    return Ok(SuffixListText {
                        text: Cow::Owned(entry.text),
                        origin: ListOrigin::Cache,
                    });
                }
            }

            match self.read_source(source) {
                Ok(text) => {
                    log::debug!("Loaded suffix list from {}", source);
                    if matches!(source, Source::Remote(_)) {
                        if let Err(e) = self.cache.write(&key, &text) {
                            log::warn!("Failed to cache suffix list from {}: {}", source, e);
                        }
                    }
                    return Ok(SuffixListText {
                        text: Cow::Owned(text),
                        origin: ListOrigin::Source(source.clone()),
                    });
                }
                Err(e) => log::warn!("Suffix list source {} failed: {}", source, e),
            }
        }

        if let Some(entry) = cached.or_else(|| self.cache.read(&key)) {
            log::warn!("All suffix list sources failed, using cached copy");
            return Ok(SuffixListText {
                text: Cow::Owned(entry.text),
                origin: ListOrigin::Cache,
            });
        }

        if self.spec.fallback_to_snapshot {
            if !self.spec.sources.is_empty() {
                log::warn!("All suffix list sources failed, using bundled snapshot");
            }
            return Ok(SuffixListText {
                text: Cow::Borrowed(SNAPSHOT),
                origin: ListOrigin::Snapshot,
            });
        }

        Err(ExtractError::SuffixListUnavailable(format!(
            "none of {} configured source(s) produced a suffix list and snapshot fallback is disabled",
            self.spec.sources.len()
        )))
    }

    fn read_source(&self, source: &Source) -> Result<String> {
        let text = match source {
            Source::File(path) => fs::read_to_string(path).map_err(|e| {
                ExtractError::fetch(
                    FetchErrorKind::Io,
                    format!("failed to read {}: {}", path.display(), e),
                )
            })?,
            Source::Remote(url) => self.fetcher.fetch(url)?,
        };

        if text.trim().is_empty() {
            return Err(ExtractError::fetch(
                FetchErrorKind::InvalidData,
                format!("{} is empty", source.location()),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spec(sources: Vec<Source>, fallback: bool, cache_dir: &std::path::Path) -> SuffixListSpec {
        SuffixListSpec {
            sources,
            include_private_domains: false,
            fallback_to_snapshot: fallback,
            cache_dir: cache_dir.to_path_buf(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    fn remote(url: &str) -> Source {
        Source::Remote(url.to_string())
    }

    /// Fetcher answering with `body` and counting calls
    fn counting(body: &'static str, calls: Arc<AtomicUsize>) -> Arc<dyn Fetcher> {
        Arc::new(move |_url: &str| -> Result<String> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(body.to_string())
        })
    }

    fn failing() -> Arc<dyn Fetcher> {
        Arc::new(|url: &str| -> Result<String> {
            Err(ExtractError::fetch(FetchErrorKind::Http, format!("{} down", url)))
        })
    }

    #[test]
    fn test_snapshot_is_parseable() {
        let rules = crate::suffix::parse_rules(SNAPSHOT);
        assert!(rules.iter().any(|r| r.to_string() == "co.uk"));
        assert!(rules.iter().any(|r| r.is_private));
        assert!(rules.len() > 9000, "snapshot has only {} rules", rules.len());
    }

    #[test]
    fn test_cache_key_depends_on_sources_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let a = spec(vec![remote("https://a.example/list.dat")], true, dir.path());
        let b = spec(vec![remote("https://b.example/list.dat")], true, dir.path());
        let c = spec(vec![remote("https://a.example/list.dat")], false, dir.path());

        assert_eq!(a.cache_key(), a.clone().cache_key());
        assert_ne!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert_eq!(a.cache_key().len(), 20);
    }

    #[test]
    fn test_remote_fetch_populates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SuffixSource::new(
            spec(vec![remote("https://a.example/list.dat")], true, dir.path()),
            counting("com\n", calls.clone()),
        );

        let loaded = source.load(false).unwrap();
        assert_eq!(loaded.origin, ListOrigin::Source(remote("https://a.example/list.dat")));
        assert_eq!(loaded.text, "com\n");
        assert!(source.cache().contains(&source.spec().cache_key()));

        let again = source.load(false).unwrap();
        assert_eq!(again.origin, ListOrigin::Cache);
        assert_eq!(again.text, "com\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_force_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SuffixSource::new(
            spec(vec![remote("https://a.example/list.dat")], true, dir.path()),
            counting("com\n", calls.clone()),
        );

        source.load(false).unwrap();
        let forced = source.load(true).unwrap();
        assert!(matches!(forced.origin, ListOrigin::Source(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_file_source_wins_and_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.dat");
        fs::write(&list, "example\n").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SuffixSource::new(
            spec(
                vec![Source::File(list.clone()), remote("https://a.example/list.dat")],
                false,
                dir.path(),
            ),
            counting("com\n", calls.clone()),
        );

        let loaded = source.load(false).unwrap();
        assert_eq!(loaded.text, "example\n");
        assert_eq!(loaded.origin, ListOrigin::Source(Source::File(list)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!source.cache().contains(&source.spec().cache_key()));
    }

    #[test]
    fn test_missing_file_falls_through_to_remote() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SuffixSource::new(
            spec(
                vec![
                    Source::File(dir.path().join("missing.dat")),
                    remote("https://a.example/list.dat"),
                ],
                false,
                dir.path(),
            ),
            counting("com\n", calls.clone()),
        );

        assert_eq!(source.load(false).unwrap().text, "com\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_forced_failure_uses_cached_copy() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![remote("https://a.example/list.dat")];
        let cache_key = spec(sources.clone(), false, dir.path()).cache_key();
        SuffixCache::new(dir.path()).write(&cache_key, "net\n").unwrap();

        let source = SuffixSource::new(spec(sources, false, dir.path()), failing());
        let loaded = source.load(true).unwrap();
        assert_eq!(loaded.origin, ListOrigin::Cache);
        assert_eq!(loaded.text, "net\n");
    }

    #[test]
    fn test_failure_falls_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let source = SuffixSource::new(
            spec(vec![remote("https://a.example/list.dat")], true, dir.path()),
            failing(),
        );
        let loaded = source.load(false).unwrap();
        assert_eq!(loaded.origin, ListOrigin::Snapshot);
        assert_eq!(loaded.text, SNAPSHOT);
    }

    #[test]
    fn test_failure_without_fallback_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = SuffixSource::new(
            spec(vec![remote("https://a.example/list.dat")], false, dir.path()),
            failing(),
        );
        assert!(matches!(
            source.load(true),
            Err(ExtractError::SuffixListUnavailable(_))
        ));
    }

    #[test]
    fn test_empty_body_is_a_failed_source() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = SuffixSource::new(
            spec(vec![remote("https://a.example/list.dat")], true, dir.path()),
            counting("  \n", calls),
        );
        assert_eq!(source.load(false).unwrap().origin, ListOrigin::Snapshot);
    }
}
