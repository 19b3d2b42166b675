use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// Sub-directory of the cache directory holding suffix list entries
pub const CACHE_SUBDIR: &str = "publicsuffix.org-tlds";

/// First line of every cache file, followed by unix seconds
const HEADER_PREFIX: &str = "# fetched-at: ";

/// Distinguishes temp files written by the same process
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A cached suffix list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw suffix list text
    pub text: String,
    /// When the text was fetched
    pub fetched_at: SystemTime,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fetched_at: SystemTime::now(),
        }
    }

    fn encode(&self) -> String {
        let secs = self
            .fetched_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("{}{}\n{}", HEADER_PREFIX, secs, self.text)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (header, text) = raw.split_once('\n')?;
        let secs: u64 = header.strip_prefix(HEADER_PREFIX)?.trim().parse().ok()?;
        Some(Self {
            text: text.to_string(),
            fetched_at: UNIX_EPOCH + Duration::from_secs(secs),
        })
    }
}

/// On-disk store of fetched suffix lists, one file per key.
///
/// Files are replaced by writing a temp file in the same directory and
/// renaming it over the old entry, so readers in any process see either the
/// old or the new file.
#[derive(Debug, Clone)]
pub struct SuffixCache {
    dir: PathBuf,
}

impl SuffixCache {
    /// Create a cache rooted under `cache_dir`
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_dir.as_ref().join(CACHE_SUBDIR),
        }
    }

    /// Path of the entry for `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.dat", key))
    }

    /// Read the entry for `key`. Missing or corrupt entries read as `None`.
    pub fn read(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read cache file {}: {}", path.display(), e);
                return None;
            }
        };

        let entry = CacheEntry::decode(&raw);
        if entry.is_none() {
            log::warn!("Ignoring corrupt cache file {}", path.display());
        }
        entry
    }

    /// Check if an entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    /// Store `text` under `key`, replacing any previous entry atomically
    pub fn write(&self, key: &str, text: &str) -> Result<CacheEntry> {
        fs::create_dir_all(&self.dir)?;

        let entry = CacheEntry::new(text);
        let path = self.entry_path(key);
        let tmp_path = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            key,
            process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let written = (|| -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(entry.encode().as_bytes())?;
            file.sync_all()?;
            drop(file);
            fs::rename(&tmp_path, &path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::debug!("Wrote suffix list cache {}", path.display());
        Ok(entry)
    }
}
