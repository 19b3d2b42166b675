use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Default remote suffix list locations, tried in order
pub const DEFAULT_SUFFIX_LIST_URLS: [&str; 2] = [
    "https://publicsuffix.org/list/public_suffix_list.dat",
    "https://raw.githubusercontent.com/publicsuffix/list/master/public_suffix_list.dat",
];

/// File names accepted when a directory is given as a source
pub const RECOGNIZED_FILENAMES: [&str; 2] = ["public_suffix_list.dat", "effective_tld_names.dat"];

/// A suffix list location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// `http://` or `https://` URL
    Remote(String),
    /// Local file
    File(PathBuf),
}

impl Source {
    /// Interpret a configured location.
    ///
    /// `http(s)://` URLs are remote; `file://` URLs and plain strings are
    /// local paths. A directory resolves to a recognized list file inside it.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ExtractError::InvalidSource("empty location".to_string()));
        }

        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Source::Remote(location.to_string()));
        }
        if lower.starts_with("file://") {
            return resolve_local(Path::new(&location["file://".len()..]));
        }
        if let Some((scheme, _)) = location.split_once("://") {
            return Err(ExtractError::InvalidSource(format!(
                "unsupported scheme '{}' in {}",
                scheme, location
            )));
        }

        resolve_local(Path::new(location))
    }

    /// Canonical text used for cache keys and logging
    pub fn location(&self) -> String {
        match self {
            Source::Remote(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Turn a local path into a file source, resolving directories
fn resolve_local(path: &Path) -> Result<Source> {
    if path.as_os_str().is_empty() {
        return Err(ExtractError::InvalidSource("empty file path".to_string()));
    }
    if !path.is_dir() {
        return Ok(Source::File(path.to_path_buf()));
    }

    RECOGNIZED_FILENAMES
        .iter()
        .map(|name| path.join(name))
        .find(|candidate| candidate.is_file())
        .map(Source::File)
        .ok_or_else(|| {
            ExtractError::InvalidSource(format!(
                "directory {} contains none of {:?}",
                path.display(),
                RECOGNIZED_FILENAMES
            ))
        })
}
