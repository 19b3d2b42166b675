use std::time::Duration;

use crate::error::{ExtractError, FetchErrorKind, Result};

/// Default timeout for remote suffix list requests
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for retrieving remote suffix list text
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url` as text
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<String> {
        self(url)
    }
}

/// HTTP fetcher with a global per-request timeout
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent, timeout }
    }

    fn classify(&self, url: &str, err: ureq::Error) -> ExtractError {
        match err {
            ureq::Error::Timeout(_) => ExtractError::fetch(
                FetchErrorKind::Timeout,
                format!("{} timed out after {:?}", url, self.timeout),
            ),
            other => ExtractError::fetch(FetchErrorKind::Http, format!("{}: {}", url, other)),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| self.classify(url, e))?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.classify(url, e))?;

        if text.trim().is_empty() {
            return Err(ExtractError::fetch(
                FetchErrorKind::InvalidData,
                format!("{} returned an empty body", url),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_fetcher() {
        let fetcher = |url: &str| -> Result<String> { Ok(format!("// {}\ncom\n", url)) };
        let text = fetcher.fetch("https://example.invalid/list.dat").unwrap();
        assert!(text.contains("example.invalid"));
    }

    #[test]
    fn test_unreachable_host_is_http_error() {
        // Port 9 on localhost is discard; nothing listens there in test environments
        let fetcher = HttpFetcher::new(Duration::from_secs(2));
        let err = fetcher.fetch("http://127.0.0.1:9/list.dat").unwrap_err();
        match err {
            ExtractError::Fetch { kind, .. } => {
                assert!(matches!(kind, FetchErrorKind::Http | FetchErrorKind::Timeout));
            }
            other => panic!("expected Fetch, got {:?}", other),
        }
    }
}
