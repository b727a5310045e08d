//! HTTP library fetcher
//!
//! Fetches `<base_url>/<namespace>.lib.toml`. Transient failures (timeouts,
//! connection errors, 429 and 5xx) are retried with exponential backoff.

use crate::config::HttpSettings;
use crate::fetch::{validate_namespace, LibraryFetcher, MANIFEST_SUFFIX};
use std::time::Duration;
use trellis_core::{Result, TrellisError};
use trellis_schema::LibraryBundle;

const RETRY_BASE_DELAY_MS: u64 = 250;

/// Fetches library manifests from a web server
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    timeout: Duration,
    max_retries: usize,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_settings(base_url, &HttpSettings::default())
    }

    pub fn with_settings(base_url: impl Into<String>, settings: &HttpSettings) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_retries: settings.max_retries.max(1),
        }
    }

    pub fn manifest_url(&self, namespace: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            namespace,
            MANIFEST_SUFFIX
        )
    }

    fn get_text_with_retry(&self, url: &str, namespace: &str) -> Result<String> {
        let mut last_error = String::new();
        for attempt in 0..self.max_retries {
            let agent = self.build_agent();
            match agent.get(url).call() {
                Ok(mut response) => {
                    return response.body_mut().read_to_string().map_err(|e| {
                        TrellisError::FetchError(format!("Failed to read {}: {}", url, e))
                    });
                }
                Err(ureq::Error::StatusCode(404)) => {
                    return Err(TrellisError::LibraryNotFound(namespace.to_string()));
                }
                Err(e) if is_retryable_error(&e) && attempt + 1 < self.max_retries => {
                    tracing::debug!(url, attempt, error = %e, "retrying library fetch");
                    last_error = e.to_string();
                    sleep_backoff(attempt);
                }
                Err(e) => {
                    return Err(TrellisError::FetchError(format!("GET {}: {}", url, e)));
                }
            }
        }
        Err(TrellisError::FetchError(format!(
            "GET {} failed after {} attempts: {}",
            url, self.max_retries, last_error
        )))
    }

    fn build_agent(&self) -> ureq::Agent {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        config.into()
    }
}

impl LibraryFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
        validate_namespace(namespace)?;
        let url = self.manifest_url(namespace);
        let content = self.get_text_with_retry(&url, namespace)?;
        let bundle = LibraryBundle::from_manifest_str(&content)
            .map_err(|e| TrellisError::ManifestError(format!("{}: {}", url, e)))?;
        bundle.expect_namespace(namespace)
    }
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => true,
        ureq::Error::StatusCode(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

fn sleep_backoff(attempt: usize) {
    let delay_ms = RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt.min(16));
    std::thread::sleep(Duration::from_millis(delay_ms));
}
