//! Existence prober
//!
//! One bounded-time GET per platform. A profile exists iff the final status
//! after redirects is exactly 200. Transport failures are a normal negative
//! outcome and never surface as errors.

use std::time::Duration;
use tracing::debug;

use footprint_core::{PlatformDescriptor, ProbeResult};

use crate::{FetchError, Fetcher};

/// Classified outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Final status 200
    Found,
    /// Any other final status
    Missing(u16),
    /// Timeout, DNS, connection or TLS failure
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn from_status(status: u16) -> Self {
        if status == 200 {
            Self::Found
        } else {
            Self::Missing(status)
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, Self::Found)
    }
}

/// Run a fetcher call under a hard deadline
pub(crate) async fn with_deadline<T, F>(timeout: Duration, call: F) -> Result<T, FetchError>
where
    F: std::future::Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

/// Probe a URL and classify the outcome
pub async fn check_url<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
) -> ProbeOutcome {
    match with_deadline(timeout, fetcher.status(url)).await {
        Ok(status) => ProbeOutcome::from_status(status),
        Err(e) => ProbeOutcome::Unreachable(e.to_string()),
    }
}

/// Probe one platform for an identifier
pub async fn probe<F: Fetcher + ?Sized>(
    fetcher: &F,
    descriptor: &PlatformDescriptor,
    identifier: &str,
    timeout: Duration,
) -> ProbeResult {
    let url = descriptor.resolve(identifier);
    let outcome = check_url(fetcher, &url, timeout).await;

    match &outcome {
        ProbeOutcome::Found => debug!("{}: profile found at {}", descriptor.name, url),
        ProbeOutcome::Missing(status) => {
            debug!("{}: no profile (status {})", descriptor.name, status)
        }
        ProbeOutcome::Unreachable(reason) => {
            debug!("{}: unreachable, counted as absent: {}", descriptor.name, reason)
        }
    }

    ProbeResult::new(descriptor, url, outcome.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::FetchedPage;

    struct FixedStatus(Result<u16, ()>);

    #[async_trait]
    impl Fetcher for FixedStatus {
        async fn status(&self, _url: &str) -> Result<u16, FetchError> {
            self.0
                .map_err(|_| FetchError::Connect("connection refused".to_string()))
        }

        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            let status = self.status(url).await?;
            Ok(FetchedPage {
                status,
                final_url: url.to_string(),
                body: String::new(),
            })
        }
    }

    struct Hangs;

    #[async_trait]
    impl Fetcher for Hangs {
        async fn status(&self, _url: &str) -> Result<u16, FetchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(200)
        }

        async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(FetchError::Timeout(Duration::from_secs(30)))
        }
    }

    fn github() -> PlatformDescriptor {
        PlatformDescriptor::new("GitHub", "Coding", "https://github.com/{}")
    }

    #[test]
    fn test_only_200_counts_as_found() {
        assert!(ProbeOutcome::from_status(200).exists());
        assert!(!ProbeOutcome::from_status(204).exists());
        assert!(!ProbeOutcome::from_status(404).exists());
        assert!(!ProbeOutcome::from_status(429).exists());
    }

    #[tokio::test]
    async fn test_probe_found() {
        let fetcher = FixedStatus(Ok(200));
        let result = probe(&fetcher, &github(), "octocat", Duration::from_secs(1)).await;
        assert!(result.exists);
        assert_eq!(result.resolved_url, "https://github.com/octocat");
        assert_eq!(result.platform, "GitHub");
        assert_eq!(result.excerpt, None);
    }

    #[tokio::test]
    async fn test_probe_not_found() {
        let fetcher = FixedStatus(Ok(404));
        let result = probe(&fetcher, &github(), "nobody", Duration::from_secs(1)).await;
        assert!(!result.exists);
    }

    #[tokio::test]
    async fn test_transport_failure_is_negative() {
        let fetcher = FixedStatus(Err(()));
        let url = "https://github.com/octocat";
        let outcome = check_url(&fetcher, url, Duration::from_secs(1)).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Unreachable("Connection failed: connection refused".to_string())
        );

        let result = probe(&fetcher, &github(), "octocat", Duration::from_secs(1)).await;
        assert!(!result.exists);
    }

    #[tokio::test]
    async fn test_timeout_is_negative() {
        let started = std::time::Instant::now();
        let outcome = check_url(&Hangs, "https://slow.example", Duration::from_millis(50)).await;

        assert!(matches!(outcome, ProbeOutcome::Unreachable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
