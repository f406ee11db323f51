//! Scripted in-memory fetcher for scheduler and engine tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use footprint_net::{FetchError, FetchedPage, Fetcher};

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
    unreachable: bool,
}

/// Unknown URLs answer 404 immediately
#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    routes: HashMap<String, Route>,
    default_delay: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
                unreachable: false,
            },
        );
        self
    }

    pub(crate) fn delayed(self, url: &str, status: u16, delay: Duration) -> Self {
        self.delayed_page(url, status, "", delay)
    }

    pub(crate) fn delayed_page(
        mut self,
        url: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                body: body.to_string(),
                delay,
                unreachable: false,
            },
        );
        self
    }

    pub(crate) fn unreachable(mut self, url: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status: 0,
                body: String::new(),
                delay: Duration::ZERO,
                unreachable: true,
            },
        );
        self
    }

    /// Delay applied to URLs without a route
    pub(crate) fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let route = self.routes.get(url).cloned();
        let delay = route.as_ref().map(|r| r.delay).unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match route {
            Some(route) if route.unreachable => {
                Err(FetchError::Connect(format!("connection refused: {}", url)))
            }
            Some(route) => Ok(FetchedPage {
                status: route.status,
                final_url: url.to_string(),
                body: route.body,
            }),
            None => Ok(FetchedPage {
                status: 404,
                final_url: url.to_string(),
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn status(&self, url: &str) -> Result<u16, FetchError> {
        self.respond(url).await.map(|page| page.status)
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.respond(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_route_is_a_connect_error() {
        let fetcher = MockFetcher::new().unreachable("https://down.test/jdoe");

        let error = fetcher.status("https://down.test/jdoe").await.unwrap_err();

        assert!(matches!(error, FetchError::Connect(_)));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let page = MockFetcher::new().fetch("https://any.test/").await.unwrap();
        assert_eq!(page.status, 404);
        assert_eq!(page.final_url, "https://any.test/");
    }
}
