//! Analysis engine
//!
//! Runs one query end to end:
//! Registry → fan-out scan → signal computation → report.
//! Every query is independent; nothing is cached between calls.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use footprint_core::{compute, ConfigError, Registry, Report, ReportBuilder};
use footprint_net::{FetchError, Fetcher, HttpFetcher};

use crate::{scan_indexed, ScanPlan, Settings};

/// Errors raised while constructing an engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client unavailable: {0}")]
    Fetch(#[from] FetchError),
}

/// Query pipeline over a shared fetcher
#[derive(Clone)]
pub struct Engine {
    fetcher: Arc<dyn Fetcher>,
    settings: Settings,
}

impl Engine {
    /// Engine backed by a real HTTP client
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        settings.validate()?;
        let fetcher = HttpFetcher::new(&settings.fetch)?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            settings,
        })
    }

    /// Engine over any transport
    pub fn with_fetcher(
        settings: Settings,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self { fetcher, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Analyze one identifier against a registry
    ///
    /// The identifier is substituted exactly as given; only an all-blank
    /// identifier short-circuits to an empty report.
    pub async fn analyze(&self, registry: &Registry, identifier: &str) -> Report {
        let analysis = &self.settings.analysis;
        let builder = ReportBuilder::new(analysis);

        if identifier.trim().is_empty() {
            info!("Empty identifier, no probes dispatched");
            return builder.empty(identifier, registry.len());
        }

        let plan = ScanPlan {
            max_concurrent: self.settings.scan.max_concurrent,
            timeout: self.settings.fetch.timeout(),
            analysis,
        };
        let hits = scan_indexed(self.fetcher.as_ref(), registry, identifier, &plan).await;

        // Signals see excerpts in registry order so scores do not depend on
        // which platform answered first
        let mut ordered: Vec<_> = hits.iter().collect();
        ordered.sort_by_key(|hit| hit.index);
        let excerpts: Vec<&str> = ordered
            .iter()
            .filter_map(|hit| hit.result.excerpt.as_deref())
            .collect();
        let signals = compute(&excerpts);

        let profiles_found = hits.into_iter().map(|hit| hit.result).collect();
        let report = builder.build(identifier, registry.len(), profiles_found, signals);

        info!(
            "Report for '{}': {} profiles, confidence {:.2}, risk {}",
            report.subject,
            report.profile_count(),
            report.confidence_score,
            report.risk_tier
        );
        report
    }
}
