//! Fan-out scheduler
//!
//! Probes every registry entry under a concurrency cap. Positive results on
//! deep-analysis platforms get a follow-up extraction in the same task.
//! Tasks never share mutable state: each resolves to an independent hit and
//! hits are merged by the single consumer of the stream, in the order they
//! complete.

use futures::future;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use footprint_core::{AnalysisConfig, PlatformDescriptor, ProbeResult, Registry};
use footprint_net::{extract, probe, Fetcher};

/// Limits and scope for one scan
#[derive(Debug, Clone)]
pub struct ScanPlan<'a> {
    /// Maximum probes in flight
    pub max_concurrent: usize,
    /// Deadline for each individual fetch
    pub timeout: Duration,
    pub analysis: &'a AnalysisConfig,
}

/// A positive result with the registry position it came from
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub index: usize,
    pub result: ProbeResult,
}

async fn probe_entry<F: Fetcher + ?Sized>(
    fetcher: &F,
    index: usize,
    descriptor: &PlatformDescriptor,
    identifier: &str,
    plan: &ScanPlan<'_>,
) -> Option<ScanHit> {
    let result = probe(fetcher, descriptor, identifier, plan.timeout).await;
    if !result.exists {
        return None;
    }

    let result = if plan.analysis.is_deep_analysis_site(&descriptor.name) {
        let excerpt = extract(
            fetcher,
            &result.resolved_url,
            plan.analysis.excerpt_max_chars,
            plan.timeout,
        )
        .await;
        result.with_excerpt(excerpt)
    } else {
        result
    };

    Some(ScanHit { index, result })
}

/// Scan the registry, returning positive hits in completion order
pub async fn scan_indexed<F: Fetcher + ?Sized>(
    fetcher: &F,
    registry: &Registry,
    identifier: &str,
    plan: &ScanPlan<'_>,
) -> Vec<ScanHit> {
    let started = Instant::now();
    let max_concurrent = plan.max_concurrent.max(1);

    debug!(
        "Scanning {} platforms for '{}' ({} in flight)",
        registry.len(),
        identifier,
        max_concurrent
    );

    // Built up front so no borrowing closure is held across the await
    let probes: Vec<_> = registry
        .iter()
        .enumerate()
        .map(|(index, descriptor)| probe_entry(fetcher, index, descriptor, identifier, plan))
        .collect();

    let hits: Vec<ScanHit> = stream::iter(probes)
        .buffer_unordered(max_concurrent)
        .filter_map(future::ready)
        .collect()
        .await;

    let excerpts = hits.iter().filter(|h| h.result.excerpt.is_some()).count();
    info!(
        "Scan for '{}' finished: {}/{} platforms found, {} excerpts, {:?}",
        identifier,
        hits.len(),
        registry.len(),
        excerpts,
        started.elapsed()
    );

    hits
}

/// Scan the registry, returning positive results in completion order
pub async fn scan<F: Fetcher + ?Sized>(
    fetcher: &F,
    registry: &Registry,
    identifier: &str,
    plan: &ScanPlan<'_>,
) -> Vec<ProbeResult> {
    scan_indexed(fetcher, registry, identifier, plan)
        .await
        .into_iter()
        .map(|hit| hit.result)
        .collect()
}
