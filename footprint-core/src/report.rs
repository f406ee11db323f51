//! Report assembly
//!
//! Folds the profiles found and the computed signals into the terminal
//! artifact of a query: confidence score, risk tier, inferred interests
//! and a templated narrative. Nothing here touches the network.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::LazyLock;

use crate::{AnalysisConfig, ProbeResult, RiskThresholds, SignalSet};

/// Weight of cross-profile similarity in the confidence blend
pub const SIMILARITY_WEIGHT: f64 = 0.5;
/// Weight of the username-consistency indicator
pub const USERNAME_WEIGHT: f64 = 0.3;
/// Weight of the platform-overlap indicator
pub const OVERLAP_WEIGHT: f64 = 0.2;
/// Profile count at which platform overlap saturates
pub const OVERLAP_SATURATION: f64 = 5.0;

static KEYWORD_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Coarse exposure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

/// Final result of one query
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub subject: String,
    /// Positive results in discovery (completion) order
    pub profiles_found: Vec<ProbeResult>,
    pub registry_size: usize,
    pub categories_present: BTreeSet<String>,
    pub signals: SignalSet,
    pub confidence_score: f64,
    pub inferred_interests: BTreeSet<String>,
    pub risk_tier: RiskTier,
    pub narrative: String,
}

impl Report {
    /// Platforms per category among the profiles found
    pub fn category_distribution(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for profile in &self.profiles_found {
            *counts.entry(profile.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Platform names in discovery order
    pub fn timeline(&self) -> Vec<&str> {
        self.profiles_found
            .iter()
            .map(|p| p.platform.as_str())
            .collect()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles_found.len()
    }
}

/// Builds reports from scan output and signals
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        subject: &str,
        registry_size: usize,
        profiles_found: Vec<ProbeResult>,
        signals: SignalSet,
    ) -> Report {
        // Only positive results belong in a report
        let profiles_found: Vec<ProbeResult> =
            profiles_found.into_iter().filter(|p| p.exists).collect();
        let count = profiles_found.len();

        let categories_present = profiles_found.iter().map(|p| p.category.clone()).collect();

        let excerpt_text = profiles_found
            .iter()
            .filter_map(|p| p.excerpt.as_deref())
            .collect::<Vec<_>>()
            .join(" ");
        let inferred_interests = infer_interests(&excerpt_text, &self.config.interest_topics);

        let confidence_score = confidence_score(&signals, count);
        let risk_tier = assess_risk(count, confidence_score, &self.config.risk);

        let mut report = Report {
            subject: subject.to_string(),
            profiles_found,
            registry_size,
            categories_present,
            signals,
            confidence_score,
            inferred_interests,
            risk_tier,
            narrative: String::new(),
        };
        report.narrative = narrative(&report);
        report
    }

    /// Report for a query that dispatched no probes
    pub fn empty(&self, subject: &str, registry_size: usize) -> Report {
        self.build(subject, registry_size, Vec::new(), SignalSet::insufficient())
    }
}

/// Weighted blend of similarity, username consistency and platform overlap,
/// rounded to two decimals. The username indicator is 0.5 for zero or one
/// profile, so an empty scan still scores 0.15.
pub fn confidence_score(signals: &SignalSet, profiles_found: usize) -> f64 {
    // The one place a not-computable similarity is read as zero
    let similarity = signals.cross_profile_similarity.value().unwrap_or(0.0);
    let username_consistency = if profiles_found > 1 { 1.0 } else { 0.5 };
    let overlap = (profiles_found as f64 / OVERLAP_SATURATION).min(1.0);

    let blended = SIMILARITY_WEIGHT * similarity
        + USERNAME_WEIGHT * username_consistency
        + OVERLAP_WEIGHT * overlap;

    ((blended * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

/// Monotonic Low → Medium → High escalation, evaluated once
pub fn assess_risk(
    profiles_found: usize,
    confidence: f64,
    thresholds: &RiskThresholds,
) -> RiskTier {
    let mut tier = RiskTier::Low;

    if profiles_found >= thresholds.medium_min_profiles {
        tier = RiskTier::Medium;
    }

    if tier == RiskTier::Medium
        && profiles_found >= thresholds.high_min_profiles
        && confidence > thresholds.high_min_confidence
    {
        tier = RiskTier::High;
    }

    tier
}

/// Topics with at least one keyword present in the case-folded text
pub fn infer_interests(text: &str, topics: &BTreeMap<String, Vec<String>>) -> BTreeSet<String> {
    if text.trim().is_empty() {
        return BTreeSet::new();
    }

    let folded = text.to_lowercase();
    let tokens: HashSet<&str> = KEYWORD_TOKEN_REGEX
        .find_iter(&folded)
        .map(|m| m.as_str())
        .collect();

    topics
        .iter()
        .filter(|(_, keywords)| {
            keywords.iter().any(|keyword| {
                let keyword = keyword.to_lowercase();
                if keyword.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    tokens.contains(keyword.as_str())
                } else {
                    folded.contains(&keyword)
                }
            })
        })
        .map(|(topic, _)| topic.clone())
        .collect()
}

fn join_or_none<'a, I: IntoIterator<Item = &'a String>>(items: I) -> String {
    let joined = items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

fn narrative(report: &Report) -> String {
    if report.profiles_found.is_empty() {
        return format!(
            "No public accounts were found for '{}' across a registry of {} platforms.",
            report.subject, report.registry_size
        );
    }

    let mut text = format!(
        "The identifier '{}' was found across {} platforms from a registry of {} sites. \
         Presence spans {} domains. \
         Writing style appears {} with {} language complexity. \
         Identity confidence is {:.2} and overall exposure is rated {}.",
        report.subject,
        report.profiles_found.len(),
        report.registry_size,
        join_or_none(&report.categories_present),
        report.signals.consistency_tier,
        report.signals.complexity_tier,
        report.confidence_score,
        report.risk_tier,
    );

    if !report.inferred_interests.is_empty() {
        text.push_str(&format!(
            " Inferred interests: {}.",
            join_or_none(&report.inferred_interests)
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute, CrossProfileSimilarity, PlatformDescriptor};

    fn found(name: &str, category: &str, excerpt: Option<&str>) -> ProbeResult {
        let descriptor = PlatformDescriptor::new(name, category, "https://example.com/{}");
        let result = ProbeResult::new(&descriptor, descriptor.resolve("jdoe"), true);
        match excerpt {
            Some(text) => result.with_excerpt(text.to_string()),
            None => result,
        }
    }

    fn signals_with_similarity(similarity: CrossProfileSimilarity) -> SignalSet {
        SignalSet {
            cross_profile_similarity: similarity,
            ..SignalSet::insufficient()
        }
    }

    #[test]
    fn test_empty_report() {
        let config = AnalysisConfig::default();
        let report = ReportBuilder::new(&config).empty("ghost", 0);

        assert!(report.profiles_found.is_empty());
        assert_eq!(report.risk_tier, RiskTier::Low);
        // Username indicator at 0.5, nothing else contributes
        assert_eq!(report.confidence_score, 0.15);
        assert!(report.narrative.contains("No public accounts were found"));
        assert!(report.inferred_interests.is_empty());
    }

    #[test]
    fn test_confidence_blend_for_three_similar_profiles() {
        let signals = signals_with_similarity(CrossProfileSimilarity::Measured(0.9));
        // 0.5 * 0.9 + 0.3 * 1.0 + 0.2 * 0.6
        assert_eq!(confidence_score(&signals, 3), 0.87);
    }

    #[test]
    fn test_confidence_without_profiles_keeps_username_term() {
        let signals = SignalSet::insufficient();
        assert_eq!(confidence_score(&signals, 0), 0.15);
    }

    #[test]
    fn test_confidence_with_single_profile() {
        let signals = signals_with_similarity(CrossProfileSimilarity::NotComputable);
        // 0.3 * 0.5 + 0.2 * 0.2
        assert_eq!(confidence_score(&signals, 1), 0.19);
    }

    #[test]
    fn test_confidence_stays_in_unit_interval() {
        for similarity in [0.0, 0.25, 0.5, 0.99, 1.0] {
            for count in 0..12 {
                let signals = signals_with_similarity(CrossProfileSimilarity::Measured(similarity));
                let score = confidence_score(&signals, count);
                assert!((0.0..=1.0).contains(&score), "{} out of range", score);
            }
        }
    }

    #[test]
    fn test_risk_escalation() {
        let thresholds = RiskThresholds::default();
        assert_eq!(assess_risk(2, 1.0, &thresholds), RiskTier::Low);
        assert_eq!(assess_risk(3, 0.2, &thresholds), RiskTier::Medium);
        assert_eq!(assess_risk(4, 0.95, &thresholds), RiskTier::Medium);
        assert_eq!(assess_risk(5, 0.75, &thresholds), RiskTier::Medium);
        assert_eq!(assess_risk(5, 0.76, &thresholds), RiskTier::High);
    }

    #[test]
    fn test_high_requires_medium_threshold() {
        let thresholds = RiskThresholds {
            medium_min_profiles: 6,
            high_min_profiles: 6,
            high_min_confidence: 0.5,
        };
        assert_eq!(assess_risk(5, 0.9, &thresholds), RiskTier::Low);
        assert_eq!(assess_risk(6, 0.9, &thresholds), RiskTier::High);
    }

    #[test]
    fn test_interest_inference_matches_tokens_and_phrases() {
        let config = AnalysisConfig::default();
        let interests = infer_interests(
            "I maintain Rust crates and publish Open Source DATASETS for research",
            &config.interest_topics,
        );

        assert!(interests.contains("Software Development"));
        assert!(interests.contains("Open Source"));
        assert!(interests.contains("Machine Learning"));
        assert!(!interests.contains("Gaming"));
    }

    #[test]
    fn test_single_word_keywords_do_not_match_inside_words() {
        let mut topics = BTreeMap::new();
        topics.insert("Design".to_string(), vec!["ui".to_string()]);
        assert!(infer_interests("building a quick guide", &topics).is_empty());
        assert!(!infer_interests("new UI kit", &topics).is_empty());
    }

    #[test]
    fn test_build_report_from_profiles() {
        let config = AnalysisConfig::default();
        let profiles = vec![
            found(
                "GitHub",
                "Coding",
                Some("Rust developer building networking tools."),
            ),
            found("LinkedIn", "Professional", None),
            found(
                "Dev.to",
                "Blogging",
                Some("Writing about Rust networking tools."),
            ),
        ];
        let excerpts: Vec<&str> = profiles
            .iter()
            .filter_map(|p| p.excerpt.as_deref())
            .collect();
        let signals = compute(&excerpts);

        let report = ReportBuilder::new(&config).build("jdoe", 5, profiles, signals);

        assert_eq!(report.profile_count(), 3);
        assert_eq!(report.risk_tier, RiskTier::Medium);
        assert_eq!(report.timeline(), vec!["GitHub", "LinkedIn", "Dev.to"]);
        assert_eq!(report.category_distribution().get("Coding"), Some(&1));
        assert!(report.categories_present.contains("Professional"));
        assert!(report.inferred_interests.contains("Software Development"));
        assert!(report.narrative.contains("'jdoe' was found across 3 platforms"));
        assert!(report.narrative.contains("registry of 5 sites"));
    }

    #[test]
    fn test_negative_results_are_filtered() {
        let config = AnalysisConfig::default();
        let descriptor = PlatformDescriptor::new("Steam", "Gaming", "https://steam/{}");
        let missing = ProbeResult::new(&descriptor, descriptor.resolve("x"), false);

        let report = ReportBuilder::new(&config).build(
            "x",
            2,
            vec![found("GitHub", "Coding", None), missing],
            SignalSet::insufficient(),
        );

        assert_eq!(report.profile_count(), 1);
        assert!(report.profiles_found.iter().all(|p| p.exists));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = AnalysisConfig::default();
        let report = ReportBuilder::new(&config).build(
            "jdoe",
            3,
            vec![found("GitHub", "Coding", None)],
            SignalSet::insufficient(),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["risk_tier"], "low");
        assert_eq!(json["registry_size"], 3);
        assert_eq!(json["profiles_found"][0]["platform"], "GitHub");
        assert!(json["signals"]["cross_profile_similarity"].is_null());
    }
}
