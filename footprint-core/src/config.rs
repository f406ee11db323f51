//! Analysis configuration
//!
//! Every threshold the scoring pipeline consults lives here so it can be
//! overridden from a settings file instead of being hardwired.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Default cap on excerpt length, in characters
pub const DEFAULT_EXCERPT_MAX_CHARS: usize = 1200;

/// Platforms whose public pages are safe to read for text
pub const DEFAULT_DEEP_ANALYSIS_SITES: &[&str] =
    &["GitHub", "Medium", "Dev.to", "Reddit", "HuggingFace"];

/// Default topic → keyword table for interest inference
const DEFAULT_INTEREST_TOPICS: &[(&str, &[&str])] = &[
    (
        "Software Development",
        &[
            "code",
            "developer",
            "programming",
            "repository",
            "repositories",
            "rust",
            "python",
            "javascript",
            "typescript",
            "golang",
            "java",
            "software",
        ],
    ),
    (
        "Machine Learning",
        &[
            "machine learning",
            "deep learning",
            "neural",
            "model",
            "models",
            "dataset",
            "datasets",
            "pytorch",
            "tensorflow",
            "transformers",
            "llm",
        ],
    ),
    (
        "Data Science",
        &[
            "data science",
            "analytics",
            "pandas",
            "statistics",
            "visualization",
            "notebook",
            "jupyter",
        ],
    ),
    (
        "Cybersecurity",
        &[
            "security",
            "infosec",
            "pentest",
            "vulnerability",
            "exploit",
            "ctf",
            "malware",
            "osint",
        ],
    ),
    (
        "Web Development",
        &[
            "frontend", "backend", "react", "html", "css", "web", "nodejs", "django",
        ],
    ),
    (
        "Cloud & DevOps",
        &[
            "docker",
            "kubernetes",
            "devops",
            "aws",
            "azure",
            "cloud",
            "terraform",
            "ci",
        ],
    ),
    (
        "Blockchain",
        &[
            "blockchain",
            "crypto",
            "bitcoin",
            "ethereum",
            "web3",
            "solidity",
            "defi",
        ],
    ),
    (
        "Open Source",
        &[
            "open source",
            "open-source",
            "contributor",
            "contributions",
            "maintainer",
            "license",
        ],
    ),
    (
        "Writing",
        &[
            "blog",
            "article",
            "articles",
            "writing",
            "newsletter",
            "stories",
            "author",
        ],
    ),
    (
        "Gaming",
        &["game", "games", "gaming", "unity", "unreal", "esports"],
    ),
    (
        "Design",
        &["design", "designer", "ui", "ux", "figma", "illustration"],
    ),
];

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Profile-count and confidence thresholds for the risk tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Profiles needed to escalate Low → Medium
    pub medium_min_profiles: usize,
    /// Profiles needed (together with confidence) to escalate Medium → High
    pub high_min_profiles: usize,
    /// Confidence that must be strictly exceeded for High
    pub high_min_confidence: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_min_profiles: 3,
            high_min_profiles: 5,
            high_min_confidence: 0.75,
        }
    }
}

/// Knobs for extraction scope and report scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Platform names eligible for content extraction
    pub deep_analysis_sites: BTreeSet<String>,
    /// Maximum excerpt length in characters
    pub excerpt_max_chars: usize,
    /// Topic → keywords. Multi-word keywords match as substrings,
    /// single words match whole tokens.
    pub interest_topics: BTreeMap<String, Vec<String>>,
    pub risk: RiskThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            deep_analysis_sites: DEFAULT_DEEP_ANALYSIS_SITES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excerpt_max_chars: DEFAULT_EXCERPT_MAX_CHARS,
            interest_topics: DEFAULT_INTEREST_TOPICS
                .iter()
                .map(|(topic, keywords)| {
                    (
                        topic.to_string(),
                        keywords.iter().map(|k| k.to_string()).collect(),
                    )
                })
                .collect(),
            risk: RiskThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Whether a platform may be read for text
    pub fn is_deep_analysis_site(&self, platform: &str) -> bool {
        self.deep_analysis_sites.contains(platform)
    }

    pub fn with_deep_analysis_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deep_analysis_sites = sites.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.excerpt_max_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "analysis.excerpt_max_chars",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.risk.high_min_confidence) {
            return Err(ConfigError::Invalid {
                key: "analysis.risk.high_min_confidence",
                reason: format!("{} is outside [0, 1]", self.risk.high_min_confidence),
            });
        }
        if self.risk.high_min_profiles < self.risk.medium_min_profiles {
            return Err(ConfigError::Invalid {
                key: "analysis.risk.high_min_profiles",
                reason: "must not be lower than medium_min_profiles".to_string(),
            });
        }
        Ok(())
    }
}
