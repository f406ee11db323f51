//! Per-platform probe results

use serde::{Deserialize, Serialize};

use crate::PlatformDescriptor;

/// Outcome of probing one platform for one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub platform: String,
    pub category: String,
    pub resolved_url: String,
    pub exists: bool,
    /// Present only for deep-analysis platforms with non-empty extracted text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl ProbeResult {
    /// Result for a descriptor once the URL has been resolved
    pub fn new(descriptor: &PlatformDescriptor, resolved_url: String, exists: bool) -> Self {
        Self {
            platform: descriptor.name.clone(),
            category: descriptor.category.clone(),
            resolved_url,
            exists,
            excerpt: None,
        }
    }

    /// Attach an excerpt. Empty text leaves the result without one.
    pub fn with_excerpt(mut self, excerpt: String) -> Self {
        self.excerpt = if excerpt.trim().is_empty() {
            None
        } else {
            Some(excerpt)
        };
        self
    }
}
