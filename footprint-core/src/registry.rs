//! Platform registry
//!
//! Static collection of platform descriptors with their URL templates.
//! Templates carry exactly one `{}` slot which receives the identifier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Placeholder substituted with the identifier
pub const PLACEHOLDER: &str = "{}";

/// Registry bundled with the binary
const EMBEDDED_PLATFORMS: &str = include_str!("../data/platforms.json");

/// Errors raised while loading a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Entry #{index} has an empty site name")]
    EmptySite { index: usize },

    #[error("Entry '{site}' has an empty category")]
    EmptyCategory { site: String },

    #[error("Entry '{site}' has {found} placeholders in '{url}', expected exactly one")]
    BadTemplate {
        site: String,
        url: String,
        found: usize,
    },
}

/// One target platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Platform name, e.g. "GitHub"
    #[serde(rename = "site")]
    pub name: String,
    /// Open category label, e.g. "Coding"
    pub category: String,
    /// Profile URL with a single `{}` slot
    #[serde(rename = "url")]
    pub url_template: String,
}

impl PlatformDescriptor {
    pub fn new(name: &str, category: &str, url_template: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            url_template: url_template.to_string(),
        }
    }

    /// Build the profile URL for an identifier
    pub fn resolve(&self, identifier: &str) -> String {
        self.url_template
            .replacen(PLACEHOLDER, &urlencoding::encode(identifier), 1)
    }

    fn validate(&self, index: usize) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::EmptySite { index });
        }
        if self.category.trim().is_empty() {
            return Err(RegistryError::EmptyCategory {
                site: self.name.clone(),
            });
        }
        let found = self.url_template.matches(PLACEHOLDER).count();
        if found != 1 {
            return Err(RegistryError::BadTemplate {
                site: self.name.clone(),
                url: self.url_template.clone(),
                found,
            });
        }
        Ok(())
    }
}

/// Read-only set of platform descriptors
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    platforms: Vec<PlatformDescriptor>,
}

impl Registry {
    /// Build a registry, rejecting it as a whole if any entry is malformed
    pub fn new(platforms: Vec<PlatformDescriptor>) -> Result<Self, RegistryError> {
        for (index, platform) in platforms.iter().enumerate() {
            platform.validate(index)?;
        }
        Ok(Self { platforms })
    }

    /// Registry with no platforms
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registry bundled with the crate
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_json_str(EMBEDDED_PLATFORMS)
    }

    /// Parse a single JSON document (array of `{site, category, url}`)
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let platforms: Vec<PlatformDescriptor> = serde_json::from_str(json)?;
        Self::new(platforms)
    }

    /// Concatenate several JSON documents in order. Duplicates are kept.
    pub fn from_json_documents<'a, I>(documents: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut platforms = Vec::new();
        for document in documents {
            let mut batch: Vec<PlatformDescriptor> = serde_json::from_str(document)?;
            platforms.append(&mut batch);
        }
        Self::new(platforms)
    }

    /// Load and concatenate registry files
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, RegistryError> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
                path: path.display().to_string(),
                source,
            })?;
            documents.push(content);
        }
        Self::from_json_documents(documents.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.platforms.iter()
    }

    pub fn platforms(&self) -> &[PlatformDescriptor] {
        &self.platforms
    }

    /// Number of platforms per category
    pub fn categories(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for platform in &self.platforms {
            *counts.entry(platform.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
