//! Bootstrap manifest parsing and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Ordered registration plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapManifest {
    #[serde(default)]
    pub services: Vec<ManifestEntry>,
}

/// One contract/implementation pair, both by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub contract: String,
    pub implementation: String,
}

impl ManifestEntry {
    pub fn new(contract: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            implementation: implementation.into(),
        }
    }
}

/// Manifest load/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest entry {index} has an empty `{field}`")]
    EmptyField { index: usize, field: &'static str },
    #[error("contract `{0}` is listed more than once")]
    DuplicateContract(String),
}

impl BootstrapManifest {
    /// Parses and validates a JSON manifest.
    pub fn from_json_str(raw: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads, parses and validates a JSON manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks for blank names and contracts repeated with the same spelling.
    ///
    /// Names are not resolved here; `bootstrap` catches a contract listed
    /// under both its short and its qualified name.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = BTreeSet::new();
        for (index, entry) in self.services.iter().enumerate() {
            let contract = entry.contract.trim();
            if contract.is_empty() {
                return Err(ManifestError::EmptyField {
                    index,
                    field: "contract",
                });
            }
            if entry.implementation.trim().is_empty() {
                return Err(ManifestError::EmptyField {
                    index,
                    field: "implementation",
                });
            }
            if !seen.insert(contract) {
                return Err(ManifestError::DuplicateContract(contract.to_string()));
            }
        }
        Ok(())
    }
}
