use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::grocery::constants::NO_STRONG_SIGNAL;

/// Diagnostic metadata explaining why an index entry got its aisle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AisleDebug {
    #[serde(rename = "aisleReason", default)]
    pub aisle_reason: Option<String>,
}

/// The catalog record the index generator nests under `usda`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawCatalogRecord {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    normalized: Option<String>,
}

/// An index entry as found on disk.
///
/// Generated files nest the description under `usda`; flat entries carry it
/// at the top level. Any field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIndexEntry {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    normalized: Option<String>,
    #[serde(default)]
    usda: Option<RawCatalogRecord>,
    #[serde(default)]
    aisle: Option<String>,
    #[serde(default, alias = "_debug")]
    debug: Option<AisleDebug>,
}

/// One entry of the reference ingredient index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIndexEntry")]
pub struct IndexEntry {
    pub description: String,

    /// Description as produced by the index generator's normalizer.
    pub normalized: String,

    pub aisle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AisleDebug>,
}

impl From<RawIndexEntry> for IndexEntry {
    fn from(raw: RawIndexEntry) -> Self {
        let usda = raw.usda.unwrap_or_default();
        let pick = |top: Option<String>, nested: Option<String>| {
            top.filter(|s| !s.trim().is_empty())
                .or(nested)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            description: pick(raw.description, usda.description),
            normalized: pick(raw.normalized, usda.normalized),
            aisle: raw.aisle.map(|s| s.trim().to_string()).unwrap_or_default(),
            debug: raw.debug,
        }
    }
}

impl IndexEntry {
    pub fn new(description: &str, normalized: &str, aisle: &str) -> Self {
        Self {
            description: description.to_string(),
            normalized: normalized.to_string(),
            aisle: aisle.to_string(),
            debug: None,
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.debug = Some(AisleDebug {
            aisle_reason: Some(reason.to_string()),
        });
        self
    }

    /// True when the debug metadata names a real reason for the aisle.
    pub fn has_strong_signal(&self) -> bool {
        self.debug
            .as_ref()
            .and_then(|d| d.aisle_reason.as_deref())
            .map(|r| !r.is_empty() && r != NO_STRONG_SIGNAL)
            .unwrap_or(false)
    }
}

/// Reference index keyed by an opaque entry id, kept in insertion order.
pub type IngredientIndex = IndexMap<String, IndexEntry>;
