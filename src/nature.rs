//! Data-nature tags for security-event records.
//!
//! DESIGN
//! ======
//! Indexed documents carry field names namespaced by their data nature
//! (`alert.`, `logx.`, `vulnerability.`, ...). These enums are the single
//! place those string tags live; everything else matches on the enum, not
//! on raw prefixes.
//!
//! The `DataNatureType` wire values are historical and intentionally do not
//! mirror the variant names (`Alert` serializes as `"EVENT"`, `Event` as
//! `"LOGX"`). Backend queries depend on the exact strings.

#[cfg(test)]
#[path = "nature_test.rs"]
mod nature_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD PREFIXES
// =============================================================================

/// Prefix namespacing a document field by the nature of its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NatureDataPrefix {
    #[serde(rename = "correlation.")]
    Correlation,
    #[serde(rename = "global.")]
    Global,
    #[serde(rename = "vulnerability.")]
    Vulnerability,
    #[serde(rename = "@timestamp")]
    Timestamp,
    #[serde(rename = "alert.")]
    Alert,
    #[serde(rename = "logx.")]
    Event,
}

impl NatureDataPrefix {
    /// The literal prefix string as it appears in field names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correlation => "correlation.",
            Self::Global => "global.",
            Self::Vulnerability => "vulnerability.",
            Self::Timestamp => "@timestamp",
            Self::Alert => "alert.",
            Self::Event => "logx.",
        }
    }

    /// Classify a field name by its nature prefix, if it carries one.
    /// `@timestamp` matches exactly; the others match as prefixes.
    #[must_use]
    pub fn of(field: &str) -> Option<Self> {
        const ALL: [NatureDataPrefix; 6] = [
            NatureDataPrefix::Correlation,
            NatureDataPrefix::Global,
            NatureDataPrefix::Vulnerability,
            NatureDataPrefix::Timestamp,
            NatureDataPrefix::Alert,
            NatureDataPrefix::Event,
        ];
        ALL.into_iter().find(|prefix| match prefix {
            Self::Timestamp => field == prefix.as_str(),
            _ => field.starts_with(prefix.as_str()),
        })
    }
}

impl fmt::Display for NatureDataPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NATURE TYPES
// =============================================================================

/// High-level nature of a record, using the backend's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataNatureType {
    #[serde(rename = "EVENT")]
    Alert,
    #[serde(rename = "LOGX")]
    Event,
    #[serde(rename = "VULNERABILITY")]
    Vulnerability,
}

impl DataNatureType {
    /// The wire name sent to the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alert => "EVENT",
            Self::Event => "LOGX",
            Self::Vulnerability => "VULNERABILITY",
        }
    }
}

impl fmt::Display for DataNatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataNatureType {
    type Err = UnknownNature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVENT" => Ok(Self::Alert),
            "LOGX" => Ok(Self::Event),
            "VULNERABILITY" => Ok(Self::Vulnerability),
            other => Err(UnknownNature(other.to_owned())),
        }
    }
}

/// A nature string the backend does not define.
#[derive(Debug, thiserror::Error)]
#[error("unknown data nature: {0}")]
pub struct UnknownNature(pub String);
