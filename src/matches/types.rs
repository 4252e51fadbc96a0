//! Type definitions for the matches module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque anonymization code naming one submission.
///
/// Codes are compared for equality and hashed; no other string
/// semantics are assumed by the clustering engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn new(code: impl Into<String>) -> Self {
        SubmissionId(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(code: &str) -> Self {
        SubmissionId(code.to_string())
    }
}

/// One raw comparison row as handed over by the report downloader:
/// two endpoint descriptor texts (each embedding an anonymization code
/// and a percentage) and the hyperlink of the first endpoint, which
/// embeds the comparison-page reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtract {
    pub endpoint_a: String,
    pub endpoint_b: String,
    pub link: String,
}

/// Struct representing a single parsed pairwise comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id_a: SubmissionId,
    pub name_a: String,
    pub id_b: SubmissionId,
    pub name_b: String,
    /// Canonical similarity, the larger of the two per-side percentages
    pub similarity: u8,
    /// Handle to the detailed comparison page, set once at parse time
    pub page_ref: String,
}
