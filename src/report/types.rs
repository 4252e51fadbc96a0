//! Type definitions for the report module.

use serde::{Deserialize, Serialize};

use crate::matches::MatchRecord;

/// One connected group of submissions whose mutual similarity reached
/// the threshold, with its qualifying matches sorted best-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCluster {
    pub matches: Vec<MatchRecord>,
    pub max_similarity: u8,
}

/// Renderer-agnostic result of one aggregation run: the clustered view
/// and the flat view, both sorted by similarity descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub clusters: Vec<MatchCluster>,
    pub all_matches: Vec<MatchRecord>,
}
