//! Drives clustering from the similarity threshold and assembles the
//! two sorted report views.

use anyhow::Result;
use std::cmp::Reverse;
use tracing::{debug, info};

use super::types::{MatchCluster, Report};
use crate::cluster::{ClusterEngine, TARGET_CLUSTER};
use crate::matches::{MatchRecord, MatchStore, RawExtract};
use crate::names::NameMap;

/// Builds a full report from raw comparison extracts.
///
/// This is the crate's single entry point for collaborators: it parses
/// the extract sequence (skipping malformed rows), clusters every pair
/// at or above `threshold`, and assembles both report views.
///
/// # Arguments
/// * `extracts` - Ordered raw comparison rows from the downloaded report
/// * `names` - Anonymization-code to display-name mapping, possibly incomplete
/// * `threshold` - Minimum similarity percentage for clustering, 0-100
pub fn build_report(extracts: &[RawExtract], names: &NameMap, threshold: u8) -> Result<Report> {
    let mut store = MatchStore::new();
    let accepted = store.ingest_all(extracts, names);
    debug!(
        target: TARGET_CLUSTER,
        "Parsed {} of {} extracts",
        accepted,
        extracts.len()
    );
    assemble(&store, threshold)
}

/// Assembles the report views from an already-populated match store.
pub fn assemble(store: &MatchStore, threshold: u8) -> Result<Report> {
    let mut engine = ClusterEngine::new();

    // Every qualifying pair gets both endpoints inserted before the
    // merge; engine lookups can then never hit an unknown submission.
    for record in store.iter().filter(|r| r.similarity >= threshold) {
        engine.try_insert(record.id_a.clone());
        engine.try_insert(record.id_b.clone());
        engine.merge(&record.id_a, &record.id_b)?;
    }

    let mut clusters = Vec::new();
    for root in engine.roots() {
        let members = engine.members(&root)?;

        // Qualifying records whose first endpoint lies in this cluster,
        // gathered back into input order so that the similarity sort
        // breaks ties the same way on every run.
        let mut indices: Vec<usize> = members
            .iter()
            .flat_map(|id| store.indices_for(id).iter().copied())
            .collect();
        indices.sort_unstable();

        let mut matches: Vec<MatchRecord> = indices
            .into_iter()
            .filter_map(|i| store.get(i))
            .filter(|r| r.similarity >= threshold)
            .cloned()
            .collect();
        matches.sort_by_key(|r| Reverse(r.similarity));

        let max_similarity = match matches.first() {
            Some(best) => best.similarity,
            None => {
                // A root with no qualifying outgoing matches carries no
                // information; drop it from the report.
                debug!(target: TARGET_CLUSTER, "Dropping empty cluster rooted at {}", root);
                continue;
            }
        };
        clusters.push(MatchCluster {
            matches,
            max_similarity,
        });
    }
    // Stable sort: clusters with equal best similarity stay in the
    // order their roots were first seen.
    clusters.sort_by_key(|c| Reverse(c.max_similarity));

    let mut all_matches: Vec<MatchRecord> = store.iter().cloned().collect();
    all_matches.sort_by_key(|r| Reverse(r.similarity));

    info!(
        target: TARGET_CLUSTER,
        "Aggregated {} matches into {} clusters at threshold {}%",
        all_matches.len(),
        clusters.len(),
        threshold
    );

    Ok(Report {
        clusters,
        all_matches,
    })
}
