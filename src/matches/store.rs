//! Parsing of raw comparison extracts into match records.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use super::types::{MatchRecord, RawExtract, SubmissionId};
use super::TARGET_MATCH;
use crate::names::NameMap;

lazy_static! {
    // One endpoint descriptor: anonymization code plus that side's coverage percentage
    static ref ENDPOINT: Regex =
        Regex::new(r"sub/(\w+)/ \((\d+)%\)").expect("endpoint pattern compiles");
    // Comparison-page reference embedded in the first endpoint's link
    static ref PAGE_REF: Regex = Regex::new(r"match\d+\.html").expect("page pattern compiles");
}

/// Pulls the anonymization code and percentage out of one endpoint
/// descriptor. Returns `None` when the text doesn't match the expected
/// shape or the percentage is out of range.
fn parse_endpoint(text: &str) -> Option<(SubmissionId, u8)> {
    let caps = ENDPOINT.captures(text)?;
    let code = SubmissionId::new(caps.get(1)?.as_str());
    let pct = caps.get(2)?.as_str().parse::<u8>().ok()?;
    if pct > 100 {
        debug!(target: TARGET_MATCH, "Rejecting endpoint with out-of-range percentage {}: {}", pct, text);
        return None;
    }
    Some((code, pct))
}

/// Parses one raw comparison row into a `MatchRecord`.
///
/// # Arguments
/// * `extract` - One table row's endpoint texts and first-endpoint link
/// * `names` - Mapping from anonymization codes to display names
///
/// # Returns
/// * `Some(MatchRecord)` - If both endpoints and the page link parsed
/// * `None` - If any part is missing or malformed; such rows are
///   boundary noise and are skipped, never treated as errors
pub fn parse_extract(extract: &RawExtract, names: &NameMap) -> Option<MatchRecord> {
    let (id_a, pct_a) = parse_endpoint(&extract.endpoint_a)?;
    let (id_b, pct_b) = parse_endpoint(&extract.endpoint_b)?;
    let page_ref = PAGE_REF.find(&extract.link)?.as_str().to_string();

    // Coverage is computed from each side's perspective and need not be
    // symmetric; the canonical similarity is the larger of the two.
    let similarity = pct_a.max(pct_b);

    let name_a = names.resolve(&id_a);
    let name_b = names.resolve(&id_b);

    Some(MatchRecord {
        id_a,
        name_a,
        id_b,
        name_b,
        similarity,
        page_ref,
    })
}

/// Accumulates parsed match records in input order, indexed by their
/// first endpoint's anonymization code.
#[derive(Debug, Default)]
pub struct MatchStore {
    records: Vec<MatchRecord>,
    by_first: HashMap<SubmissionId, Vec<usize>>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one extract and, on success, appends the record.
    ///
    /// Returns whether a record was accepted. Malformed extracts are
    /// skipped with a debug log line.
    pub fn ingest(&mut self, extract: &RawExtract, names: &NameMap) -> bool {
        match parse_extract(extract, names) {
            Some(record) => {
                let index = self.records.len();
                self.by_first
                    .entry(record.id_a.clone())
                    .or_default()
                    .push(index);
                self.records.push(record);
                true
            }
            None => {
                debug!(target: TARGET_MATCH, "Skipping malformed extract: {:?}", extract);
                false
            }
        }
    }

    /// Parses a full extract sequence, returning how many rows were accepted.
    pub fn ingest_all(&mut self, extracts: &[RawExtract], names: &NameMap) -> usize {
        extracts
            .iter()
            .filter(|extract| self.ingest(extract, names))
            .count()
    }

    /// All accepted records, in input order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter()
    }

    /// Indices into the input-ordered record list for every record
    /// whose first endpoint is `id`.
    pub fn indices_for(&self, id: &SubmissionId) -> &[usize] {
        self.by_first.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record at a given input-order index.
    pub fn get(&self, index: usize) -> Option<&MatchRecord> {
        self.records.get(index)
    }

    /// Records whose first endpoint is `id`, in input order.
    pub fn records_for<'a>(&'a self, id: &SubmissionId) -> impl Iterator<Item = &'a MatchRecord> {
        self.indices_for(id).iter().map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(a: &str, pct_a: u8, b: &str, pct_b: u8, page: &str) -> RawExtract {
        RawExtract {
            endpoint_a: format!("sub/{}/ ({}%)", a, pct_a),
            endpoint_b: format!("sub/{}/ ({}%)", b, pct_b),
            link: format!("https://compare.example.org/results/{}", page),
        }
    }

    #[test]
    fn test_similarity_is_max_of_both_sides() {
        let names = NameMap::new();
        let record = parse_extract(&extract("101", 55, "207", 80, "match3.html"), &names)
            .expect("row should parse");
        assert_eq!(record.similarity, 80);
        assert_eq!(record.id_a, SubmissionId::from("101"));
        assert_eq!(record.id_b, SubmissionId::from("207"));
        assert_eq!(record.page_ref, "match3.html");
    }

    #[test]
    fn test_missing_display_name_falls_back_to_code() {
        let mut names = NameMap::new();
        names.insert(SubmissionId::from("101"), "Ada Lovelace");
        let record = parse_extract(&extract("101", 40, "207", 35, "match0.html"), &names)
            .expect("row should parse");
        assert_eq!(record.name_a, "Ada Lovelace");
        assert_eq!(record.name_b, "207");
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let names = NameMap::new();

        // No percentage on the second endpoint
        let mut bad = extract("101", 55, "207", 80, "match1.html");
        bad.endpoint_b = "sub/207/".to_string();
        assert!(parse_extract(&bad, &names).is_none());

        // No page reference in the link
        let mut bad = extract("101", 55, "207", 80, "match1.html");
        bad.link = "https://compare.example.org/results/index.html".to_string();
        assert!(parse_extract(&bad, &names).is_none());

        // Out-of-range percentage
        let bad = extract("101", 120, "207", 80, "match1.html");
        assert!(parse_extract(&bad, &names).is_none());
    }

    #[test]
    fn test_store_preserves_input_order_and_index() {
        let names = NameMap::new();
        let mut store = MatchStore::new();
        let rows = vec![
            extract("101", 70, "207", 60, "match0.html"),
            extract("101", 50, "305", 45, "match1.html"),
            extract("207", 30, "305", 20, "match2.html"),
        ];
        assert_eq!(store.ingest_all(&rows, &names), 3);

        let order: Vec<&str> = store.iter().map(|r| r.page_ref.as_str()).collect();
        assert_eq!(order, vec!["match0.html", "match1.html", "match2.html"]);

        let for_101: Vec<&str> = store
            .records_for(&SubmissionId::from("101"))
            .map(|r| r.page_ref.as_str())
            .collect();
        assert_eq!(for_101, vec!["match0.html", "match1.html"]);
        assert!(store
            .records_for(&SubmissionId::from("999"))
            .next()
            .is_none());
    }

    #[test]
    fn test_ingest_skips_bad_rows_without_aborting() {
        let names = NameMap::new();
        let mut store = MatchStore::new();
        let mut bad = extract("101", 55, "207", 80, "match1.html");
        bad.endpoint_a = "header row".to_string();
        let rows = vec![
            bad,
            extract("101", 55, "207", 80, "match1.html"),
        ];
        assert_eq!(store.ingest_all(&rows, &names), 1);
        assert_eq!(store.len(), 1);
    }
}
