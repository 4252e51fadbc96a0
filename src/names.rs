//! Display-name resolution for anonymized submissions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::matches::SubmissionId;

// Reserved map keys carrying run metadata rather than submissions
const KEY_LANGUAGE: &str = "language";
const KEY_TITLE: &str = "title";

/// Mapping from anonymization codes to student display names.
///
/// The mapping the pipeline persists between runs is a plain text
/// format, one `<code> <display name>` entry per line. Two reserved
/// keys, `language` and `title`, carry run metadata for the outer
/// pipeline and are kept apart from the submission entries; this crate
/// only passes them through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameMap {
    names: HashMap<SubmissionId, String>,
    pub language: Option<String>,
    pub title: Option<String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the persisted mapping format.
    ///
    /// Lines that don't split into a key and a name are skipped with a
    /// warning; an incomplete mapping is expected and never an error.
    pub fn parse(text: &str) -> Self {
        let mut map = NameMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, name)) = line.split_once(char::is_whitespace) else {
                warn!("Skipping invalid name-map line: {}", line);
                continue;
            };
            let name = name.trim();
            match key {
                KEY_LANGUAGE => map.language = Some(name.to_string()),
                KEY_TITLE => map.title = Some(name.to_string()),
                _ => {
                    map.names
                        .insert(SubmissionId::from(key), name.to_string());
                }
            }
        }
        map
    }

    pub fn insert(&mut self, id: SubmissionId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Display name for a code; codes absent from the mapping are their
    /// own display name.
    pub fn resolve(&self, id: &SubmissionId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
