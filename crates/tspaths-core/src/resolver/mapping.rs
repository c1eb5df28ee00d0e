//! Compilation of raw `paths` tables into ordered, absolute mapping entries.

use super::pattern::{prefix_len, WILDCARD};
use indexmap::IndexMap;
use serde::Serialize;
use tspaths_util::path;

/// Raw `compilerOptions.paths` table, in declaration order.
pub type PathsMap = IndexMap<String, Vec<String>>;

/// One compiled `paths` entry.
///
/// `targets` are absolute path templates that may still contain a `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// Virtual specifier pattern, at most one `*`.
    pub pattern: String,
    /// Absolute target templates, in the order they must be tried.
    pub targets: Vec<String>,
}

/// Compile `paths` against `absolute_base_url`.
///
/// Entries come out sorted by descending literal prefix length; the sort is
/// stable, so ties keep declaration order. When `add_match_all` is set and no
/// `"*"` key exists, a lowest-priority `* -> <base>/*` entry is appended.
#[must_use]
pub fn compile(absolute_base_url: &str, paths: &PathsMap, add_match_all: bool) -> Vec<MappingEntry> {
    let mut entries: Vec<MappingEntry> = paths
        .iter()
        .map(|(pattern, templates)| {
            if pattern.matches(WILDCARD).count() > 1 {
                tracing::warn!(%pattern, "paths pattern has more than one wildcard and will never match");
            }
            MappingEntry {
                pattern: pattern.clone(),
                targets: templates
                    .iter()
                    .map(|template| path::resolve(absolute_base_url, template))
                    .collect(),
            }
        })
        .collect();

    entries.sort_by(|a, b| prefix_len(&b.pattern).cmp(&prefix_len(&a.pattern)));

    if add_match_all && !paths.contains_key("*") {
        entries.push(MappingEntry {
            pattern: "*".to_string(),
            targets: vec![path::join(absolute_base_url, "*")],
        });
    }

    tracing::debug!(
        base_url = absolute_base_url,
        entries = entries.len(),
        "compiled path mappings"
    );

    entries
}
