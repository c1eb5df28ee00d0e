//! Enumeration of the physical paths to probe for one request.

use super::mapping::MappingEntry;
use super::pattern::{match_star, substitute};
use serde::Serialize;
use std::path::MAIN_SEPARATOR;
use tspaths_util::path;

/// How a probed path turns into a result once it is known to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// The mapped path itself; returned as-is.
    File,
    /// The mapped path plus an extension; returned without the extension.
    Extension,
    /// `<dir>/index<ext>`; returned as `<dir>`.
    Index,
    /// `<dir>/package.json`; its main field names the file to return.
    Package,
}

/// One physical location to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub path: String,
}

impl Candidate {
    fn new(kind: CandidateKind, path: String) -> Self {
        Self { kind, path }
    }

    /// The resolution result for this candidate once its path exists.
    ///
    /// `Package` candidates go through main-field lookup instead; for them
    /// this returns the path unchanged.
    #[must_use]
    pub fn stripped_path(&self) -> String {
        match self.kind {
            CandidateKind::File | CandidateKind::Package => self.path.clone(),
            CandidateKind::Extension => path::remove_extension(&self.path),
            CandidateKind::Index => path::dirname(&self.path),
        }
    }

    /// File named by a package main field, relative to this `package.json`.
    #[must_use]
    pub fn main_file(&self, main: &str) -> String {
        path::join(&path::dirname(&self.path), main)
    }
}

/// True for requests this system never maps: empty, relative, or absolute.
#[must_use]
pub fn is_unmappable(request: &str) -> bool {
    request.is_empty()
        || request.starts_with('.')
        || request.starts_with(MAIN_SEPARATOR)
        || request.starts_with('/')
}

/// Build the ordered candidate list for `request`.
///
/// For every matching entry (in entry order) and every target of that entry
/// (in target order) the mapped path contributes, in this order: the path
/// itself, the path plus each extension, `package.json` under it, and
/// `index` plus each extension under it. An empty list means no mapping applies.
#[must_use]
pub fn build_candidates(
    extensions: &[String],
    entries: &[MappingEntry],
    request: &str,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    if is_unmappable(request) {
        return candidates;
    }

    for entry in entries {
        let capture = if entry.pattern == request {
            Some("")
        } else {
            match_star(&entry.pattern, request)
        };
        let Some(capture) = capture else {
            continue;
        };

        for template in &entry.targets {
            let physical = substitute(template, capture);
            push_for_physical_path(&mut candidates, extensions, physical);
        }
    }

    candidates
}

fn push_for_physical_path(candidates: &mut Vec<Candidate>, extensions: &[String], physical: String) {
    candidates.push(Candidate::new(CandidateKind::File, physical.clone()));
    candidates.extend(
        extensions
            .iter()
            .map(|ext| Candidate::new(CandidateKind::Extension, format!("{physical}{ext}"))),
    );
    candidates.push(Candidate::new(
        CandidateKind::Package,
        path::join(&physical, "package.json"),
    ));
    let index = path::join(&physical, "index");
    candidates.extend(
        extensions
            .iter()
            .map(|ext| Candidate::new(CandidateKind::Index, format!("{index}{ext}"))),
    );
}
