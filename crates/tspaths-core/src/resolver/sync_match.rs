//! Blocking resolution: walk the candidates with a [`FileSystem`].

use super::candidates::{build_candidates, Candidate, CandidateKind};
use super::fs::FileSystem;
use super::mapping::MappingEntry;
use crate::error::Result;
use tspaths_util::path;

/// Resolve `request` against compiled `entries`.
///
/// Candidates are probed strictly in order and the first hit wins. Returns
/// `Ok(None)` when nothing matches or nothing exists; an error from `fs`
/// stops the scan immediately.
pub fn match_from_entries<F>(
    entries: &[MappingEntry],
    request: &str,
    fs: &F,
    extensions: &[String],
    main_fields: &[String],
) -> Result<Option<String>>
where
    F: FileSystem + ?Sized,
{
    let candidates = build_candidates(extensions, entries, request);
    if candidates.is_empty() {
        tracing::trace!(request, "no path mapping applies");
        return Ok(None);
    }

    for candidate in &candidates {
        if let Some(found) = probe(candidate, fs, main_fields)? {
            tracing::debug!(request, resolved = %found, "resolved via paths");
            return Ok(Some(found));
        }
    }

    tracing::debug!(request, tried = candidates.len(), "no candidate exists");
    Ok(None)
}

fn probe<F>(candidate: &Candidate, fs: &F, main_fields: &[String]) -> Result<Option<String>>
where
    F: FileSystem + ?Sized,
{
    tracing::trace!(kind = ?candidate.kind, path = %candidate.path, "probe");

    match candidate.kind {
        CandidateKind::File | CandidateKind::Extension | CandidateKind::Index => {
            Ok(fs.file_exists(&candidate.path)?.then(|| candidate.stripped_path()))
        }
        CandidateKind::Package => {
            let Some(package) = fs.read_package_json(&candidate.path)? else {
                return Ok(None);
            };
            let Some(main) = package.main_field(main_fields) else {
                return Ok(None);
            };
            let main_file = candidate.main_file(main);
            Ok(fs
                .file_exists(&main_file)?
                .then(|| path::remove_extension(&main_file)))
        }
    }
}
