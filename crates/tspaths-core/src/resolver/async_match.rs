//! Non-blocking resolution: walk the candidates with an [`AsyncFileSystem`].
//!
//! Probing is strictly sequential. Candidate `i + 1` is not looked at until
//! every probe for candidate `i` (including the main-file check of a
//! `package.json`) has completed, and the returned future completes once.

use super::candidates::{build_candidates, Candidate, CandidateKind};
use super::fs::AsyncFileSystem;
use super::mapping::MappingEntry;
use crate::error::Result;
use tspaths_util::path;

/// Resolve `request` against compiled `entries` without blocking.
///
/// Same contract as [`super::sync_match::match_from_entries`]: first existing
/// candidate wins, `Ok(None)` is not-found, and a capability error ends the
/// scan.
pub async fn match_from_entries_async<F>(
    entries: &[MappingEntry],
    request: &str,
    fs: &F,
    extensions: &[String],
    main_fields: &[String],
) -> Result<Option<String>>
where
    F: AsyncFileSystem + ?Sized,
{
    let candidates = build_candidates(extensions, entries, request);
    if candidates.is_empty() {
        tracing::trace!(request, "no path mapping applies");
        return Ok(None);
    }

    for candidate in &candidates {
        if let Some(found) = probe(candidate, fs, main_fields).await? {
            tracing::debug!(request, resolved = %found, "resolved via paths");
            return Ok(Some(found));
        }
    }

    tracing::debug!(request, tried = candidates.len(), "no candidate exists");
    Ok(None)
}

/// Callback-style entry point for hosts that expect a completion function.
///
/// `complete` is an `FnOnce`, so it is invoked exactly once: with the
/// resolution, or with the first capability error.
pub async fn match_with_callback<F, C>(
    entries: &[MappingEntry],
    request: &str,
    fs: &F,
    extensions: &[String],
    main_fields: &[String],
    complete: C,
) where
    F: AsyncFileSystem + ?Sized,
    C: FnOnce(Result<Option<String>>),
{
    complete(match_from_entries_async(entries, request, fs, extensions, main_fields).await);
}

async fn probe<F>(candidate: &Candidate, fs: &F, main_fields: &[String]) -> Result<Option<String>>
where
    F: AsyncFileSystem + ?Sized,
{
    tracing::trace!(kind = ?candidate.kind, path = %candidate.path, "probe");

    match candidate.kind {
        CandidateKind::File | CandidateKind::Extension | CandidateKind::Index => Ok(fs
            .file_exists(&candidate.path)
            .await?
            .then(|| candidate.stripped_path())),
        CandidateKind::Package => {
            let Some(package) = fs.read_package_json(&candidate.path).await? else {
                return Ok(None);
            };
            let Some(main) = package.main_field(main_fields) else {
                return Ok(None);
            };
            let main_file = candidate.main_file(main);
            Ok(fs
                .file_exists(&main_file)
                .await?
                .then(|| path::remove_extension(&main_file)))
        }
    }
}
