//! Rewrite mapped imports into specifiers relative to the importing file.

use crate::error::Result;
use crate::resolver::{AsyncFileSystem, FileSystem};
use std::path::{Path, PathBuf};
use tspaths_util::path::to_string;

/// Package a bare request would load from `node_modules`: `lodash/fp` is
/// `lodash`, `@scope/pkg/x` is `@scope/pkg`.
///
/// `None` for relative, absolute, or malformed scoped requests.
#[must_use]
pub fn package_name(request: &str) -> Option<&str> {
    if request.is_empty() || request.starts_with('.') || request.starts_with('/') {
        return None;
    }

    let mut segments = request.splitn(3, '/');
    let first = segments.next()?;
    if !first.starts_with('@') {
        return Some(first);
    }
    let name = segments.next().filter(|s| !s.is_empty())?;
    Some(&request[..first.len() + 1 + name.len()])
}

fn manifest_candidates(name: &str, from_dir: &Path) -> Vec<String> {
    from_dir
        .ancestors()
        .filter(|dir| dir.file_name().is_none_or(|n| n != "node_modules"))
        .map(|dir| {
            let mut manifest: PathBuf = dir.join("node_modules");
            manifest.push(name);
            manifest.push("package.json");
            to_string(&manifest)
        })
        .collect()
}

/// Whether `request` names a package installed in a `node_modules`
/// directory at or above `from_dir`.
pub fn is_installed_package<F>(request: &str, from_dir: &Path, fs: &F) -> Result<bool>
where
    F: FileSystem + ?Sized,
{
    let Some(name) = package_name(request) else {
        return Ok(false);
    };
    for manifest in manifest_candidates(name, from_dir) {
        if fs.file_exists(&manifest)? {
            tracing::trace!(%manifest, "request names an installed package");
            return Ok(true);
        }
    }
    Ok(false)
}

/// [`is_installed_package`] with non-blocking checks.
pub async fn is_installed_package_async<F>(request: &str, from_dir: &Path, fs: &F) -> Result<bool>
where
    F: AsyncFileSystem + ?Sized,
{
    let Some(name) = package_name(request) else {
        return Ok(false);
    };
    for manifest in manifest_candidates(name, from_dir) {
        if fs.file_exists(&manifest).await? {
            tracing::trace!(%manifest, "request names an installed package");
            return Ok(true);
        }
    }
    Ok(false)
}
