//! Compiled, reusable matcher for one `(baseUrl, paths)` configuration.

use super::async_match::match_from_entries_async;
use super::fs::{AsyncFileSystem, FileSystem, DEFAULT_MAIN_FIELDS};
use super::mapping::{compile, MappingEntry, PathsMap};
use super::sync_match::match_from_entries;
use crate::error::Result;
use std::sync::Arc;

/// Default extensions for probing.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Options applied when compiling a matcher.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// `package.json` fields naming a package entry, in priority order.
    pub main_fields: Vec<String>,
    /// Append an implicit `* -> <baseUrl>/*` entry when `paths` has no `*` key.
    pub add_match_all: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            main_fields: DEFAULT_MAIN_FIELDS.iter().map(|s| (*s).to_string()).collect(),
            add_match_all: true,
        }
    }
}

/// Matcher compiled once per configuration and shared across resolutions.
///
/// Cloning is cheap; the compiled entries are shared and never mutated, so
/// one matcher can serve concurrent resolutions.
#[derive(Debug, Clone)]
pub struct MatchPath {
    entries: Arc<[MappingEntry]>,
    main_fields: Arc<[String]>,
}

impl MatchPath {
    /// Compile `paths` against `absolute_base_url`.
    #[must_use]
    pub fn new(absolute_base_url: &str, paths: &PathsMap, options: MatchOptions) -> Self {
        Self {
            entries: compile(absolute_base_url, paths, options.add_match_all).into(),
            main_fields: options.main_fields.into(),
        }
    }

    /// The compiled entries, most specific first.
    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    #[must_use]
    pub fn main_fields(&self) -> &[String] {
        &self.main_fields
    }

    /// Resolve `request` with blocking probes.
    pub fn resolve<F>(&self, request: &str, fs: &F, extensions: &[String]) -> Result<Option<String>>
    where
        F: FileSystem + ?Sized,
    {
        match_from_entries(&self.entries, request, fs, extensions, &self.main_fields)
    }

    /// Resolve `request` with non-blocking probes.
    pub async fn resolve_async<F>(
        &self,
        request: &str,
        fs: &F,
        extensions: &[String],
    ) -> Result<Option<String>>
    where
        F: AsyncFileSystem + ?Sized,
    {
        match_from_entries_async(&self.entries, request, fs, extensions, &self.main_fields).await
    }
}

/// The default extension list as owned strings.
#[must_use]
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect()
}
