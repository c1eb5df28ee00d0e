//! Per-host registry of loaded path-mapping configurations.
//!
//! A host module loader asks the registry to map each request before falling
//! back to its own resolution. Configurations are discovered lazily from the
//! importing file's directory and kept for reuse; resolutions are not cached.

use crate::error::{Error, Result};
use crate::loader::{config_loader, EnvLookup, ExplicitParams, LoadedConfig};
use crate::resolver::{default_extensions, AsyncFileSystem, FileSystem, MatchPath};
use crate::specifier::{is_installed_package, is_installed_package_async};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tspaths_util::path::local_specifier;

/// Node built-in module names. These are never mapped.
pub const CORE_MODULES: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Whether `request` names a Node built-in (`fs`, `node:fs`, ...).
#[must_use]
pub fn is_core_module(request: &str) -> bool {
    request.starts_with("node:") || CORE_MODULES.contains(&request)
}

/// A loaded configuration together with its compiled matcher.
#[derive(Debug, Clone)]
pub struct ConfigMatcher {
    pub config: LoadedConfig,
    pub matcher: MatchPath,
}

impl From<LoadedConfig> for ConfigMatcher {
    fn from(config: LoadedConfig) -> Self {
        let matcher = config.matcher();
        Self { config, matcher }
    }
}

/// Path-mapping registry for one host process.
pub struct Registry<'e> {
    explicit: Option<ExplicitParams>,
    env: EnvLookup<'e>,
    extensions: Vec<String>,
    main_fields: Option<Vec<String>>,
    matchers: Vec<ConfigMatcher>,
    /// Matcher chosen for each directory a config was looked up from.
    dirs: HashMap<PathBuf, Option<usize>>,
}

impl std::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("explicit", &self.explicit)
            .field("extensions", &self.extensions)
            .field("main_fields", &self.main_fields)
            .field("matchers", &self.matchers)
            .field("dirs", &self.dirs)
            .finish_non_exhaustive()
    }
}

impl<'e> Registry<'e> {
    /// Load the primary configuration for `cwd`.
    ///
    /// Returns `Ok(None)` when there is no configuration to register; any
    /// other load failure is an error.
    pub fn new(cwd: &Path, explicit: Option<ExplicitParams>, env: EnvLookup<'e>) -> Result<Option<Self>> {
        let primary = match config_loader(cwd, explicit.as_ref(), env) {
            Ok(config) => config,
            Err(Error::ConfigNotFound { start }) => {
                tracing::warn!(start = %start.display(), "no tsconfig found, path mapping disabled");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(Some(Self {
            explicit,
            env,
            extensions: default_extensions(),
            main_fields: None,
            matchers: vec![primary.into()],
            dirs: HashMap::new(),
        }))
    }

    /// Replace the probed extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Replace the `package.json` main fields of every configuration,
    /// including ones loaded later.
    #[must_use]
    pub fn with_main_fields(mut self, main_fields: Vec<String>) -> Self {
        for entry in &mut self.matchers {
            entry.config.main_fields.clone_from(&main_fields);
            entry.matcher = entry.config.matcher();
        }
        self.main_fields = Some(main_fields);
        self
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Configurations loaded so far, primary first.
    #[must_use]
    pub fn matchers(&self) -> &[ConfigMatcher] {
        &self.matchers
    }

    /// Map `request` for an import made from `parent_file`.
    ///
    /// `Ok(None)` means the host should resolve `request` unchanged.
    pub fn resolve_request<F>(
        &mut self,
        request: &str,
        parent_file: Option<&Path>,
        fs: &F,
    ) -> Result<Option<String>>
    where
        F: FileSystem + ?Sized,
    {
        if is_core_module(request) {
            return Ok(None);
        }

        let Some(index) = self.matcher_for(parent_file)? else {
            return Ok(None);
        };
        self.matchers[index].matcher.resolve(request, fs, &self.extensions)
    }

    /// [`Registry::resolve_request`] with non-blocking probes.
    ///
    /// Loading a newly needed configuration still reads it synchronously.
    pub async fn resolve_request_async<F>(
        &mut self,
        request: &str,
        parent_file: Option<&Path>,
        fs: &F,
    ) -> Result<Option<String>>
    where
        F: AsyncFileSystem + ?Sized,
    {
        if is_core_module(request) {
            return Ok(None);
        }

        let Some(index) = self.matcher_for(parent_file)? else {
            return Ok(None);
        };
        self.matchers[index]
            .matcher
            .resolve_async(request, fs, &self.extensions)
            .await
    }

    /// Rewrite `request`, imported from `parent_file`, into a specifier
    /// relative to that file's directory (`@/util` becomes `../util`).
    ///
    /// `Ok(None)` means the import stays as written: the request is not
    /// mapped, or it names a package installed in `node_modules`.
    pub fn resolve_relative<F>(&mut self, request: &str, parent_file: &Path, fs: &F) -> Result<Option<String>>
    where
        F: FileSystem + ?Sized,
    {
        let Some(resolved) = self.resolve_request(request, Some(parent_file), fs)? else {
            return Ok(None);
        };
        let from_dir = parent_dir(parent_file);
        if is_installed_package(request, &from_dir, fs)? {
            return Ok(None);
        }
        Ok(Some(local_specifier(&from_dir, &resolved)))
    }

    /// [`Registry::resolve_relative`] with non-blocking checks.
    pub async fn resolve_relative_async<F>(
        &mut self,
        request: &str,
        parent_file: &Path,
        fs: &F,
    ) -> Result<Option<String>>
    where
        F: AsyncFileSystem + ?Sized,
    {
        let Some(resolved) = self.resolve_request_async(request, Some(parent_file), fs).await? else {
            return Ok(None);
        };
        let from_dir = parent_dir(parent_file);
        if is_installed_package_async(request, &from_dir, fs).await? {
            return Ok(None);
        }
        Ok(Some(local_specifier(&from_dir, &resolved)))
    }

    fn matcher_for(&mut self, parent_file: Option<&Path>) -> Result<Option<usize>> {
        let Some(parent) = parent_file else {
            return Ok(Some(0));
        };

        if let Some(index) = self
            .matchers
            .iter()
            .position(|m| parent.starts_with(&m.config.absolute_base_url))
        {
            return Ok(Some(index));
        }

        let dir = parent_dir(parent);
        if let Some(cached) = self.dirs.get(&dir) {
            return Ok(*cached);
        }

        let index = match config_loader(&dir, self.explicit.as_ref(), self.env) {
            Ok(config) => Some(self.register(config, parent)),
            Err(Error::ConfigNotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        self.dirs.insert(dir, index);
        Ok(index)
    }

    /// Add `config` unless a matcher for the same file is already loaded.
    fn register(&mut self, mut config: LoadedConfig, parent: &Path) -> usize {
        if let Some(file) = &config.config_file {
            if let Some(existing) = self
                .matchers
                .iter()
                .position(|m| m.config.config_file.as_ref() == Some(file))
            {
                return existing;
            }
        }

        if let Some(fields) = &self.main_fields {
            config.main_fields.clone_from(fields);
        }
        tracing::debug!(
            parent = %parent.display(),
            absolute_base_url = %config.absolute_base_url,
            "registered config for importing file"
        );
        self.matchers.push(config.into());
        self.matchers.len() - 1
    }
}

fn parent_dir(file: &Path) -> PathBuf {
    file.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
