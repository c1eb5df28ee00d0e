//! Turn a project directory (or explicit parameters) into the
//! `(absolute_base_url, paths)` pair a [`MatchPath`] is compiled from.

use crate::error::{Error, Result};
use crate::resolver::{MatchOptions, MatchPath, PathsMap, DEFAULT_MAIN_FIELDS};
use crate::tsconfig::{find_config_file, load_tsconfig, CONFIG_FILES};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tspaths_util::fs::first_file_in;
use tspaths_util::path::{normalize, to_string};

/// Names a config file or a directory holding one.
pub const ENV_PROJECT: &str = "TS_NODE_PROJECT";
/// Replaces `compilerOptions.baseUrl` of the loaded config.
pub const ENV_BASE_URL: &str = "TS_NODE_BASEURL";

/// Environment lookup, injected so callers decide where variables come from.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable from the process environment.
#[must_use]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parameters supplied directly by a host, bypassing config discovery.
#[derive(Debug, Clone)]
pub struct ExplicitParams {
    /// Relative to the working directory the loader is given.
    pub base_url: String,
    pub paths: PathsMap,
    pub main_fields: Option<Vec<String>>,
    pub add_match_all: bool,
}

/// Everything needed to build a matcher, plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    /// `None` when built from [`ExplicitParams`].
    pub config_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub absolute_base_url: String,
    pub paths: PathsMap,
    pub main_fields: Vec<String>,
    pub add_match_all: bool,
}

impl LoadedConfig {
    /// Compile this configuration into a matcher.
    #[must_use]
    pub fn matcher(&self) -> MatchPath {
        MatchPath::new(
            &self.absolute_base_url,
            &self.paths,
            MatchOptions {
                main_fields: self.main_fields.clone(),
                add_match_all: self.add_match_all,
            },
        )
    }
}

/// Load the configuration for `cwd`: explicit parameters when given,
/// otherwise the discovered (or `TS_NODE_PROJECT`-named) tsconfig.
pub fn config_loader(cwd: &Path, explicit: Option<&ExplicitParams>, env: EnvLookup<'_>) -> Result<LoadedConfig> {
    match explicit {
        Some(params) => Ok(from_explicit(cwd, params)),
        None => load_config(cwd, None, env),
    }
}

fn from_explicit(cwd: &Path, params: &ExplicitParams) -> LoadedConfig {
    let absolute_base_url = to_string(&normalize(&cwd.join(&params.base_url)));
    tracing::debug!(base_url = %absolute_base_url, "using explicit path mapping parameters");

    LoadedConfig {
        config_file: None,
        base_url: Some(params.base_url.clone()),
        absolute_base_url,
        paths: params.paths.clone(),
        main_fields: params.main_fields.clone().unwrap_or_else(default_main_fields),
        add_match_all: params.add_match_all,
    }
}

/// Load a tsconfig-backed configuration.
///
/// `project` (or `TS_NODE_PROJECT` when `project` is `None`) names a config
/// file or a directory to look in; without either, the nearest config above
/// `cwd` is used.
pub fn load_config(cwd: &Path, project: Option<&Path>, env: EnvLookup<'_>) -> Result<LoadedConfig> {
    let config_file = locate_config(cwd, project, env)?;
    let tsconfig = load_tsconfig(&config_file)?;
    let config_dir = tsconfig.dir().to_path_buf();

    let (base_url, absolute_base_url) = match env(ENV_BASE_URL) {
        Some(raw) => {
            let absolute = normalize(&config_dir.join(&raw));
            (Some(raw), absolute)
        }
        None => match tsconfig.base_url {
            Some(base) => (Some(base.raw), base.absolute),
            None => (None, normalize(&config_dir)),
        },
    };

    let loaded = LoadedConfig {
        config_file: Some(config_file),
        add_match_all: base_url.is_some(),
        base_url,
        absolute_base_url: to_string(&absolute_base_url),
        paths: tsconfig.paths.unwrap_or_default(),
        main_fields: default_main_fields(),
    };

    tracing::debug!(
        config_file = ?loaded.config_file,
        absolute_base_url = %loaded.absolute_base_url,
        add_match_all = loaded.add_match_all,
        "loaded path mapping config"
    );
    Ok(loaded)
}

fn locate_config(cwd: &Path, project: Option<&Path>, env: EnvLookup<'_>) -> Result<PathBuf> {
    let project = project
        .map(Path::to_path_buf)
        .or_else(|| env(ENV_PROJECT).map(PathBuf::from));

    let Some(project) = project else {
        return find_config_file(cwd).ok_or_else(|| Error::ConfigNotFound {
            start: cwd.to_path_buf(),
        });
    };

    let project = normalize(&cwd.join(project));
    if project.is_dir() {
        return first_file_in(&project, CONFIG_FILES).ok_or(Error::ConfigNotFound { start: project });
    }
    Ok(project)
}

fn default_main_fields() -> Vec<String> {
    DEFAULT_MAIN_FIELDS.iter().map(|s| (*s).to_string()).collect()
}
