//! tsconfig.json / jsconfig.json discovery and parsing.
//!
//! Only the parts of the file that matter for path mapping are read:
//! `extends`, `compilerOptions.baseUrl` and `compilerOptions.paths`.
//! Files are parsed as JSON5, which covers the comments and trailing commas
//! tsconfig files routinely contain.

use crate::error::{Error, Result};
use crate::resolver::PathsMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tspaths_util::fs::{first_file_in, read_to_string_lossy, walk_up};
use tspaths_util::path::normalize;

/// Config file names in priority order.
pub const CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    extends: Option<Extends>,
    compiler_options: Option<RawCompilerOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    paths: Option<PathsMap>,
}

/// `baseUrl` as written, together with the directory it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    /// The value from the file.
    pub raw: String,
    /// `raw` resolved against the directory of the file that declared it.
    pub absolute: PathBuf,
}

/// The path-mapping view of a tsconfig with its `extends` chain applied.
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// The file that was loaded (not its bases).
    pub path: PathBuf,
    pub base_url: Option<BaseUrl>,
    pub paths: Option<PathsMap>,
}

impl TsConfig {
    /// Directory containing the loaded file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Apply `self` over `base`: every option set here wins.
    fn merged_over(self, base: TsConfig) -> TsConfig {
        TsConfig {
            path: self.path,
            base_url: self.base_url.or(base.base_url),
            paths: self.paths.or(base.paths),
        }
    }
}

/// Find the nearest `tsconfig.json` (preferred) or `jsconfig.json`, walking
/// up from `start`.
#[must_use]
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    walk_up(start, |dir| first_file_in(dir, CONFIG_FILES))
}

/// A single config file before its `extends` chain is applied.
#[derive(Debug, Clone)]
pub struct ParsedTsConfig {
    pub extends: Option<Vec<String>>,
    pub base_url: Option<BaseUrl>,
    pub paths: Option<PathsMap>,
}

/// Parse tsconfig source text found at `path`.
pub fn parse_tsconfig(path: &Path, source: &str) -> Result<ParsedTsConfig> {
    let raw: RawTsConfig = json5::from_str(source).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let options = raw.compiler_options.unwrap_or_default();
    let base_url = options.base_url.map(|raw| BaseUrl {
        absolute: normalize(&dir.join(&raw)),
        raw,
    });

    Ok(ParsedTsConfig {
        extends: raw.extends.map(Extends::into_vec),
        base_url,
        paths: options.paths,
    })
}

/// Load `path` and every config it extends.
pub fn load_tsconfig(path: &Path) -> Result<TsConfig> {
    let mut visited = HashSet::new();
    load_tsconfig_inner(path, &mut visited)
}

fn load_tsconfig_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        return Err(Error::ExtendsCycle { path: canonical });
    }

    let source = read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_tsconfig(path, &source)?;

    let mut config = TsConfig {
        path: path.to_path_buf(),
        base_url: parsed.base_url,
        paths: parsed.paths,
    };

    if let Some(extends) = parsed.extends {
        let dir = config.dir().to_path_buf();
        // Later bases override earlier ones; the extending file overrides all.
        let mut merged: Option<TsConfig> = None;
        for value in extends {
            let base_path = resolve_extends_path(&dir, &value)?;
            let base = load_tsconfig_inner(&base_path, visited)?;
            merged = Some(match merged {
                Some(earlier) => base.merged_over(earlier),
                None => base,
            });
        }
        if let Some(base) = merged {
            config = config.merged_over(base);
        }
    }

    tracing::debug!(
        path = %config.path.display(),
        base_url = ?config.base_url.as_ref().map(|b| &b.raw),
        paths = config.paths.as_ref().map_or(0, indexmap::IndexMap::len),
        "loaded tsconfig"
    );

    visited.remove(&canonical);
    Ok(config)
}

/// Locate the file named by an `extends` value.
///
/// Relative and absolute values are files (`.json` is appended when
/// missing); anything else is looked up in `node_modules` directories from
/// `dir` upwards, where a package directory contributes its `tsconfig.json`.
fn resolve_extends_path(dir: &Path, value: &str) -> Result<PathBuf> {
    let with_json = if Path::new(value).extension().is_some_and(|ext| ext == "json") {
        value.to_string()
    } else {
        format!("{value}.json")
    };

    if value.starts_with("./") || value.starts_with("../") || Path::new(value).is_absolute() {
        return Ok(normalize(&dir.join(with_json)));
    }

    walk_up(dir, |current| {
        let base = current.join("node_modules");
        let exact = base.join(value);
        if exact.is_file() {
            return Some(exact);
        }
        let json = base.join(&with_json);
        if json.is_file() {
            return Some(json);
        }
        if exact.is_dir() {
            return first_file_in(&exact, &["tsconfig.json"]);
        }
        None
    })
    .ok_or_else(|| Error::ConfigRead {
        path: dir.join("node_modules").join(value),
        source: io::Error::new(io::ErrorKind::NotFound, "extended config not found"),
    })
}
