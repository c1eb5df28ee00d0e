//! Filesystem capabilities injected into the resolvers.
//!
//! The resolvers never touch the disk themselves. Production code passes
//! [`DiskFs`] or [`TokioFs`]; tests pass in-memory stubs.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io;
use tspaths_util::fs::decode_lossy;

/// Main fields tried when none are configured.
pub const DEFAULT_MAIN_FIELDS: &[&str] = &["main"];

/// The parsed top level of a `package.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageJson {
    fields: Map<String, Value>,
}

impl PackageJson {
    /// Wrap a parsed JSON value. A non-object top level has no fields.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Parse `package.json` text read from `path`.
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(|source| Error::PackageJsonParse {
                path: path.to_string(),
                source,
            })
    }

    /// Value of the first field in `main_fields` holding a non-empty string.
    #[must_use]
    pub fn main_field(&self, main_fields: &[String]) -> Option<&str> {
        main_fields.iter().find_map(|name| {
            self.fields
                .get(name)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
    }
}

impl From<Value> for PackageJson {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Blocking filesystem capability.
pub trait FileSystem: Send + Sync {
    /// Whether `path` is an existing regular file.
    fn file_exists(&self, path: &str) -> Result<bool>;

    /// Read and parse the `package.json` at `path`; `None` when it is absent.
    fn read_package_json(&self, path: &str) -> Result<Option<PackageJson>>;
}

/// Non-blocking filesystem capability.
#[async_trait]
pub trait AsyncFileSystem: Send + Sync {
    /// Whether `path` is an existing regular file.
    async fn file_exists(&self, path: &str) -> Result<bool>;

    /// Read and parse the `package.json` at `path`; `None` when it is absent.
    async fn read_package_json(&self, path: &str) -> Result<Option<PackageJson>>;
}

/// A probe that failed because the path does not exist (or runs through a file).
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn classify(path: &str, metadata: io::Result<std::fs::Metadata>) -> Result<bool> {
    match metadata {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if is_absent(&err) => Ok(false),
        Err(source) => Err(Error::Capability {
            path: path.to_string(),
            source,
        }),
    }
}

fn read_failure(path: &str, err: io::Error) -> Result<Option<PackageJson>> {
    if is_absent(&err) {
        Ok(None)
    } else {
        Err(Error::Capability {
            path: path.to_string(),
            source: err,
        })
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn file_exists(&self, path: &str) -> Result<bool> {
        classify(path, std::fs::metadata(path))
    }

    fn read_package_json(&self, path: &str) -> Result<Option<PackageJson>> {
        if !self.file_exists(path)? {
            return Ok(None);
        }
        match std::fs::read(path) {
            Ok(bytes) => PackageJson::parse(path, &decode_lossy(&bytes)).map(Some),
            Err(err) => read_failure(path, err),
        }
    }
}

/// [`AsyncFileSystem`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl AsyncFileSystem for TokioFs {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        classify(path, tokio::fs::metadata(path).await)
    }

    async fn read_package_json(&self, path: &str) -> Result<Option<PackageJson>> {
        if !self.file_exists(path).await? {
            return Ok(None);
        }
        match tokio::fs::read(path).await {
            Ok(bytes) => PackageJson::parse(path, &decode_lossy(&bytes)).map(Some),
            Err(err) => read_failure(path, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn path_str(path: &std::path::Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_main_field_first_present_wins() {
        let pkg = PackageJson::from(json!({"module": "./esm.js", "main": "./cjs.js"}));
        assert_eq!(pkg.main_field(&fields(&["browser", "module", "main"])), Some("./esm.js"));
        assert_eq!(pkg.main_field(&fields(&["main"])), Some("./cjs.js"));
    }

    #[test]
    fn test_main_field_ignores_non_strings_and_empty() {
        let pkg = PackageJson::from(json!({"browser": {"./a": false}, "module": "", "main": "index.js"}));
        assert_eq!(pkg.main_field(&fields(&["browser", "module", "main"])), Some("index.js"));
    }

    #[test]
    fn test_main_field_missing() {
        let pkg = PackageJson::from(json!({"name": "x"}));
        assert_eq!(pkg.main_field(&fields(&["main"])), None);
        assert_eq!(PackageJson::from(json!([1, 2])).main_field(&fields(&["main"])), None);
    }

    #[test]
    fn test_disk_file_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();

        assert!(DiskFs.file_exists(&path_str(&file)).unwrap());
        assert!(!DiskFs.file_exists(&path_str(dir.path())).unwrap());
        assert!(!DiskFs.file_exists(&path_str(&dir.path().join("missing.ts"))).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_disk_file_exists_through_a_file_is_false() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();

        let through = file.join("index.ts");
        assert!(!DiskFs.file_exists(&path_str(&through)).unwrap());
    }

    #[test]
    fn test_disk_read_package_json() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("package.json");
        fs::write(&pkg, r#"{"name": "x", "main": "lib/index.js"}"#).unwrap();

        let parsed = DiskFs.read_package_json(&path_str(&pkg)).unwrap().unwrap();
        assert_eq!(parsed.main_field(&fields(&["main"])), Some("lib/index.js"));
    }

    #[test]
    fn test_disk_read_package_json_absent() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("package.json");
        assert!(DiskFs.read_package_json(&path_str(&pkg)).unwrap().is_none());
    }

    #[test]
    fn test_disk_read_package_json_malformed() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("package.json");
        fs::write(&pkg, "{ not json").unwrap();

        let err = DiskFs.read_package_json(&path_str(&pkg)).unwrap_err();
        assert!(matches!(err, Error::PackageJsonParse { .. }));
    }

    #[tokio::test]
    async fn test_tokio_fs_matches_disk_fs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();
        let pkg = dir.path().join("package.json");
        fs::write(&pkg, r#"{"main": "a.ts"}"#).unwrap();

        assert!(TokioFs.file_exists(&path_str(&file)).await.unwrap());
        assert!(!TokioFs.file_exists(&path_str(&dir.path().join("b.ts"))).await.unwrap());
        let parsed = TokioFs.read_package_json(&path_str(&pkg)).await.unwrap().unwrap();
        assert_eq!(parsed.main_field(&fields(&["main"])), Some("a.ts"));
        assert!(TokioFs
            .read_package_json(&path_str(&dir.path().join("nope/package.json")))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_package_json_with_bom_reads_the_same_both_ways() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("package.json");
        fs::write(&pkg, b"\xEF\xBB\xBF{\"main\": \"./entry.js\"}").unwrap();

        let sync = DiskFs.read_package_json(&path_str(&pkg)).unwrap();
        let async_ = TokioFs.read_package_json(&path_str(&pkg)).await.unwrap();
        assert_eq!(sync, async_);
        assert_eq!(sync.unwrap().main_field(&fields(&["main"])), Some("./entry.js"));
    }
}
