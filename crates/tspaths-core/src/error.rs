use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tspaths operations.
///
/// A module that simply cannot be found is not an error; resolvers report it
/// as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Couldn't find tsconfig.json or jsconfig.json from {start}")]
    ConfigNotFound { start: PathBuf },

    #[error("tsconfig extends cycle detected at {path}")]
    ExtendsCycle { path: PathBuf },

    #[error("Failed to parse package.json at {path}: {source}")]
    PackageJsonParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Filesystem access failed for {path}: {source}")]
    Capability {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the core crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
