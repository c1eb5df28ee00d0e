#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod specifier;
pub mod tsconfig;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use loader::{config_loader, load_config, process_env, ExplicitParams, LoadedConfig};
pub use registry::{is_core_module, Registry};
pub use resolver::{
    default_extensions, AsyncFileSystem, DiskFs, FileSystem, MatchOptions, MatchPath, PathsMap, TokioFs,
};
pub use specifier::{is_installed_package, package_name};
pub use tsconfig::{find_config_file, load_tsconfig, TsConfig};
pub use version::{SCHEMA_VERSION, VERSION};
