//! tsconfig `paths` resolver.
//!
//! Maps bare specifiers through `compilerOptions.paths` (and the implicit
//! `baseUrl` catch-all) onto files, probing in the same order the
//! TypeScript compiler does: the mapped path itself, the path plus each
//! extension, `package.json` main field, then `index` plus each extension.

mod async_match;
mod candidates;
mod fs;
mod mapping;
mod matcher;
mod pattern;
mod sync_match;

pub use async_match::{match_from_entries_async, match_with_callback};
pub use candidates::{build_candidates, is_unmappable, Candidate, CandidateKind};
pub use fs::{AsyncFileSystem, DiskFs, FileSystem, PackageJson, TokioFs, DEFAULT_MAIN_FIELDS};
pub use mapping::{compile, MappingEntry, PathsMap};
pub use matcher::{default_extensions, MatchOptions, MatchPath, DEFAULT_EXTENSIONS};
pub use pattern::{match_star, prefix_len, substitute, WILDCARD};
pub use sync_match::match_from_entries;
