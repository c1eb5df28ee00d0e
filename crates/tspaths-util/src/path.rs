//! Lexical path helpers.
//!
//! Resolution works on path *strings* that may not exist on disk, so none of
//! these helpers touch the filesystem or follow symlinks.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the root is dropped; `..` at the start of a relative path is kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Join `rest` onto `base` and normalize the result.
///
/// Unlike [`Path::join`], a leading separator on `rest` does not discard
/// `base`: `join("/a", "/b")` is `/a/b`.
#[must_use]
pub fn join(base: &str, rest: &str) -> String {
    let rest = rest.trim_start_matches(['/', '\\']);
    to_string(&normalize(&Path::new(base).join(rest)))
}

/// Resolve `target` against `base`: absolute targets are kept (normalized),
/// relative ones are joined onto `base`.
#[must_use]
pub fn resolve(base: &str, target: &str) -> String {
    if Path::new(target).is_absolute() {
        to_string(&normalize(Path::new(target)))
    } else {
        join(base, target)
    }
}

/// The directory part of `path`, `"."` for a bare file name.
#[must_use]
pub fn dirname(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if parent.as_os_str().is_empty() => ".".to_string(),
        Some(parent) => to_string(parent),
        None => path.to_string(),
    }
}

/// Strip the final extension of the last path component.
///
/// Dots in directory names are ignored and dotfiles have no extension:
/// `lib.js/kalle.js` becomes `lib.js/kalle`, `dir/.env` is unchanged.
#[must_use]
pub fn remove_extension(path: &str) -> String {
    let name_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let name = &path[name_start..];

    match name.rfind('.') {
        Some(dot) if dot > 0 => path[..name_start + dot].to_string(),
        _ => path.to_string(),
    }
}

/// Posix-style relative path from directory `from` to `to`.
///
/// Both are normalized first; the result uses `/` on every platform and is
/// empty when they are the same directory.
#[must_use]
pub fn relative(from: &Path, to: &Path) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    parts.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// An import specifier for `target` as written in a file inside `from_dir`:
/// relative, `/`-separated, and starting with `.`.
#[must_use]
pub fn local_specifier(from_dir: &Path, target: &str) -> String {
    let rel = relative(from_dir, Path::new(target));
    if rel.is_empty() {
        "./".to_string()
    } else if rel.starts_with('.') {
        rel
    } else {
        format!("./{rel}")
    }
}

/// Lossy conversion used for every path that leaves this crate as a string.
#[must_use]
pub fn to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
