use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Decode file bytes as UTF-8, replacing invalid sequences and dropping a
/// leading byte-order mark.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read a file with [`decode_lossy`].
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    fs::read(path).map(|bytes| decode_lossy(&bytes))
}

/// Find the first of `names` present as a regular file in `dir`.
///
/// `names` are checked in order, so earlier names take precedence.
#[must_use]
pub fn first_file_in(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Walk from `start` up to the filesystem root, returning the first directory hit
/// for which `probe` yields a value.
pub fn walk_up<T>(start: &Path, mut probe: impl FnMut(&Path) -> Option<T>) -> Option<T> {
    let mut current = Some(start);

    while let Some(dir) = current {
        if let Some(found) = probe(dir) {
            return Some(found);
        }
        current = dir.parent();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_decode_lossy_drops_bom_only_at_start() {
        assert_eq!(decode_lossy(b"\xEF\xBB\xBF{\"main\": \"a.js\"}"), r#"{"main": "a.js"}"#);
        assert_eq!(decode_lossy(b"{}\xEF\xBB\xBF"), "{}\u{FEFF}");
        assert_eq!(decode_lossy(b""), "");
    }

    #[test]
    fn test_decode_lossy_replaces_bad_bytes_after_bom() {
        let text = decode_lossy(b"\xEF\xBB\xBF{\"name\": \"caf\xE9\"}");
        assert!(text.starts_with("{\"name\""));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_to_string_lossy_uses_decoder() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBF// tsconfig\n{}").unwrap();
        file.flush().unwrap();

        assert_eq!(read_to_string_lossy(file.path()).unwrap(), "// tsconfig\n{}");
    }

    #[test]
    fn test_read_to_string_lossy_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_to_string_lossy(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_first_file_in_respects_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("jsconfig.json"), "{}").unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();

        let found = first_file_in(dir.path(), &["tsconfig.json", "jsconfig.json"]).unwrap();
        assert!(found.ends_with("tsconfig.json"));
    }

    #[test]
    fn test_first_file_in_ignores_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("tsconfig.json")).unwrap();

        assert!(first_file_in(dir.path(), &["tsconfig.json"]).is_none());
    }

    #[test]
    fn test_walk_up_finds_ancestor() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("marker"), "").unwrap();

        let found = walk_up(&nested, |d| {
            d.join("marker").is_file().then(|| d.to_path_buf())
        });
        assert_eq!(found.as_deref(), Some(dir.path()));
    }
}
