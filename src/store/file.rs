use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{LibraryError, Result};
use crate::models::Book;

/// Indentation used for the JSON file so hand edits stay readable.
const INDENT: &[u8] = b"    ";

/// Read every book stored at `path`, in file order. A missing file is an empty
/// library rather than an error.
pub fn load_books(path: &Path) -> Result<Vec<Book>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no library file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(LibraryError::io("read", path, err)),
    };

    serde_json::from_str(&contents).map_err(|source| {
        warn!(path = %path.display(), error = %source, "library file is not a list of books");
        LibraryError::CorruptData {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Replace the file at `path` with `books`. The payload goes to a temporary
/// file in the same directory first and is renamed over the target once it is
/// synced, so an interrupted write leaves the previous content intact.
pub fn save_books(path: &Path, books: &[Book]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| LibraryError::io("write", path, err))?;
    write_json(temp.as_file_mut(), books).map_err(|err| LibraryError::io("write", path, err))?;
    // Temp files are created owner-only; the replaced file keeps its mode.
    if let Ok(meta) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|err| LibraryError::io("write", path, err))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|err| LibraryError::io("sync", path, err))?;
    temp.persist(path)
        .map_err(|err| LibraryError::io("replace", path, err.error))?;

    debug!(path = %path.display(), count = books.len(), "library saved");
    Ok(())
}

fn write_json<W: Write>(writer: W, books: &[Book]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    books.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            year: 1965,
            genre: "Sci-Fi".into(),
            read: true,
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let books = load_books(&dir.path().join("library.json")).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn saved_file_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        save_books(&path, &[dune()]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"title\": \"Dune\""));
        assert_eq!(load_books(&path).unwrap(), vec![dune()]);
    }

    #[test]
    fn save_leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        save_books(&path, &[dune()]).unwrap();
        save_books(&path, &[]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(load_books(&path).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "[]").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        save_books(&path, &[dune()]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(load_books(&path).unwrap(), vec![dune()]);
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_books(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::Io { action: "read", .. }));
    }

    #[test]
    fn unparseable_file_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"{"title": "not a list"}"#).unwrap();

        let err = load_books(&path).unwrap_err();
        assert!(matches!(err, LibraryError::CorruptData { .. }));
    }

    #[test]
    fn record_with_wrong_types_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            r#"[{"title": "Dune", "author": "Frank Herbert", "year": "1965", "genre": "Sci-Fi", "read": true}]"#,
        )
        .unwrap();

        assert!(matches!(
            load_books(&path),
            Err(LibraryError::CorruptData { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            r#"[{"genre": "Sci-Fi", "read": true, "title": "Dune", "year": 1965, "author": "Frank Herbert", "rating": 5}]"#,
        )
        .unwrap();

        assert_eq!(load_books(&path).unwrap(), vec![dune()]);
    }

    #[test]
    fn missing_parent_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("library.json");

        let err = save_books(&path, &[dune()]).unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }
}
