use crate::app::error::IndexError;
use crate::app::models::{staging_prefix, INDEX_FILE_NAME, STAGING_SUFFIX};
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Replaces `path` with `contents` byte for byte.
///
/// The document is written to a temporary file next to the destination,
/// fsynced and renamed into place, so a failed run leaves the previous index
/// untouched. The temporary file is removed on every error path.
///
/// An existing index keeps its permissions; a new one gets `0o644` on Unix.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), IndexError> {
    let write_err = |source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(INDEX_FILE_NAME);

    // Staging files are created 0600; decide the final mode before the rename.
    let permissions = fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.permissions())
        .or_else(default_permissions);

    let mut temp_file = Builder::new()
        .prefix(&staging_prefix(file_name))
        .suffix(STAGING_SUFFIX)
        .tempfile_in(parent)
        .map_err(write_err)?;
    temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
    if let Some(permissions) = permissions {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }
    temp_file.as_file().sync_all().map_err(write_err)?;

    temp_file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_exact_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.xml");
        write_atomic(&path, "a\r\nb").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a\r\nb");
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.xml");
        fs::write(&path, "a much longer stale index document").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        write_atomic(&dir.path().join("index.xml"), "x").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["index.xml"]);
    }

    #[test]
    fn destination_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.xml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.xml"), "k").unwrap();

        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.is_io());
        assert!(path.join("keep.xml").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn new_index_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.xml");
        write_atomic(&path, "x").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn existing_mode_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.xml");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, "new").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn missing_parent_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = write_atomic(&dir.path().join("gone/index.xml"), "x").unwrap_err();
        assert!(matches!(err, IndexError::Write { .. }));
    }
}
