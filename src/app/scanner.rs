use crate::app::error::IndexError;
use crate::app::models::{is_staging_file, FileEntry, RuntimeConfig, INDEX_FILE_NAME};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Depth-first walker collecting every regular file under the base directory.
pub struct Scanner {
    root: PathBuf,
    exclude_set: GlobSet,
    sort: bool,
    follow_links: bool,
}

impl Scanner {
    pub fn new(config: &RuntimeConfig) -> Result<Self, IndexError> {
        Ok(Self {
            root: config.base_dir.clone(),
            exclude_set: build_globset(&config.exclude)?,
            sort: config.sort,
            follow_links: config.follow_links,
        })
    }

    /// Walks the whole tree. The first unreadable entry aborts the scan, so
    /// the result is either complete or an error.
    pub fn scan(&self) -> Result<Vec<FileEntry>, IndexError> {
        check_base_dir(&self.root)?;

        // The walker keeps its own stack of open directories, so deep trees
        // don't grow the call stack.
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_links);
        if self.sort {
            builder.sort_by_file_name(|a, b| a.cmp(b));
        }

        let mut entries = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if self.follow_links && is_dangling_link(&err) => {
                    log::debug!("Skipping broken symbolic link: {}", err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if let Some(processed) = self.process_entry(&entry)? {
                log::debug!("Indexed {}", processed.relative_path);
                entries.push(processed);
            }
        }

        Ok(entries)
    }

    fn process_entry(&self, entry: &DirEntry) -> Result<Option<FileEntry>, IndexError> {
        let path = entry.path();

        let Some(file_type) = entry.file_type() else {
            return Ok(None);
        };
        if !file_type.is_file() {
            if file_type.is_symlink() {
                log::debug!("Skipping symbolic link {}", path.display());
            } else if !file_type.is_dir() {
                log::debug!("Skipping special file {}", path.display());
            }
            return Ok(None);
        }

        // The index is our own output; listing it would make every
        // regeneration differ from the last.
        if entry.file_name() == INDEX_FILE_NAME {
            log::debug!("Skipping reserved file {}", path.display());
            return Ok(None);
        }
        if entry.file_name().to_str().is_some_and(is_staging_file) {
            log::debug!("Skipping staged index {}", path.display());
            return Ok(None);
        }

        let relative = match path.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => {
                return Err(IndexError::OutsideBase {
                    path: path.to_path_buf(),
                    base: self.root.clone(),
                })
            }
        };

        if self.exclude_set.is_match(relative) {
            log::debug!("Excluded {}", path.display());
            return Ok(None);
        }

        Ok(Some(FileEntry {
            relative_path: to_slash_path(relative),
        }))
    }
}

fn check_base_dir(root: &Path) -> Result<(), IndexError> {
    let metadata = fs::metadata(root).map_err(|source| match source.kind() {
        ErrorKind::NotFound => IndexError::BaseDirMissing(root.to_path_buf()),
        _ => IndexError::BaseDirUnreadable {
            path: root.to_path_buf(),
            source,
        },
    })?;
    if !metadata.is_dir() {
        return Err(IndexError::BaseDirNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// A followed link whose target is gone. Loops and unreadable targets
/// still abort the walk.
fn is_dangling_link(err: &ignore::Error) -> bool {
    error_path(err).is_some_and(|path| {
        fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
            && fs::metadata(path).is_err_and(|e| e.kind() == ErrorKind::NotFound)
    })
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// Joins the components with `/` whatever the native separator is.
fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, IndexError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).map_err(|e| IndexError::InvalidGlob(pat.clone(), e))?);
    }
    builder
        .build()
        .map_err(|e| IndexError::InvalidGlob(patterns.join(", "), e))
}
