use std::path::PathBuf;

/// Name of the generated index. Files with this name are never indexed.
pub const INDEX_FILE_NAME: &str = "index.xml";

/// Suffix of the file the index is staged in before it is renamed into place.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Prefix of the staging file for `file_name`, e.g. `.index.xml.`.
pub fn staging_prefix(file_name: &str) -> String {
    format!(".{}.", file_name)
}

/// True for a staged index, e.g. one left behind by an interrupted run.
pub fn is_staging_file(name: &str) -> bool {
    name.starts_with(&staging_prefix(INDEX_FILE_NAME)) && name.ends_with(STAGING_SUFFIX)
}

/// Base directory used when neither the CLI nor a config file names one.
pub const DEFAULT_BASE_DIR: &str = "xml_configurations";

/// Represents the final configuration after merging the config file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Absolute path of the tree to index.
    pub base_dir: PathBuf,
    pub exclude: Vec<String>,
    pub sort: bool,
    pub escape_xml: bool,
    pub follow_links: bool,
    pub dry_run: bool,
}

impl RuntimeConfig {
    /// Defaults for `base_dir`: no excludes, traversal order, literal text.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            exclude: Vec::new(),
            sort: false,
            escape_xml: false,
            follow_links: false,
            dry_run: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(INDEX_FILE_NAME)
    }
}

/// Represents a single file discovered during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the base directory, always `/`-separated.
    pub relative_path: String,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct IndexSummary {
    pub output_path: PathBuf,
    pub entry_count: usize,
}
