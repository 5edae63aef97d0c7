use crate::app::cli::Cli;
use crate::app::models::{RuntimeConfig, DEFAULT_BASE_DIR};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Options accepted in `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_dir: Option<PathBuf>,
    exclude: Option<Vec<String>>,
    sort: Option<bool>,
    escape_xml: Option<bool>,
    follow_links: Option<bool>,
}

fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("xml_index").join("config.toml"))
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(ConfigFile::default()),
        },
    };

    log::debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn merge_vecs(file_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = file_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn merge(cli: Cli, file: ConfigFile, current_dir: &Path) -> RuntimeConfig {
    // CLI > config file > default. `join` keeps absolute paths as they are.
    let base_dir = cli
        .base_dir
        .or(file.base_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));

    RuntimeConfig {
        base_dir: current_dir.join(base_dir),
        exclude: merge_vecs(file.exclude, cli.exclude),
        sort: cli.sort || file.sort.unwrap_or(false),
        escape_xml: cli.escape_xml || file.escape_xml.unwrap_or(false),
        follow_links: cli.follow_links || file.follow_links.unwrap_or(false),
        dry_run: cli.dry_run,
    }
}

pub fn resolve_config(cli: Cli, current_dir: &Path) -> Result<RuntimeConfig> {
    let file = load_config_file(cli.config.as_deref())?;
    Ok(merge(cli, file, current_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_to_xml_configurations_under_cwd() {
        let config = merge(Cli::default(), ConfigFile::default(), Path::new("/work"));
        assert_eq!(config.base_dir, Path::new("/work/xml_configurations"));
        assert_eq!(config.output_path(), Path::new("/work/xml_configurations/index.xml"));
        assert!(config.exclude.is_empty());
        assert!(!config.sort && !config.escape_xml && !config.follow_links);
    }

    #[test]
    fn cli_base_dir_wins_over_file() {
        let cli = Cli {
            base_dir: Some(PathBuf::from("from_cli")),
            ..Cli::default()
        };
        let file = ConfigFile {
            base_dir: Some(PathBuf::from("from_file")),
            ..ConfigFile::default()
        };
        let config = merge(cli, file, Path::new("/work"));
        assert_eq!(config.base_dir, Path::new("/work/from_cli"));
    }

    #[test]
    fn absolute_base_dir_ignores_cwd() {
        let file = ConfigFile {
            base_dir: Some(PathBuf::from("/srv/configs")),
            ..ConfigFile::default()
        };
        let config = merge(Cli::default(), file, Path::new("/work"));
        assert_eq!(config.base_dir, Path::new("/srv/configs"));
    }

    #[test]
    fn excludes_are_merged_without_duplicates() {
        assert_eq!(
            merge_vecs(
                Some(vec!["*.bak".into(), "tmp/**".into()]),
                Some(vec!["tmp/**".into(), "*.swp".into()])
            ),
            vec!["*.bak", "tmp/**", "*.swp"]
        );
    }

    #[test]
    fn reads_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "base_dir = \"configs\"\nsort = true\nexclude = [\"*.bak\"]\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            escape_xml: true,
            ..Cli::default()
        };
        let config = resolve_config(cli, dir.path()).unwrap();
        assert_eq!(config.base_dir, dir.path().join("configs"));
        assert!(config.sort);
        assert!(config.escape_xml);
        assert!(!config.follow_links);
        assert_eq!(config.exclude, vec!["*.bak"]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("absent.toml")),
            ..Cli::default()
        };
        assert!(resolve_config(cli, dir.path()).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "output = \"other.xml\"\n").unwrap();
        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };
        let err = resolve_config(cli, dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }
}
