use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Regenerate index.xml listing every file under a configuration directory"
)]
pub struct Cli {
    /// Directory to index, relative to the working directory [default: xml_configurations]
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Read options from this TOML file instead of ~/.config/xml_index/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Glob patterns (relative to the base directory) for files to leave out
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Visit each directory's children in file-name order
    #[arg(long)]
    pub sort: bool,

    /// Escape XML special characters in entry paths
    #[arg(long)]
    pub escape_xml: bool,

    /// Follow symbolic links while walking. Broken links are skipped; a link
    /// loop aborts the run
    #[arg(long)]
    pub follow_links: bool,

    /// Print the document to stdout instead of writing index.xml
    #[arg(long)]
    pub dry_run: bool,
}
