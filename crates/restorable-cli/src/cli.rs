//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "restorable")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a ZIP archive, rolling back every overwrite on failure
    Extract(ExtractArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Write one tar entry to standard output
    Cat(CatArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the ZIP archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Archive directory to use as extraction root
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Only extract entries matching this pattern (can be repeated)
    #[arg(long = "include", short = 'i', value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip entries matching this pattern (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Directory under which the temporary backup root is created
    #[arg(long, value_name = "DIR", conflicts_with = "no_backup")]
    pub backup_dir: Option<PathBuf>,

    /// Overwrite files without keeping backups
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file (tar, tar.gz or zip)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed file information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct CatArgs {
    /// Path to the tar or tar.gz archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Entry name as listed by `restorable list`
    #[arg(value_name = "ENTRY")]
    pub entry: String,
}
