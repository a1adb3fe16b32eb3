use crate::yearsort_core::conflict::ConflictPolicy;
use crate::yearsort_core::exif::MetadataBackend;
use clap::{Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sort photos into year folders by their EXIF capture date")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to yearsort.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move photos into <DESTINATION_DIR>/<year>/ folders.
    ///
    /// Every .jpg, .jpeg, .png and .tiff file under the source directory is
    /// read for its original capture date (falling back to the modification
    /// date stored in the file). Photos without a usable date stay where they
    /// are. Year folders that already exist are handled according to
    /// --conflict: merged into, skipped, or replaced after confirmation.
    Organize {
        /// Directory containing the photos to organize
        #[arg(required = true)]
        source_dir: PathBuf,

        /// Directory where the year folders are created
        #[arg(required = true)]
        destination_dir: PathBuf,

        /// What to do when a year folder already exists
        #[arg(long, value_enum, default_value_t = ConflictPolicy::Merge)]
        conflict: ConflictPolicy,

        /// Replace existing year folders without asking (with --conflict replace)
        #[arg(long, short = 'y')]
        yes: bool,

        /// Where capture dates are read from
        #[arg(long, value_enum, default_value_t = MetadataBackend::Exif)]
        backend: MetadataBackend,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Print the capture year of individual files
    Year {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where capture dates are read from
        #[arg(long, value_enum, default_value_t = MetadataBackend::Exif)]
        backend: MetadataBackend,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One line per file and a summary
    Text,
    /// JSON output
    Json,
}
