pub mod cli;
pub mod conflict;
pub mod error;
pub mod exif;
pub mod media;
pub mod organize;
pub mod report;

#[cfg(test)]
mod testutil;

pub use cli::{Cli, Commands, OutputFormat};
pub use conflict::{AssumeYes, ConflictPolicy, ConflictResolver, PromptResolver};
pub use error::YearsortError;
pub use self::exif::{MetadataBackend, MetadataReader, extract_year};
pub use media::{CaptureYear, NoYearReason, YearLookup};
pub use organize::{OrganizeConfig, organize};
pub use report::{FileOutcome, OrganizeReport, format_report};
