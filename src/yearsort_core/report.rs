use crate::yearsort_core::cli::OutputFormat;
use crate::yearsort_core::conflict::ConflictPolicy;
use crate::yearsort_core::error::Result;
use crate::yearsort_core::media::NoYearReason;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What happened to one eligible file during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Moved {
        source: PathBuf,
        destination: PathBuf,
    },
    NoYear {
        path: PathBuf,
        reason: NoYearReason,
    },
    AlreadyInPlace {
        path: PathBuf,
    },
    SkippedConflict {
        path: PathBuf,
        bucket: PathBuf,
    },
    Failed {
        path: PathBuf,
        destination: PathBuf,
        error: String,
    },
}

/// Result of an organize run, in walk order.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub conflict_policy: ConflictPolicy,
    pub outcomes: Vec<FileOutcome>,
}

impl OrganizeReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(*o)).count()
    }

    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Moved { .. }))
    }

    pub fn no_year(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::NoYear { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::SkippedConflict { .. } | FileOutcome::AlreadyInPlace { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }
}

impl std::fmt::Display for OrganizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} moved, {} without a year, {} skipped, {} failed",
            self.moved(),
            self.no_year(),
            self.skipped(),
            self.failed()
        )
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn parent(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

/// One console line per outcome.
pub fn format_outcome(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Moved {
            source,
            destination,
        } => format!(
            "Moved {} to {}",
            file_name(source),
            parent(destination).display()
        ),
        FileOutcome::NoYear { path, reason } => {
            format!("No EXIF year found for {} ({})", file_name(path), reason)
        }
        FileOutcome::AlreadyInPlace { path } => {
            format!("{} is already in {}", file_name(path), parent(path).display())
        }
        FileOutcome::SkippedConflict { path, bucket } => format!(
            "Skipped {}: {} already exists",
            file_name(path),
            bucket.display()
        ),
        FileOutcome::Failed {
            path,
            destination,
            error,
        } => format!(
            "Failed to move {} to {}: {}",
            path.display(),
            parent(destination).display(),
            error
        ),
    }
}

/// Render a report for the console.
pub fn format_report(report: &OrganizeReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut lines: Vec<String> = report.outcomes.iter().map(format_outcome).collect();
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!(
                "Organized photos in {} to {}",
                report.source.display(),
                report.destination.display()
            ));
            lines.push(format!("  {}", report));
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrganizeReport {
        OrganizeReport {
            source: PathBuf::from("/src"),
            destination: PathBuf::from("/dest"),
            conflict_policy: ConflictPolicy::Merge,
            outcomes: vec![
                FileOutcome::Moved {
                    source: PathBuf::from("/src/a.jpg"),
                    destination: PathBuf::from("/dest/2023/a.jpg"),
                },
                FileOutcome::NoYear {
                    path: PathBuf::from("/src/b.png"),
                    reason: NoYearReason::NoMetadata,
                },
                FileOutcome::SkippedConflict {
                    path: PathBuf::from("/src/c.jpg"),
                    bucket: PathBuf::from("/dest/2022"),
                },
            ],
        }
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.moved(), 1);
        assert_eq!(report.no_year(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(
            report.to_string(),
            "1 moved, 1 without a year, 1 skipped, 0 failed"
        );
    }

    #[test]
    fn test_text_lines() {
        let text = format_report(&sample(), &OutputFormat::Text).unwrap();
        assert!(text.contains(&format!("Moved a.jpg to {}", Path::new("/dest/2023").display())));
        assert!(text.contains("No EXIF year found for b.png (no embedded metadata)"));
        assert!(text.contains("Skipped c.jpg"));
        assert!(text.ends_with("1 moved, 1 without a year, 1 skipped, 0 failed"));
    }

    #[test]
    fn test_json_output() {
        let json = format_report(&sample(), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["conflict_policy"], "merge");
        assert_eq!(value["outcomes"][0]["status"], "moved");
        assert_eq!(value["outcomes"][1]["status"], "no_year");
        assert_eq!(value["outcomes"][1]["reason"]["kind"], "no_metadata");
        assert_eq!(value["outcomes"][2]["status"], "skipped_conflict");
    }
}
