use crate::yearsort_core::error::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Stderr, Write};
use std::path::PathBuf;

/// How to treat a year bucket that already exists when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Move files into the existing folder alongside its contents
    Merge,
    /// Leave files bound for an existing folder where they are
    Skip,
    /// Ask before deleting the existing folder and starting it fresh
    Replace,
}

/// Resolved handling of one pre-existing bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketAction {
    Merge,
    Replace,
    Skip,
}

/// A bucket that existed before the run and will receive files.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub bucket: PathBuf,
    /// Number of files planned to move into the bucket.
    pub incoming: usize,
    /// The bucket holds files that this run is itself organizing.
    pub holds_sources: bool,
}

/// Asks whether an existing bucket may be deleted and recreated.
pub trait ConflictResolver {
    fn confirm_replace(&mut self, conflict: &Conflict) -> Result<bool>;
}

/// Prompts the operator on a terminal, defaulting to "no".
///
/// Questions go to stderr so that stdout stays clean for reports.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<io::StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        PromptResolver::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptResolver { input, output }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for PromptResolver<R, W> {
    fn confirm_replace(&mut self, conflict: &Conflict) -> Result<bool> {
        log::debug!(
            "{} incoming files for existing {}",
            conflict.incoming,
            conflict.bucket.display()
        );
        write!(
            self.output,
            "The directory {} already exists. Do you want to overwrite it? [y/N]: ",
            conflict.bucket.display()
        )?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            log::warn!(
                "No answer for {}, keeping it",
                conflict.bucket.display()
            );
            writeln!(self.output)?;
            return Ok(false);
        }

        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Confirms every replacement without asking.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl ConflictResolver for AssumeYes {
    fn confirm_replace(&mut self, _conflict: &Conflict) -> Result<bool> {
        Ok(true)
    }
}

/// Decide the handling of every conflicting bucket before any file moves.
pub fn resolve_conflicts(
    policy: ConflictPolicy,
    conflicts: &[Conflict],
    resolver: &mut dyn ConflictResolver,
) -> Result<BTreeMap<PathBuf, BucketAction>> {
    let mut actions = BTreeMap::new();

    for conflict in conflicts {
        let action = match policy {
            ConflictPolicy::Merge => BucketAction::Merge,
            ConflictPolicy::Skip => BucketAction::Skip,
            ConflictPolicy::Replace if conflict.holds_sources => {
                log::warn!(
                    "Not replacing {}: it contains files being organized",
                    conflict.bucket.display()
                );
                BucketAction::Skip
            }
            ConflictPolicy::Replace => {
                if resolver.confirm_replace(conflict)? {
                    BucketAction::Replace
                } else {
                    BucketAction::Skip
                }
            }
        };
        log::info!("Existing folder {}: {:?}", conflict.bucket.display(), action);
        actions.insert(conflict.bucket.clone(), action);
    }

    Ok(actions)
}
