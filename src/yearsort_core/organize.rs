use crate::yearsort_core::conflict::{
    BucketAction, Conflict, ConflictPolicy, ConflictResolver, resolve_conflicts,
};
use crate::yearsort_core::error::{Result, YearsortError};
use crate::yearsort_core::exif::{MetadataReader, extract_year};
use crate::yearsort_core::media::{YearLookup, is_eligible_image};
use crate::yearsort_core::report::{FileOutcome, OrganizeReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything an organize run needs to know.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub conflict_policy: ConflictPolicy,
}

/// A file that has a year and will be moved into its bucket.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub bucket: PathBuf,
    pub target: PathBuf,
}

#[derive(Debug, Clone)]
pub enum PlanEntry {
    Move(PlannedMove),
    /// Nothing to do for this file; the outcome is already known.
    Settled(FileOutcome),
}

/// Result of walking the source tree, before anything is touched.
#[derive(Debug)]
pub struct OrganizePlan {
    pub entries: Vec<PlanEntry>,
    /// Target buckets that existed before the run, in path order.
    pub conflicts: Vec<Conflict>,
}

impl OrganizePlan {
    pub fn moves(&self) -> impl Iterator<Item = &PlannedMove> {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::Move(m) => Some(m),
            PlanEntry::Settled(_) => None,
        })
    }
}

/// Sort the images under `config.source` into year folders under `config.destination`.
///
/// Runs in three phases: the source tree is walked and every image classified,
/// then all pre-existing year folders are resolved against the conflict
/// policy, and only then are files moved. Failures to move individual files
/// are recorded in the report and do not stop the run.
pub fn organize(
    config: &OrganizeConfig,
    reader: &mut dyn MetadataReader,
    resolver: &mut dyn ConflictResolver,
) -> Result<OrganizeReport> {
    if !config.source.is_dir() {
        return Err(YearsortError::NotADirectory(config.source.clone()));
    }

    if !config.destination.exists() {
        fs::create_dir_all(&config.destination)?;
        log::info!(
            "Created destination directory {}",
            config.destination.display()
        );
    } else if !config.destination.is_dir() {
        return Err(YearsortError::NotADirectory(config.destination.clone()));
    }

    let source = config.source.canonicalize()?;
    let destination = config.destination.canonicalize()?;

    log::info!(
        "Phase 1: Organizing photos in {} to {}",
        source.display(),
        destination.display()
    );
    let plan = plan(&source, &destination, reader);
    log::info!(
        "Found {} photos to move, {} existing year folders",
        plan.moves().count(),
        plan.conflicts.len()
    );

    log::info!("Phase 2: Resolving existing year folders");
    let actions = resolve_conflicts(config.conflict_policy, &plan.conflicts, resolver)?;

    log::info!("Phase 3: Moving files");
    let outcomes = execute(plan, &actions);

    Ok(OrganizeReport {
        source,
        destination,
        conflict_policy: config.conflict_policy,
        outcomes,
    })
}

/// Walk the source tree and classify every eligible image by year.
///
/// When the destination is nested inside the source its subtree is not walked.
pub fn plan(source: &Path, destination: &Path, reader: &mut dyn MetadataReader) -> OrganizePlan {
    let skip_destination = destination != source && destination.starts_with(source);

    let files: Vec<PathBuf> = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(skip_destination && e.path() == destination))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| is_file_or_link_to_file(e))
        .map(|e| e.into_path())
        .collect();

    let mut entries = Vec::new();
    let mut incoming: BTreeMap<PathBuf, usize> = BTreeMap::new();

    for path in &files {
        if !is_eligible_image(path) {
            log::debug!("Skipping non-image file: {}", path.display());
            continue;
        }

        let year = match extract_year(reader, path) {
            YearLookup::Year(year) => year,
            YearLookup::NoYear(reason) => {
                log::info!("No EXIF year found for {} ({})", path.display(), reason);
                entries.push(PlanEntry::Settled(FileOutcome::NoYear {
                    path: path.clone(),
                    reason,
                }));
                continue;
            }
        };

        let bucket = destination.join(year.as_str());
        let target = bucket.join(path.file_name().unwrap_or_default());

        if &target == path {
            log::debug!("Already in place: {}", path.display());
            entries.push(PlanEntry::Settled(FileOutcome::AlreadyInPlace {
                path: path.clone(),
            }));
            continue;
        }

        *incoming.entry(bucket.clone()).or_default() += 1;
        entries.push(PlanEntry::Move(PlannedMove {
            source: path.clone(),
            bucket,
            target,
        }));
    }

    let conflicts = incoming
        .into_iter()
        .filter(|(bucket, _)| bucket.exists())
        .map(|(bucket, count)| Conflict {
            holds_sources: files.iter().any(|f| f.starts_with(&bucket)),
            bucket,
            incoming: count,
        })
        .collect();

    OrganizePlan { entries, conflicts }
}

/// Links are not followed into directories; a link to a file is organized
/// like the file, and the link itself is what gets moved.
fn is_file_or_link_to_file(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    if entry.path().is_file() {
        true
    } else {
        log::debug!(
            "Skipping link that does not point to a file: {}",
            entry.path().display()
        );
        false
    }
}

/// Apply the bucket decisions and move every planned file.
pub fn execute(plan: OrganizePlan, actions: &BTreeMap<PathBuf, BucketAction>) -> Vec<FileOutcome> {
    // Buckets that could not be cleared, with the reason.
    let mut broken: HashMap<PathBuf, String> = HashMap::new();

    for (bucket, action) in actions {
        if *action != BucketAction::Replace {
            continue;
        }
        log::info!("Removing existing directory {}", bucket.display());
        if let Err(e) = replace_dir(bucket) {
            log::error!("Failed to replace {}: {}", bucket.display(), e);
            broken.insert(bucket.clone(), e.to_string());
        }
    }

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(plan.moves().count() as u64).with_style(style);
    bar.set_message("Moving files");

    let mut outcomes = Vec::with_capacity(plan.entries.len());

    for entry in plan.entries {
        let planned = match entry {
            PlanEntry::Settled(outcome) => {
                outcomes.push(outcome);
                continue;
            }
            PlanEntry::Move(planned) => planned,
        };

        let outcome = match actions.get(&planned.bucket) {
            Some(BucketAction::Skip) => {
                log::info!(
                    "Skipping {}: {} already exists",
                    planned.source.display(),
                    planned.bucket.display()
                );
                FileOutcome::SkippedConflict {
                    path: planned.source,
                    bucket: planned.bucket,
                }
            }
            _ => match broken.get(&planned.bucket) {
                Some(reason) => FileOutcome::Failed {
                    path: planned.source,
                    destination: planned.target,
                    error: reason.clone(),
                },
                None => move_into_bucket(planned),
            },
        };
        bar.inc(1);
        outcomes.push(outcome);
    }

    bar.finish_and_clear();
    outcomes
}

fn move_into_bucket(planned: PlannedMove) -> FileOutcome {
    let result = fs::create_dir_all(&planned.bucket)
        .and_then(|_| move_file(&planned.source, &planned.target));

    match result {
        Ok(()) => {
            log::info!(
                "Moved {} to {}",
                planned.source.display(),
                planned.bucket.display()
            );
            FileOutcome::Moved {
                source: planned.source,
                destination: planned.target,
            }
        }
        Err(e) => {
            log::error!(
                "Failed to move {} to {}: {}",
                planned.source.display(),
                planned.target.display(),
                e
            );
            FileOutcome::Failed {
                path: planned.source,
                destination: planned.target,
                error: e.to_string(),
            }
        }
    }
}

/// Delete a directory with all its contents and recreate it empty.
fn replace_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir)?;
    } else {
        fs::remove_file(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Move a file, replacing any file already at `to`.
///
/// Falls back to copy and delete when source and target are on different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
