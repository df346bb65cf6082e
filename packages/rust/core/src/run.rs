//! End-to-end run: scan root → qualifying directories → one merge each.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument};

use mdparts_shared::{DirFailure, MdPartsError, MergeOptions, MergeOutcome, Result, RunSummary};

use crate::discover::find_qualifying_dirs;
use crate::merger::merge_directory;

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a directory is merged.
    fn directory_started(&self, dir: &Path);
    /// Called after a merged document was written.
    fn merged(&self, output: &Path, sections: usize);
    /// Called when a directory had no markdown files.
    fn skipped(&self, dir: &Path);
    /// Called in dry-run mode instead of `merged`.
    fn planned(&self, output: &Path, inputs: &[PathBuf]);
    /// Called when a directory failed and the run keeps going.
    fn failed(&self, dir: &Path, error: &MdPartsError);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn directory_started(&self, _dir: &Path) {}
    fn merged(&self, _output: &Path, _sections: usize) {}
    fn skipped(&self, _dir: &Path) {}
    fn planned(&self, _output: &Path, _inputs: &[PathBuf]) {}
    fn failed(&self, _dir: &Path, _error: &MdPartsError) {}
}

/// Merge every qualifying directory under `root`, in order.
///
/// Without `keep_going` the first error aborts the run. With it, failures
/// are reported, collected in the summary, and the next directory is tried.
#[instrument(skip_all, fields(root = %root.display(), dry_run = options.dry_run))]
pub fn run(
    root: &Path,
    options: &MergeOptions,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let start = Instant::now();
    options.validate()?;

    let dirs = find_qualifying_dirs(root, options.sort)?;
    info!(count = dirs.len(), "starting merge run");

    let mut summary = RunSummary::default();

    for dir in dirs {
        progress.directory_started(&dir);

        match merge_directory(&dir, options) {
            Ok(outcome) => {
                report(progress, &outcome);
                summary.outcomes.push(outcome);
            }
            Err(error) if options.keep_going => {
                debug!(dir = %dir.display(), %error, "directory failed, continuing");
                progress.failed(&dir, &error);
                summary.failures.push(DirFailure { dir, error });
            }
            Err(error) => return Err(error),
        }
    }

    info!(
        created = summary.created(),
        skipped = summary.skipped(),
        failed = summary.failures.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "merge run complete"
    );

    Ok(summary)
}

fn report(progress: &dyn ProgressReporter, outcome: &MergeOutcome) {
    match outcome {
        MergeOutcome::Created {
            output, sections, ..
        } => progress.merged(output, *sections),
        MergeOutcome::Skipped { dir } => progress.skipped(dir),
        MergeOutcome::Planned { output, inputs, .. } => progress.planned(output, inputs),
    }
}
