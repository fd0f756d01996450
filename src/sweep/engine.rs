use std::collections::BinaryHeap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::error::{Result, SweeperError};

use super::exclusion::ExclusionSet;
use super::record::{RecordOrder, SmallestOnTop, SweepRecord, SweepResult};
use super::remover::{FsRemover, Remover};
use super::size::dir_size;
use super::target::{days_to_duration, CleanScope, SweepMode, SweepTarget};

/// Sweep a target with the filesystem remover.
pub fn sweep(target: &SweepTarget, exclusions: &ExclusionSet) -> Result<SweepResult> {
    Sweeper::new(exclusions).sweep(target)
}

/// Walks sweep targets and applies their policy.
pub struct Sweeper<'a, R: Remover = FsRemover> {
    exclusions: &'a ExclusionSet,
    remover: R,
    progress: Option<ProgressBar>,
}

impl<'a> Sweeper<'a, FsRemover> {
    pub fn new(exclusions: &'a ExclusionSet) -> Self {
        Self::with_remover(exclusions, FsRemover)
    }
}

impl<'a, R: Remover> Sweeper<'a, R> {
    pub fn with_remover(exclusions: &'a ExclusionSet, remover: R) -> Self {
        Self {
            exclusions,
            remover,
            progress: None,
        }
    }

    /// Tick this spinner once per visited entry.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }

    /// Run one sweep.
    ///
    /// Fails only for the root itself: `PathNotFound` when it does not
    /// exist, `PermissionDenied` when it cannot be listed. Problems with
    /// individual entries become warnings in the result.
    pub fn sweep(&mut self, target: &SweepTarget) -> Result<SweepResult> {
        let root = resolve_root(&target.root)?;
        tracing::debug!(root = %root.display(), mode = ?target.mode, dry_run = target.dry_run, "Sweeping");

        let result = match target.mode {
            SweepMode::Clean {
                scope: CleanScope::TopLevel,
            } => self.clean_top_level(&root, target),
            SweepMode::Clean {
                scope: CleanScope::Recursive,
            } => self.clean_recursive(&root, target),
            SweepMode::FindLarge { min_size } => self.find_large(&root, target, min_size),
            SweepMode::FindOld { days } => self.find_old(&root, target, days),
        };

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        tracing::info!(
            root = %root.display(),
            bytes = result.total_bytes,
            files = result.files_removed,
            dirs = result.dirs_removed,
            found = result.records.len(),
            warnings = result.warnings.len(),
            "Sweep finished"
        );

        Ok(result)
    }

    fn tick(&self, path: &Path) {
        if let Some(pb) = &self.progress {
            pb.set_message(path.display().to_string());
            pb.inc(1);
        }
    }

    fn clean_top_level(&mut self, root: &Path, target: &SweepTarget) -> SweepResult {
        let mut result = SweepResult::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    self.tick(entry.path());
                    self.remove_within(root, entry.path(), target.dry_run, &mut result);
                }
                Err(err) => warn_walk_error(&err, root, &mut result),
            }
        }

        result
    }

    fn clean_recursive(&mut self, root: &Path, target: &SweepTarget) -> SweepResult {
        let mut result = SweepResult::new();

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn_walk_error(&err, root, &mut result);
                    continue;
                }
            };
            self.tick(entry.path());

            if entry.file_type().is_dir() {
                if self.exclusions.is_under_protected_prefix(entry.path()) {
                    result.excluded += 1;
                    walker.skip_current_dir();
                }
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if target.accepts_name(&name) {
                self.remove_within(root, entry.path(), target.dry_run, &mut result);
            }
        }

        result
    }

    fn find_large(&mut self, root: &Path, target: &SweepTarget, min_size: u64) -> SweepResult {
        let mut result = SweepResult::new();
        let mut kept: BinaryHeap<SmallestOnTop> = BinaryHeap::new();

        self.walk_files(root, &mut result, |record, result| {
            if record.size < min_size {
                return true;
            }
            result.matched += 1;
            kept.push(SmallestOnTop(record));
            if target.limit_reached(kept.len() - 1) {
                kept.pop();
            }
            true
        });

        result.records = kept.into_iter().map(|k| k.0).collect();
        result.finish_find(RecordOrder::LargestFirst, target.limit);
        result
    }

    fn find_old(&mut self, root: &Path, target: &SweepTarget, days: u64) -> SweepResult {
        let mut result = SweepResult::new();
        let threshold = days_to_duration(days);
        let now = SystemTime::now();

        self.walk_files(root, &mut result, |record, result| {
            let age = record
                .mtime
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();
            if record.mtime.is_none() || age < threshold {
                return true;
            }
            result.matched += 1;
            result.records.push(record);
            !target.limit_reached(result.records.len())
        });

        result.finish_find(RecordOrder::OldestFirst, target.limit);
        result
    }

    /// Visit every regular file under `root` for find-mode, pruning
    /// protected trees and skipped directory names. `visit` returns false
    /// to stop the walk.
    fn walk_files<F>(&self, root: &Path, result: &mut SweepResult, mut visit: F)
    where
        F: FnMut(SweepRecord, &mut SweepResult) -> bool,
    {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn_walk_error(&err, root, result);
                    continue;
                }
            };
            self.tick(entry.path());

            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy();
                if ExclusionSet::skips_dir_name(&name)
                    || self.exclusions.is_under_protected_prefix(entry.path())
                {
                    result.excluded += 1;
                    walker.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    result.warn(entry.path(), err);
                    continue;
                }
            };

            let record = SweepRecord {
                path: entry.into_path(),
                size: metadata.len(),
                mtime: metadata.modified().ok(),
            };

            if !visit(record, result) {
                break;
            }
        }
    }

    /// Delete `path`, which must lie strictly inside `base`.
    ///
    /// Protected paths and anything outside `base` are counted as excluded
    /// and never reach the remover. A directory with a protected path below
    /// it is not removed whole; its other children are removed one by one.
    /// In dry-run mode the size is counted but nothing is deleted.
    pub fn remove_within(
        &mut self,
        base: &Path,
        path: &Path,
        dry_run: bool,
        result: &mut SweepResult,
    ) {
        if path == base || !path.starts_with(base) || self.exclusions.is_protected(path) {
            tracing::debug!(path = %path.display(), "Excluded from deletion");
            result.excluded += 1;
            return;
        }

        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
            Err(err) => {
                result.warn(path, err);
                return;
            }
        };

        if metadata.is_dir() && self.exclusions.contains_protected_under(path) {
            // Remove around the protected entry instead of through it
            tracing::debug!(path = %path.display(), "Descending around protected entry");
            self.remove_children(base, path, dry_run, result);
            return;
        }

        if metadata.is_dir() {
            let size = dir_size(path);
            if dry_run {
                result.total_bytes += size;
                result.dirs_removed += 1;
                return;
            }

            match self.remover.remove_dir_all(path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), size, "Removed directory");
                    result.total_bytes += size;
                    result.dirs_removed += 1;
                }
                Err(err) => {
                    // Whatever did get removed still counts
                    let remaining = if path.exists() { dir_size(path) } else { 0 };
                    result.total_bytes += size.saturating_sub(remaining);
                    result.warn(path, err);
                }
            }
        } else {
            let size = metadata.len();
            if dry_run {
                result.total_bytes += size;
                result.files_removed += 1;
                return;
            }

            match self.remover.remove_file(path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), size, "Removed file");
                    result.total_bytes += size;
                    result.files_removed += 1;
                }
                Err(err) => result.warn(path, err),
            }
        }
    }

    /// Run `remove_within` on each child of `dir`, leaving `dir` itself.
    fn remove_children(
        &mut self,
        base: &Path,
        dir: &Path,
        dry_run: bool,
        result: &mut SweepResult,
    ) {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                result.warn(dir, err);
                return;
            }
        };

        let mut children: Vec<PathBuf> = read_dir.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        children.sort();

        for child in children {
            self.remove_within(base, &child, dry_run, result);
        }
    }
}

/// Canonicalize the root and make sure it can be listed.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let resolved = root
        .canonicalize()
        .map_err(|e| SweeperError::from_io(root, e))?;

    let metadata = fs::metadata(&resolved).map_err(|e| SweeperError::from_io(&resolved, e))?;
    if !metadata.is_dir() {
        return Err(SweeperError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    fs::read_dir(&resolved).map_err(|e| SweeperError::from_io(&resolved, e))?;

    Ok(resolved)
}

fn warn_walk_error(err: &walkdir::Error, root: &Path, result: &mut SweepResult) {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.io_error() {
        Some(io) => result.warn(path, io),
        None => result.warn(path, err),
    }
}
