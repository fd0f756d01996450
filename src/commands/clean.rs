//! Cache, log and trash cleaners.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SweeperError};
use crate::sweep::{format_size, CleanScope, SweepResult, SweepTarget, Sweeper};
use crate::system;

use super::{maintenance, Session};

/// Delete everything under ~/Library/Caches.
pub fn caches<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<u64> {
    let root = session.home.join("Library").join("Caches");
    writeln!(session.output, "\n[*] Cleaning system caches...")?;

    let freed = match run_clean(session, &root, CleanScope::TopLevel, Vec::new()) {
        Ok(result) => result.total_bytes,
        Err(SweeperError::PathNotFound(_)) => {
            writeln!(session.output, "  Nothing to clean: {} does not exist", root.display())?;
            0
        }
        Err(err) => return Err(err),
    };

    finish(session, "cache", freed)
}

/// Delete log files under ~/Library/Logs.
pub fn logs<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<u64> {
    let root = session.home.join("Library").join("Logs");
    let suffixes = session.config.sweep.log_suffixes.clone();
    writeln!(session.output, "\n[*] Cleaning log files...")?;

    let freed = match run_clean(session, &root, CleanScope::Recursive, suffixes) {
        Ok(result) => result.total_bytes,
        Err(SweeperError::PathNotFound(_)) => {
            writeln!(session.output, "  Nothing to clean: {} does not exist", root.display())?;
            0
        }
        Err(err) => return Err(err),
    };

    finish(session, "logs", freed)
}

/// Empty ~/.Trash and the per-volume trashes.
pub fn trash<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<u64> {
    let root = session.home.join(".Trash");
    writeln!(session.output, "\n[*] Emptying trash...")?;

    let mut freed = 0;
    let mut refused = None;

    match run_clean(session, &root, CleanScope::TopLevel, Vec::new()) {
        Ok(result) => freed += result.total_bytes,
        Err(SweeperError::PathNotFound(_)) => {
            writeln!(session.output, "  Trash is already empty")?;
        }
        Err(SweeperError::PermissionDenied(path)) => {
            if let Err(err) = fallback_empty(session, &path) {
                refused = Some(err);
            }
        }
        Err(err) => return Err(err),
    }

    if session.config.trash.volume_trashes {
        freed += volume_trashes(session, Path::new(system::VOLUMES_ROOT))?;
    }

    finish(session, "trash", freed)?;

    match refused {
        Some(err) => Err(err),
        None => Ok(freed),
    }
}

/// Caches, trash and logs, then disk usage and the grand total.
pub fn all<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<u64> {
    writeln!(session.output, "\n[*] Running all cleaners...")?;

    let mut failed = None;
    let mut freed = 0;

    for (label, cleaner) in [
        ("caches", caches as fn(&mut Session<R, W>) -> Result<u64>),
        ("trash", trash),
        ("logs", logs),
    ] {
        match cleaner(session) {
            Ok(bytes) => freed += bytes,
            Err(err) => {
                tracing::warn!(cleaner = label, %err, "Cleaner failed");
                writeln!(session.output, "[!] Cleaning {} failed: {}", label, err)?;
                failed.get_or_insert(err);
            }
        }
    }

    if let Err(err) = maintenance::disk_usage(session) {
        tracing::warn!(%err, "Disk usage unavailable");
        writeln!(session.output, "[!] Disk usage failed: {}", err)?;
        failed.get_or_insert(err);
    }

    writeln!(
        session.output,
        "\n[✓] Total space {}: {}",
        if session.flags.dry_run { "that would be cleaned" } else { "cleaned" },
        format_size(freed)
    )?;

    match failed {
        Some(err) => Err(err),
        None => Ok(freed),
    }
}

fn run_clean<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    root: &Path,
    scope: CleanScope,
    suffixes: Vec<String>,
) -> Result<SweepResult> {
    let target = SweepTarget::clean(root, scope)
        .with_suffixes(suffixes)
        .with_dry_run(session.flags.dry_run);

    let spinner = session.spinner();
    let result = Sweeper::new(&session.exclusions)
        .with_progress(spinner)
        .sweep(&target)?;

    print_clean_result(session, root, &result)?;
    Ok(result)
}

fn print_clean_result<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    root: &Path,
    result: &SweepResult,
) -> Result<()> {
    let verb = if session.flags.dry_run { "Would clean" } else { "Cleaned" };
    writeln!(
        session.output,
        "  {}: {} from {} ({} files, {} folders)",
        verb,
        format_size(result.total_bytes),
        root.display(),
        result.files_removed,
        result.dirs_removed
    )?;

    if result.excluded > 0 {
        writeln!(session.output, "  Protected: {} entries left alone", result.excluded)?;
    }
    if result.has_warnings() {
        writeln!(
            session.output,
            "  Skipped: {} entries could not be removed",
            result.warnings.len()
        )?;
    }
    Ok(())
}

fn finish<R: BufRead, W: Write>(session: &mut Session<R, W>, what: &str, freed: u64) -> Result<u64> {
    if !session.flags.dry_run {
        session.cleaned_total += freed;
    }
    tracing::info!(what, bytes = freed, dry_run = session.flags.dry_run, "Clean finished");
    writeln!(
        session.output,
        "[✓] Total {} {}: {}",
        what,
        if session.flags.dry_run { "to clean" } else { "cleaned" },
        format_size(freed)
    )?;
    Ok(freed)
}

/// ~/.Trash could not be listed (macOS privacy protection): let Finder
/// empty it, or failing that, the invoking user under sudo.
fn fallback_empty<R: BufRead, W: Write>(session: &mut Session<R, W>, trash: &Path) -> Result<()> {
    if session.flags.dry_run {
        writeln!(
            session.output,
            "  Cannot inspect {} (permission denied); nothing counted",
            trash.display()
        )?;
        return Ok(());
    }

    if !session.config.trash.finder_fallback {
        return Err(SweeperError::PermissionDenied(trash.to_path_buf()));
    }

    match system::empty_with_finder() {
        Ok(()) => {
            writeln!(session.output, "[✓] Trash emptied via Finder")?;
            return Ok(());
        }
        Err(err) => tracing::warn!(%err, "Finder fallback failed"),
    }

    if system::sudo_user().is_some() {
        match system::empty_as_invoking_user(trash) {
            Ok(()) => {
                writeln!(session.output, "[✓] Trash emptied via user context")?;
                return Ok(());
            }
            Err(err) => tracing::warn!(%err, "User-context fallback failed"),
        }
    }

    writeln!(
        session.output,
        "[!] Permission denied accessing trash at: {}",
        trash.display()
    )?;
    Err(SweeperError::PermissionDenied(trash.to_path_buf()))
}

/// Sweep `<volume>/.Trashes/<uid>` and `<volume>/.Trash` under `volumes_root`.
fn volume_trashes<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    volumes_root: &Path,
) -> Result<u64> {
    let dirs: Vec<PathBuf> = system::volume_trash_dirs(volumes_root, system::trash_uid());
    let mut freed = 0;
    let mut refused = false;

    for dir in dirs {
        match run_clean(session, &dir, CleanScope::TopLevel, Vec::new()) {
            Ok(result) => freed += result.total_bytes,
            Err(SweeperError::PermissionDenied(path)) => {
                tracing::warn!(path = %path.display(), "Volume trash not accessible");
                refused = true;
            }
            Err(err) => tracing::warn!(%err, "Volume trash skipped"),
        }
    }

    if refused && session.config.trash.finder_fallback && !session.flags.dry_run {
        // Finder empties every volume's trash at once
        if let Err(err) = system::empty_with_finder() {
            tracing::warn!(%err, "Finder fallback failed for volume trashes");
        }
    }

    Ok(freed)
}
