//! Files left behind by uninstalled applications.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::{Result, SweeperError};
use crate::sweep::{dir_size, format_size, SweepResult, Sweeper};

use super::Session;

/// A file or directory whose name mentions the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leftover {
    /// Search path it was found under
    pub base: PathBuf,
    pub path: PathBuf,
    pub size: u64,
}

/// Walk `search_paths` for entries whose name contains `app_name`,
/// ignoring case. Matched directories are reported whole and not descended.
pub fn find_leftovers(app_name: &str, search_paths: &[PathBuf]) -> Vec<Leftover> {
    let needle = app_name.to_lowercase();
    let mut found = Vec::new();

    for base in search_paths {
        if !base.is_dir() {
            tracing::debug!(path = %base.display(), "Leftover search path missing");
            continue;
        }

        let mut walker = WalkDir::new(base)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(%err, "Unreadable entry while searching leftovers");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !name.contains(&needle) {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let size = if is_dir {
                walker.skip_current_dir();
                dir_size(entry.path())
            } else {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            };

            found.push(Leftover {
                base: base.clone(),
                path: entry.into_path(),
                size,
            });
        }
    }

    found
}

/// List leftovers of `name` and delete them once confirmed.
pub fn run<R: BufRead, W: Write>(session: &mut Session<R, W>, name: &str) -> Result<u64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SweeperError::Other("No app name given".to_string()));
    }

    writeln!(session.output, "\n[*] Scanning for leftovers of '{}'...", name)?;
    let search_paths = session.config.leftover_paths(&session.home);
    let leftovers = find_leftovers(name, &search_paths);

    if leftovers.is_empty() {
        writeln!(session.output, "No leftover files found")?;
        return Ok(0);
    }

    let total: u64 = leftovers.iter().map(|l| l.size).sum();
    writeln!(session.output, "Found {} leftover items:", leftovers.len())?;
    for item in &leftovers {
        writeln!(
            session.output,
            "  - {} ({})",
            item.path.display(),
            format_size(item.size)
        )?;
    }
    writeln!(session.output, "Total: {}", format_size(total))?;

    if !session.confirm("Delete all these files?")? {
        writeln!(session.output, "Aborted.")?;
        return Ok(0);
    }

    let result = delete(session, &leftovers);

    let verb = if session.flags.dry_run { "Would remove" } else { "Removed" };
    writeln!(
        session.output,
        "[✓] {} {} ({} files, {} folders)",
        verb,
        format_size(result.total_bytes),
        result.files_removed,
        result.dirs_removed
    )?;
    if result.excluded > 0 {
        writeln!(
            session.output,
            "  Protected: {} items left alone",
            result.excluded
        )?;
    }
    for warning in &result.warnings {
        writeln!(
            session.output,
            "  Error deleting {}: {}",
            warning.path.display(),
            warning.message
        )?;
    }

    if !session.flags.dry_run {
        session.cleaned_total += result.total_bytes;
    }
    Ok(result.total_bytes)
}

fn delete<R, W>(session: &Session<R, W>, leftovers: &[Leftover]) -> SweepResult {
    let mut result = SweepResult::new();
    let mut sweeper = Sweeper::new(&session.exclusions);

    for item in leftovers {
        sweeper.remove_within(&item.base, &item.path, session.flags.dry_run, &mut result);
    }

    result
}
