//! Large and old file reports.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::{Result, SweeperError};
use crate::sweep::{
    duration_to_days, format_size, RecordOrder, SweepRecord, SweepResult, SweepTarget, Sweeper,
};

use super::Session;

/// One reported file, in the shape printed by `--json`.
#[derive(Debug, Serialize)]
struct FoundFile {
    path: PathBuf,
    size: u64,
    size_human: String,
    /// Seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_days: Option<u64>,
}

#[derive(Debug, Serialize)]
struct FindReport<'a> {
    kind: &'a str,
    roots: &'a [PathBuf],
    matched: u64,
    total_bytes: u64,
    files: Vec<FoundFile>,
    warnings: usize,
}

impl FoundFile {
    fn from_record(record: &SweepRecord, now: SystemTime) -> Self {
        Self {
            path: record.path.clone(),
            size: record.size,
            size_human: format_size(record.size),
            modified: record
                .mtime
                .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs()),
            age_days: record
                .mtime
                .and_then(|m| now.duration_since(m).ok())
                .map(duration_to_days),
        }
    }
}

/// Report files of at least `min_size` bytes, largest first.
pub fn large<R: BufRead, W: Write>(session: &mut Session<R, W>, min_size: u64) -> Result<u64> {
    if !session.flags.json {
        writeln!(
            session.output,
            "\n[*] Searching for files larger than {}...",
            format_size(min_size)
        )?;
    }

    let limit = session.flags.limit;
    let (result, first_error) = sweep_roots(session, |root| {
        SweepTarget::find_large(root, min_size).with_limit(limit)
    })?;

    report(session, "large", RecordOrder::LargestFirst, result, first_error)
}

/// Report files not modified for at least `days` days, oldest first.
pub fn old<R: BufRead, W: Write>(session: &mut Session<R, W>, days: u64) -> Result<u64> {
    if !session.flags.json {
        writeln!(
            session.output,
            "\n[*] Searching for files older than {} days...",
            days
        )?;
    }

    let limit = session.flags.limit;
    let (result, first_error) = sweep_roots(session, |root| {
        SweepTarget::find_old(root, days).with_limit(limit)
    })?;

    report(session, "old", RecordOrder::OldestFirst, result, first_error)
}

fn roots<R, W>(session: &Session<R, W>) -> Vec<PathBuf> {
    if session.flags.paths.is_empty() {
        vec![session.home.clone()]
    } else {
        session.flags.paths.clone()
    }
}

/// Sweep each root in turn. A root that cannot be swept is reported and the
/// rest still run; the first such error is handed back.
fn sweep_roots<R, W, F>(
    session: &mut Session<R, W>,
    make_target: F,
) -> Result<(SweepResult, Option<SweeperError>)>
where
    R: BufRead,
    W: Write,
    F: Fn(PathBuf) -> SweepTarget,
{
    let mut merged = SweepResult::new();
    let mut first_error = None;

    for root in roots(session) {
        let target = make_target(root.clone());
        let spinner = session.spinner();
        match Sweeper::new(&session.exclusions)
            .with_progress(spinner)
            .sweep(&target)
        {
            Ok(result) => merged.merge(result),
            Err(err) => {
                tracing::warn!(root = %root.display(), %err, "Cannot search root");
                if !session.flags.json {
                    writeln!(session.output, "[!] Skipping {}: {}", root.display(), err)?;
                }
                first_error.get_or_insert(err);
            }
        }
    }

    Ok((merged, first_error))
}

fn report<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    kind: &str,
    order: RecordOrder,
    mut result: SweepResult,
    first_error: Option<SweeperError>,
) -> Result<u64> {
    result.finish_find(order, session.flags.limit);
    let now = SystemTime::now();
    let files: Vec<FoundFile> = result
        .records
        .iter()
        .map(|r| FoundFile::from_record(r, now))
        .collect();

    if session.flags.json {
        let roots = roots(session);
        let report = FindReport {
            kind,
            roots: &roots,
            matched: result.matched,
            total_bytes: result.total_bytes,
            files,
            warnings: result.warnings.len(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SweeperError::Other(format!("Cannot encode report: {}", e)))?;
        writeln!(session.output, "{}", json)?;
    } else {
        print_text(session, kind, &result, &files)?;
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(result.total_bytes),
    }
}

fn print_text<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    kind: &str,
    result: &SweepResult,
    files: &[FoundFile],
) -> Result<()> {
    let out = &mut session.output;

    if files.is_empty() {
        writeln!(out, "No {} files found", kind)?;
    } else {
        writeln!(out, "Found {} {} files:", files.len(), kind)?;
        for (i, file) in files.iter().enumerate() {
            match file.age_days {
                Some(days) if kind == "old" => writeln!(
                    out,
                    "{:>3}. {} ({}, {} days ago)",
                    i + 1,
                    file.path.display(),
                    file.size_human,
                    days
                )?,
                _ => writeln!(out, "{:>3}. {} ({})", i + 1, file.path.display(), file.size_human)?,
            }
        }
        writeln!(out, "Total: {}", format_size(result.total_bytes))?;
    }

    if result.matched > files.len() as u64 {
        writeln!(
            out,
            "({} more matched; raise --limit to see them)",
            result.matched - files.len() as u64
        )?;
    }
    if result.has_warnings() {
        writeln!(out, "({} entries could not be read)", result.warnings.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{output, session};
    use super::super::RunFlags;
    use super::*;
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const MB: u64 = 1024 * 1024;

    fn sparse(path: &Path, len: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap().set_len(len).unwrap();
    }

    fn flags(paths: Vec<PathBuf>) -> RunFlags {
        RunFlags {
            paths,
            ..Default::default()
        }
    }

    #[test]
    fn test_large_reports_only_files_over_threshold() {
        let tmp = TempDir::new().unwrap();
        sparse(&tmp.path().join("small.bin"), 50 * MB);
        sparse(&tmp.path().join("nested/big.bin"), 150 * MB);

        let mut s = session(tmp.path(), flags(vec![tmp.path().to_path_buf()]), "");
        let total = large(&mut s, 100 * MB).unwrap();

        assert_eq!(total, 150 * MB);
        let out = output(&s);
        assert!(out.contains("Found 1 large files"));
        assert!(out.contains("big.bin"));
        assert!(!out.contains("small.bin"));
    }

    #[test]
    fn test_large_defaults_to_home() {
        let home = TempDir::new().unwrap();
        sparse(&home.path().join("Downloads/disk.img"), 2 * MB);
        sparse(&home.path().join("Library/Caches/huge.db"), 4 * MB);

        let mut s = session(home.path(), RunFlags::default(), "");
        large(&mut s, MB).unwrap();

        let out = output(&s);
        assert!(out.contains("disk.img"));
        // Library is never searched
        assert!(!out.contains("huge.db"));
    }

    #[test]
    fn test_large_respects_limit() {
        let tmp = TempDir::new().unwrap();
        for (name, size) in [("a", 3), ("b", 5), ("c", 4), ("d", 1)] {
            sparse(&tmp.path().join(name), size * MB);
        }
        let mut f = flags(vec![tmp.path().to_path_buf()]);
        f.limit = 2;

        let mut s = session(tmp.path(), f, "");
        let total = large(&mut s, MB).unwrap();

        assert_eq!(total, 9 * MB);
        let out = output(&s);
        let b = out.find("/b (").unwrap();
        let c = out.find("/c (").unwrap();
        assert!(b < c);
        assert!(!out.contains("/a ("));
    }

    #[test]
    fn test_large_json_output() {
        let tmp = TempDir::new().unwrap();
        sparse(&tmp.path().join("movie.mkv"), 3 * MB);
        let mut f = flags(vec![tmp.path().to_path_buf()]);
        f.json = true;

        let mut s = session(tmp.path(), f, "");
        large(&mut s, MB).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(&s)).unwrap();
        assert_eq!(value["kind"], "large");
        assert_eq!(value["files"][0]["size"], 3 * MB);
        assert!(value["files"][0]["path"]
            .as_str()
            .unwrap()
            .ends_with("movie.mkv"));
    }

    #[test]
    fn test_old_lists_oldest_first() {
        let tmp = TempDir::new().unwrap();
        let now = SystemTime::now();
        for (name, days) in [("recent.txt", 1u64), ("old.txt", 200), ("ancient.txt", 400)] {
            let path = tmp.path().join(name);
            fs::write(&path, "x").unwrap();
            File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(now - Duration::from_secs(days * 86_400))
                .unwrap();
        }

        let mut s = session(tmp.path(), flags(vec![tmp.path().to_path_buf()]), "");
        old(&mut s, 180).unwrap();

        let out = output(&s);
        assert!(out.contains("Found 2 old files"));
        assert!(!out.contains("recent.txt"));
        assert!(out.find("ancient.txt").unwrap() < out.find("old.txt (").unwrap());
        assert!(out.contains("400 days ago"));
    }

    #[test]
    fn test_missing_root_reported_other_roots_continue() {
        let tmp = TempDir::new().unwrap();
        sparse(&tmp.path().join("kept.bin"), 2 * MB);
        let missing = tmp.path().join("gone");

        let mut s = session(
            tmp.path(),
            flags(vec![missing.clone(), tmp.path().to_path_buf()]),
            "",
        );
        let err = large(&mut s, MB).unwrap_err();

        assert!(matches!(err, SweeperError::PathNotFound(_)));
        let out = output(&s);
        assert!(out.contains("Skipping"));
        assert!(out.contains("kept.bin"));
    }

    #[test]
    fn test_nothing_found() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(tmp.path(), flags(vec![tmp.path().to_path_buf()]), "");
        assert_eq!(large(&mut s, MB).unwrap(), 0);
        assert!(output(&s).contains("No large files found"));
    }
}
