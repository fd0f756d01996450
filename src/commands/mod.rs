//! Operation drivers shared by the flag-driven and interactive front ends.

pub mod clean;
pub mod find;
pub mod leftovers;
pub mod maintenance;

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::Result;
use crate::sweep::ExclusionSet;

/// One user-visible operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CleanCaches,
    CleanTrash,
    CleanLogs,
    /// Caches, trash and logs, then disk usage
    All,
    FindLarge { min_size: u64 },
    FindOld { days: u64 },
    AppLeftovers { name: String },
    DiskUsage,
    FreeRam,
    FlushDns,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::CleanCaches => "Clean caches",
            Operation::CleanTrash => "Empty trash",
            Operation::CleanLogs => "Clean logs",
            Operation::All => "Run all cleaners",
            Operation::FindLarge { .. } => "Find large files",
            Operation::FindOld { .. } => "Find old files",
            Operation::AppLeftovers { .. } => "Find app leftovers",
            Operation::DiskUsage => "Disk usage",
            Operation::FreeRam => "Free RAM",
            Operation::FlushDns => "Flush DNS cache",
        }
    }

    /// Operations that delete without listing candidates first.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Operation::CleanCaches | Operation::CleanTrash | Operation::CleanLogs | Operation::All
        )
    }
}

/// Per-invocation flags shared by every operation.
#[derive(Debug, Clone, Default)]
pub struct RunFlags {
    pub dry_run: bool,
    pub assume_yes: bool,
    pub json: bool,
    pub quiet: bool,
    /// Maximum find results (0 = unlimited)
    pub limit: usize,
    /// Roots for find operations (empty = home)
    pub paths: Vec<PathBuf>,
}

/// Everything an operation needs: settings plus the console it talks to.
pub struct Session<R, W> {
    pub config: Config,
    pub home: PathBuf,
    pub exclusions: ExclusionSet,
    pub flags: RunFlags,
    pub input: R,
    pub output: W,
    /// Bytes freed by clean operations so far
    pub cleaned_total: u64,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        config: Config,
        home: PathBuf,
        flags: RunFlags,
        input: R,
        output: W,
    ) -> Self {
        let exclusions =
            ExclusionSet::new(&home).with_extra_prefixes(config.sweep.extra_exclusions.clone());
        Self {
            config,
            home,
            exclusions,
            flags,
            input,
            output,
            cleaned_total: 0,
        }
    }

    /// Print `question` and read one line. `None` on end of input.
    pub fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question, defaulting to no. `--yes` and `--dry-run`
    /// answer yes without asking.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.flags.assume_yes || self.flags.dry_run {
            return Ok(true);
        }
        let answer = self.prompt(&format!("{} [y/N] ", question))?;
        Ok(answer.is_some_and(|a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")))
    }

    /// A spinner on stderr, hidden when it would clutter piped or quiet output.
    pub fn spinner(&self) -> ProgressBar {
        if self.flags.quiet || self.flags.json || !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} entries  {wide_msg}")
        {
            pb.set_style(style);
        }
        pb
    }
}

/// Run one operation.
pub fn execute<R: BufRead, W: Write>(op: &Operation, session: &mut Session<R, W>) -> Result<()> {
    tracing::info!(operation = op.label(), "Starting");

    if op.is_destructive() && !session.confirm(&format!("{}\nProceed?", op.label()))? {
        writeln!(session.output, "Aborted.")?;
        return Ok(());
    }

    match op {
        Operation::CleanCaches => clean::caches(session).map(drop),
        Operation::CleanTrash => clean::trash(session).map(drop),
        Operation::CleanLogs => clean::logs(session).map(drop),
        Operation::All => clean::all(session).map(drop),
        Operation::FindLarge { min_size } => find::large(session, *min_size).map(drop),
        Operation::FindOld { days } => find::old(session, *days).map(drop),
        Operation::AppLeftovers { name } => leftovers::run(session, name).map(drop),
        Operation::DiskUsage => maintenance::disk_usage(session),
        Operation::FreeRam => maintenance::free_ram(session),
        Operation::FlushDns => maintenance::flush_dns(session),
    }
}

/// Run operations in order, reporting failures without stopping.
/// Returns the number of operations that failed.
pub fn execute_all<R: BufRead, W: Write>(
    ops: &[Operation],
    session: &mut Session<R, W>,
) -> Result<usize> {
    let mut failures = 0;

    for op in ops {
        if let Err(err) = execute(op, session) {
            tracing::error!(operation = op.label(), %err, "Operation failed");
            writeln!(session.output, "[!] {} failed: {}", op.label(), err)?;
            failures += 1;
        }
    }

    Ok(failures)
}


#[cfg(test)]
mod tests {
    use super::test_support::{output, session};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(tmp.path(), RunFlags::default(), "  42 \n");

        assert_eq!(s.prompt("Size? ").unwrap(), Some("42".to_string()));
        assert_eq!(s.prompt("Again? ").unwrap(), None);
        assert!(output(&s).contains("Size? "));
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(tmp.path(), RunFlags::default(), "\ny\n");

        assert!(!s.confirm("Delete?").unwrap());
        assert!(s.confirm("Delete?").unwrap());
        assert!(!s.confirm("Delete?").unwrap());
    }

    #[test]
    fn test_confirm_skipped_with_yes() {
        let tmp = TempDir::new().unwrap();
        let flags = RunFlags {
            assume_yes: true,
            ..Default::default()
        };
        let mut s = session(tmp.path(), flags, "");
        assert!(s.confirm("Delete?").unwrap());
        assert!(output(&s).is_empty());
    }

    #[test]
    fn test_declined_clean_deletes_nothing() {
        let tmp = TempDir::new().unwrap();
        let caches = tmp.path().join("Library/Caches/com.app");
        fs::create_dir_all(&caches).unwrap();
        fs::write(caches.join("blob"), "data").unwrap();

        let mut s = session(tmp.path(), RunFlags::default(), "n\n");
        execute(&Operation::CleanCaches, &mut s).unwrap();

        assert!(caches.join("blob").exists());
        let out = output(&s);
        assert!(out.contains("Clean caches\nProceed? [y/N] "));
        assert!(out.contains("Aborted."));
    }

    #[test]
    fn test_execute_all_counts_failures() {
        let tmp = TempDir::new().unwrap();
        let flags = RunFlags {
            paths: vec![tmp.path().join("missing")],
            ..Default::default()
        };
        let mut s = session(tmp.path(), flags, "");

        let failures = execute_all(
            &[Operation::FindLarge { min_size: 0 }, Operation::DiskUsage],
            &mut s,
        )
        .unwrap();

        assert_eq!(failures, 1);
        let out = output(&s);
        assert!(out.contains("Find large files failed"));
        assert!(out.contains("Total:"));
    }

    #[test]
    fn test_destructive_operations() {
        assert!(Operation::All.is_destructive());
        assert!(Operation::CleanTrash.is_destructive());
        assert!(!Operation::FindOld { days: 1 }.is_destructive());
        assert!(!Operation::AppLeftovers { name: "x".into() }.is_destructive());
    }
}
