use std::path::{Path, PathBuf};
use std::time::Duration;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// How a clean sweep picks what to remove under its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanScope {
    /// Every direct child of the root is removed as one unit.
    TopLevel,
    /// Every file at any depth is considered on its own.
    Recursive,
}

/// What a sweep does with the entries it visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Remove every entry in scope (subject to the name filter).
    Clean { scope: CleanScope },
    /// Report files of at least `min_size` bytes.
    FindLarge { min_size: u64 },
    /// Report files not modified for at least `days` days.
    FindOld { days: u64 },
}

impl SweepMode {
    pub fn is_clean(&self) -> bool {
        matches!(self, SweepMode::Clean { .. })
    }
}

/// A root directory plus the policy applied to everything under it.
#[derive(Debug, Clone)]
pub struct SweepTarget {
    /// Directory to sweep
    pub root: PathBuf,

    pub mode: SweepMode,

    /// File name suffixes that qualify for recursive cleaning (empty = all)
    pub suffixes: Vec<String>,

    /// Maximum number of find results (0 = unlimited)
    pub limit: usize,

    /// Compute sizes but never delete
    pub dry_run: bool,
}

impl SweepTarget {
    fn new(root: &Path, mode: SweepMode) -> Self {
        Self {
            root: root.to_path_buf(),
            mode,
            suffixes: Vec::new(),
            limit: 0,
            dry_run: false,
        }
    }

    pub fn clean(root: impl AsRef<Path>, scope: CleanScope) -> Self {
        Self::new(root.as_ref(), SweepMode::Clean { scope })
    }

    pub fn find_large(root: impl AsRef<Path>, min_size: u64) -> Self {
        Self::new(root.as_ref(), SweepMode::FindLarge { min_size })
    }

    pub fn find_old(root: impl AsRef<Path>, days: u64) -> Self {
        Self::new(root.as_ref(), SweepMode::FindOld { days })
    }

    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// True if the file name passes the suffix filter.
    pub fn accepts_name(&self, name: &str) -> bool {
        self.suffixes.is_empty() || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// True once `count` results fill the limit.
    pub fn limit_reached(&self, count: usize) -> bool {
        self.limit > 0 && count >= self.limit
    }
}

/// Age threshold as a duration.
pub fn days_to_duration(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECS_PER_DAY))
}

/// Whole days contained in `age`.
pub fn duration_to_days(age: Duration) -> u64 {
    age.as_secs() / SECS_PER_DAY
}
