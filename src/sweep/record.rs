use serde::Serialize;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::SystemTime;

/// A file reported by a find sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepRecord {
    /// Full path to the file
    pub path: PathBuf,

    /// Apparent size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: Option<SystemTime>,
}

/// An entry that was skipped because it could not be read or removed.
#[derive(Debug, Clone, Serialize)]
pub struct SweepWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Order applied to find results before they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    LargestFirst,
    OldestFirst,
}

/// Outcome of one or more sweeps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepResult {
    /// Bytes freed (clean) or found (find)
    pub total_bytes: u64,

    pub files_removed: u64,

    pub dirs_removed: u64,

    /// Entries left alone because they are protected
    pub excluded: u64,

    /// Entries that matched a find policy, including any cut by the limit
    pub matched: u64,

    pub records: Vec<SweepRecord>,

    pub warnings: Vec<SweepWarning>,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped entry and log it.
    pub fn warn(&mut self, path: impl Into<PathBuf>, message: impl ToString) {
        let path = path.into();
        let message = message.to_string();
        tracing::warn!(path = %path.display(), "Skipped: {}", message);
        self.warnings.push(SweepWarning { path, message });
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: SweepResult) {
        self.total_bytes += other.total_bytes;
        self.files_removed += other.files_removed;
        self.dirs_removed += other.dirs_removed;
        self.excluded += other.excluded;
        self.matched += other.matched;
        self.records.extend(other.records);
        self.warnings.extend(other.warnings);
    }

    /// Sort records, keep at most `limit` (0 = all) and recompute the byte total.
    pub fn finish_find(&mut self, order: RecordOrder, limit: usize) {
        match order {
            RecordOrder::LargestFirst => self
                .records
                .sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path))),
            // Unknown mtimes sort last
            RecordOrder::OldestFirst => self
                .records
                .sort_by_key(|r| (r.mtime.is_none(), r.mtime, r.path.clone())),
        }

        if limit > 0 {
            self.records.truncate(limit);
        }
        self.total_bytes = self.records.iter().map(|r| r.size).sum();
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Heap wrapper that puts the smallest record on top of a max-heap, so a
/// bounded `BinaryHeap` keeps the N largest.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SmallestOnTop(pub SweepRecord);

impl Ord for SmallestOnTop {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .size
            .cmp(&self.0.size)
            .then_with(|| self.0.path.cmp(&other.0.path))
    }
}

impl PartialOrd for SmallestOnTop {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
