//! Filesystem sweep engine.
//!
//! A sweep walks one root directory under a [`SweepTarget`] policy and
//! either reports matching files (find-mode) or removes them (clean-mode),
//! never deleting anything covered by the [`ExclusionSet`].

mod engine;
mod exclusion;
mod record;
mod remover;
mod size;
mod target;

pub use engine::{sweep, Sweeper};
pub use exclusion::{
    ExclusionSet, PROTECTED_HOME_DIRS, PROTECTED_PATHS, PROTECTED_PREFIXES, SKIPPED_DIR_NAMES,
};
pub use record::{RecordOrder, SweepRecord, SweepResult, SweepWarning};
pub use remover::{FsRemover, Remover};
pub use size::{dir_size, format_size, megabytes, parse_min_size, parse_size};
pub use target::{days_to_duration, duration_to_days, CleanScope, SweepMode, SweepTarget};
