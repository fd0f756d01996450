use std::fs;
use std::path::{Path, PathBuf};

/// System trees that are never deleted from, at any depth.
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/System",
    "/Library",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/Applications",
];

/// Paths that are never deleted as a whole. Their contents may be.
pub const PROTECTED_PATHS: &[&str] = &[
    "/", "/Users", "/private", "/var", "/opt", "/Volumes", "/cores",
];

/// Home subdirectories that are never deleted as a whole ("" is home itself).
pub const PROTECTED_HOME_DIRS: &[&str] = &[
    "",
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Library",
    "Library/Caches",
    "Library/Logs",
    "Applications",
    ".Trash",
    ".ssh",
    ".gnupg",
];

/// Directory names find-mode never descends into.
pub const SKIPPED_DIR_NAMES: &[&str] = &["Library", "System", ".Trash"];

/// Paths that must never be handed to a delete operation.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    prefixes: Vec<PathBuf>,
    exact: Vec<PathBuf>,
}

impl ExclusionSet {
    /// The built-in set for the given home directory.
    pub fn new(home: &Path) -> Self {
        let prefixes = PROTECTED_PREFIXES.iter().map(PathBuf::from).collect();

        let mut exact: Vec<PathBuf> = PROTECTED_PATHS.iter().map(PathBuf::from).collect();
        exact.extend(PROTECTED_HOME_DIRS.iter().map(|d| {
            if d.is_empty() {
                home.to_path_buf()
            } else {
                home.join(d)
            }
        }));

        // Home may itself sit behind a symlink (/var -> /private/var etc.)
        if let Ok(resolved) = home.canonicalize() {
            if resolved != home {
                exact.extend(PROTECTED_HOME_DIRS.iter().map(|d| {
                    if d.is_empty() {
                        resolved.clone()
                    } else {
                        resolved.join(d)
                    }
                }));
            }
        }

        Self { prefixes, exact }
    }

    /// Add more prefixes (from configuration).
    pub fn with_extra_prefixes(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        for prefix in extra {
            if let Ok(resolved) = prefix.canonicalize() {
                if resolved != prefix {
                    self.prefixes.push(resolved);
                }
            }
            self.prefixes.push(prefix);
        }
        self
    }

    /// True if `path` is a protected tree or lies inside one.
    pub fn is_under_protected_prefix(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p))
    }

    /// True if `path` may not be deleted.
    ///
    /// Checks the path as given and, for symlinks, what it resolves to.
    pub fn is_protected(&self, path: &Path) -> bool {
        if self.matches(path) {
            return true;
        }

        let is_link = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            if let Ok(resolved) = path.canonicalize() {
                return self.matches(&resolved);
            }
        }

        false
    }

    /// True if some protected path lies strictly below `path`, so that
    /// removing `path` as a whole would take it along.
    pub fn contains_protected_under(&self, path: &Path) -> bool {
        if self.has_protected_below(path) {
            return true;
        }
        match path.canonicalize() {
            Ok(resolved) if resolved != path => self.has_protected_below(&resolved),
            _ => false,
        }
    }

    fn has_protected_below(&self, path: &Path) -> bool {
        self.prefixes
            .iter()
            .chain(self.exact.iter())
            .any(|p| p != path && p.starts_with(path))
    }

    fn matches(&self, path: &Path) -> bool {
        self.is_under_protected_prefix(path) || self.exact.iter().any(|p| p == path)
    }

    /// True if find-mode should not descend into a directory with this name.
    pub fn skips_dir_name(name: &str) -> bool {
        SKIPPED_DIR_NAMES.contains(&name)
    }
}
