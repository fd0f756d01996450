//! The single place where the sweep engine touches the filesystem to delete.

use std::fs;
use std::io;
use std::path::Path;

/// Deletes filesystem entries on behalf of the sweep engine.
///
/// The engine only calls this after the exclusion and containment checks
/// pass, so an implementation can observe every delete that would happen.
pub trait Remover {
    /// Remove a file or symbolic link (never its target).
    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything below it.
    fn remove_dir_all(&mut self, path: &Path) -> io::Result<()>;
}

/// Remover backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
