use std::path::{Path, PathBuf};

use nix::sys::statvfs::statvfs;

use crate::error::{Result, SweeperError};
use crate::sweep::format_size;

/// Disk usage of the filesystem holding a path
#[derive(Debug, Clone)]
pub struct DiskStatus {
    /// Path the numbers were taken for
    pub path: PathBuf,

    /// Total capacity in bytes
    pub total: u64,

    /// Used space in bytes
    pub used: u64,

    /// Space available to unprivileged users in bytes
    pub free: u64,

    /// Usage percentage (0.0 - 100.0)
    pub percent: f32,
}

impl DiskStatus {
    pub fn total_human(&self) -> String {
        format_size(self.total)
    }

    pub fn used_human(&self) -> String {
        format_size(self.used)
    }

    pub fn free_human(&self) -> String {
        format_size(self.free)
    }
}

/// Check disk usage for a specific path
pub fn disk_usage(path: &Path) -> Result<DiskStatus> {
    let stat = statvfs(path).map_err(|errno| SweeperError::from_io(path, errno.into()))?;

    let block_size = stat.fragment_size() as u64;
    let total = stat.blocks() as u64 * block_size;
    let available = stat.blocks_available() as u64 * block_size;
    let free_blocks = stat.blocks_free() as u64 * block_size;

    // Used = total - free (not available, as available excludes reserved blocks)
    let used = total.saturating_sub(free_blocks);

    // Percent is based on non-reserved space (what users can actually use)
    let usable_total = used + available;
    let percent = if usable_total > 0 {
        (used as f64 / usable_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    Ok(DiskStatus {
        path: path.to_path_buf(),
        total,
        used,
        free: available,
        percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_usage_root() {
        let status = disk_usage(Path::new("/")).unwrap();
        assert!(status.total > 0);
        assert!(status.used <= status.total);
        assert!((0.0..=100.0).contains(&status.percent));
    }

    #[test]
    fn test_disk_usage_missing_path() {
        let err = disk_usage(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SweeperError::PathNotFound(_)));
    }

    #[test]
    fn test_human_readable_fields() {
        let status = DiskStatus {
            path: PathBuf::from("/"),
            total: 2 << 30,
            used: 1 << 30,
            free: 1 << 30,
            percent: 50.0,
        };
        assert!(status.total_human().contains("GiB"));
        assert!(status.used_human().contains("GiB"));
        assert!(status.free_human().contains("GiB"));
    }
}
