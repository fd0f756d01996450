use humansize::{format_size as humanize, BINARY};
use std::path::Path;
use walkdir::WalkDir;

const MIB: u64 = 1024 * 1024;

/// Total apparent size of the regular files under `path`. Symlinks are not
/// followed; unreadable entries count as zero.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format size in human-readable binary units
pub fn format_size(bytes: u64) -> String {
    humanize(bytes, BINARY)
}

/// Megabytes (MiB) to bytes.
pub fn megabytes(mb: u64) -> u64 {
    mb.saturating_mul(MIB)
}

/// Parse a size string like "1GB" or "1.5 MiB" into bytes.
/// A bare number is taken as bytes.
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();

    const UNITS: &[(&str, u64)] = &[
        ("TIB", 1 << 40),
        ("GIB", 1 << 30),
        ("MIB", 1 << 20),
        ("KIB", 1 << 10),
        ("TB", 1 << 40),
        ("GB", 1 << 30),
        ("MB", 1 << 20),
        ("KB", 1 << 10),
        ("T", 1 << 40),
        ("G", 1 << 30),
        ("M", 1 << 20),
        ("K", 1 << 10),
        ("B", 1),
    ];

    let (num_str, unit) = UNITS
        .iter()
        .find_map(|(suffix, unit)| s.strip_suffix(suffix).map(|n| (n, *unit)))
        .unwrap_or((s.as_str(), 1));

    let n = num_str.trim().parse::<f64>().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some((n * unit as f64) as u64)
}

/// Parse the `--min-size` argument: a bare number is megabytes, anything
/// with a unit goes through [`parse_size`].
pub fn parse_min_size(s: &str) -> Option<u64> {
    match s.trim().parse::<u64>() {
        Ok(mb) => Some(megabytes(mb)),
        Err(_) => parse_size(s),
    }
}
