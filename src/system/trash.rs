use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CommandError;

use super::command::run;
use super::user::sudo_user;

/// AppleScript that empties every trash through Finder, which is allowed
/// to touch ~/.Trash even when this process is not.
pub const FINDER_EMPTY_TRASH: &str = r#"tell application "Finder" to empty trash"#;

/// Where external volumes are mounted.
pub const VOLUMES_ROOT: &str = "/Volumes";

pub fn empty_with_finder() -> Result<(), CommandError> {
    run("osascript", &["-e", FINDER_EMPTY_TRASH]).map(drop)
}

/// Empty `trash` as the user who invoked `sudo`.
pub fn empty_as_invoking_user(trash: &Path) -> Result<(), CommandError> {
    let user = sudo_user().ok_or_else(|| CommandError::RequiresRoot {
        operation: "Emptying the trash as the invoking user".to_string(),
    })?;
    let trash = trash.to_string_lossy();

    run(
        "sudo",
        &[
            "-u",
            &user,
            "find",
            &trash,
            "-mindepth",
            "1",
            "-maxdepth",
            "1",
            "-delete",
        ],
    )
    .map(drop)
}

/// Per-volume trash directories for `uid` that exist under `volumes_root`:
/// `<volume>/.Trashes/<uid>` and `<volume>/.Trash`.
pub fn volume_trash_dirs(volumes_root: &Path, uid: u32) -> Vec<PathBuf> {
    let Ok(read_dir) = fs::read_dir(volumes_root) else {
        return Vec::new();
    };

    let mut volumes: Vec<PathBuf> = read_dir
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    volumes.sort();

    volumes
        .iter()
        .flat_map(|vol| [vol.join(".Trashes").join(uid.to_string()), vol.join(".Trash")])
        .filter(|p| p.is_dir())
        .collect()
}
