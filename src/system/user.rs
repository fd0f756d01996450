use std::env;
use std::path::PathBuf;

use nix::unistd::{geteuid, getuid, User};

/// The user who invoked `sudo`, when running as root under it.
pub fn sudo_user() -> Option<String> {
    if !geteuid().is_root() {
        return None;
    }
    env::var("SUDO_USER").ok().filter(|u| !u.is_empty())
}

pub fn is_root() -> bool {
    geteuid().is_root()
}

fn lookup(name: &str) -> Option<User> {
    match User::from_name(name) {
        Ok(user) => user,
        Err(err) => {
            tracing::debug!(user = name, %err, "User lookup failed");
            None
        }
    }
}

/// Home directory of the invoking user, preferring `$SUDO_USER`'s home so
/// that `sudo mac-sweeper` cleans the caller's files rather than root's.
pub fn home_dir() -> Option<PathBuf> {
    if let Some(user) = sudo_user().as_deref().and_then(lookup) {
        return Some(user.dir);
    }
    dirs::home_dir()
}

/// Uid whose per-volume trash (`/Volumes/*/.Trashes/<uid>`) belongs to us.
pub fn trash_uid() -> u32 {
    sudo_user()
        .as_deref()
        .and_then(lookup)
        .map(|u| u.uid.as_raw())
        .unwrap_or_else(|| getuid().as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_dir_resolves() {
        assert!(home_dir().is_some());
    }

    #[test]
    fn test_trash_uid_matches_real_uid_without_sudo() {
        if sudo_user().is_none() {
            assert_eq!(trash_uid(), getuid().as_raw());
        }
    }

    #[test]
    fn test_sudo_user_requires_root() {
        if !is_root() {
            assert!(sudo_user().is_none());
        }
    }
}
