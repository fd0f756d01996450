//! Thin wrappers around the OS: external maintenance utilities, disk
//! statistics and user lookups.

mod command;
mod disk;
mod maintenance;
mod trash;
mod user;

pub use command::run;
pub use disk::{disk_usage, DiskStatus};
pub use maintenance::{flush_dns, free_memory};
pub use trash::{
    empty_as_invoking_user, empty_with_finder, volume_trash_dirs, FINDER_EMPTY_TRASH,
    VOLUMES_ROOT,
};
pub use user::{home_dir, is_root, sudo_user, trash_uid};
