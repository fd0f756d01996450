use crate::error::CommandError;

use super::command::run;
use super::user::is_root;

/// Ask the kernel to drop purgeable memory (`purge`).
pub fn free_memory() -> Result<(), CommandError> {
    run("purge", &[]).map(drop)
}

/// Flush the DNS resolver cache.
///
/// `killall -HUP mDNSResponder` needs root, so this refuses to run half of
/// the flush without it.
pub fn flush_dns() -> Result<(), CommandError> {
    if !is_root() {
        return Err(CommandError::RequiresRoot {
            operation: "Flushing the DNS cache".to_string(),
        });
    }

    run("dscacheutil", &["-flushcache"])?;
    run("killall", &["-HUP", "mDNSResponder"])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_dns_requires_root() {
        if !is_root() {
            assert!(matches!(
                flush_dns(),
                Err(CommandError::RequiresRoot { .. })
            ));
        }
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_maintenance_commands_fail_off_macos() {
        assert!(free_memory().is_err());
        assert!(flush_dns().is_err());
    }
}
