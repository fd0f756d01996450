use std::io::{BufRead, Write};

use crate::error::Result;
use crate::system;

use super::Session;

/// Print total, used and free space of the volume holding home.
pub fn disk_usage<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let status = system::disk_usage(&session.home)?;
    tracing::debug!(path = %status.path.display(), percent = status.percent, "Disk usage");

    writeln!(session.output, "\n[*] Disk usage for {}", status.path.display())?;
    writeln!(session.output, "  Total: {}", status.total_human())?;
    writeln!(
        session.output,
        "  Used:  {} ({:.1}%)",
        status.used_human(),
        status.percent
    )?;
    writeln!(session.output, "  Free:  {}", status.free_human())?;
    Ok(())
}

pub fn free_ram<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    writeln!(session.output, "\n[*] Freeing up RAM...")?;
    system::free_memory()?;
    writeln!(session.output, "[✓] Inactive memory purged")?;
    Ok(())
}

pub fn flush_dns<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    writeln!(session.output, "\n[*] Flushing DNS cache...")?;
    system::flush_dns()?;
    writeln!(session.output, "[✓] DNS cache flushed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{output, session};
    use super::super::RunFlags;
    use super::*;
    use crate::error::{CommandError, SweeperError};
    use tempfile::TempDir;

    #[test]
    fn test_disk_usage_prints_summary() {
        let home = TempDir::new().unwrap();
        let mut s = session(home.path(), RunFlags::default(), "");

        disk_usage(&mut s).unwrap();

        let out = output(&s);
        assert!(out.contains("Total:"));
        assert!(out.contains("Used:"));
        assert!(out.contains("Free:"));
        assert!(out.contains('%'));
    }

    #[test]
    fn test_disk_usage_missing_home() {
        let home = TempDir::new().unwrap();
        let mut s = session(&home.path().join("nope"), RunFlags::default(), "");
        assert!(matches!(
            disk_usage(&mut s),
            Err(SweeperError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_flush_dns_without_root_is_command_error() {
        if system::is_root() {
            return;
        }
        let home = TempDir::new().unwrap();
        let mut s = session(home.path(), RunFlags::default(), "");

        let err = flush_dns(&mut s).unwrap_err();
        assert!(matches!(
            err,
            SweeperError::Command(CommandError::RequiresRoot { .. })
        ));
        assert!(err.to_string().contains("sudo"));
    }
}
