use std::io;
use std::process::{Command, Output};

use crate::error::CommandError;

/// Run an external program to completion, treating a non-zero exit as failure.
pub fn run(program: &str, args: &[&str]) -> Result<Output, CommandError> {
    tracing::debug!(program, ?args, "Running command");

    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CommandError::NotFound {
                program: program.to_string(),
            }
        } else {
            CommandError::Io {
                program: program.to_string(),
                source: e,
            }
        }
    })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(CommandError::Failed {
            program: program.to_string(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
