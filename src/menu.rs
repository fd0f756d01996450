//! Interactive numbered menu, shown when no operation flag is given.

use std::io::{BufRead, Write};

use crate::commands::{self, Operation, Session};
use crate::error::Result;
use crate::sweep::{megabytes, parse_min_size};

const ENTRIES: &[(&str, &str)] = &[
    ("1", "Clean system caches"),
    ("2", "Empty trash"),
    ("3", "Clean log files"),
    ("4", "Find large files"),
    ("5", "Find old files"),
    ("6", "Free up RAM"),
    ("7", "Flush DNS cache"),
    ("8", "Show disk usage"),
    ("9", "Run all cleaners"),
    ("10", "Find app leftovers"),
    ("0", "Exit"),
];

/// The menu text, without surrounding blank lines.
pub fn render_menu() -> String {
    let mut menu = String::from("=== mac-sweeper ===");
    for (key, label) in ENTRIES {
        let key = format!("{}.", key);
        menu.push_str(&format!("\n{:<4}{}", key, label));
    }
    menu
}

/// Show the menu until the user picks Exit or input ends.
pub fn run<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    loop {
        writeln!(session.output, "\n{}", render_menu())?;

        let Some(choice) = session.prompt("\nSelect an option: ")? else {
            writeln!(session.output)?;
            break;
        };
        if choice == "0" {
            break;
        }

        let op = match choose(session, &choice)? {
            Choice::Run(op) => op,
            Choice::Invalid => {
                writeln!(session.output, "Invalid option: '{}'", choice)?;
                continue;
            }
            Choice::Eof => break,
        };

        tracing::debug!(choice = %choice, operation = op.label(), "Menu selection");
        if let Err(err) = commands::execute(&op, session) {
            tracing::error!(operation = op.label(), %err, "Operation failed");
            writeln!(session.output, "[!] {} failed: {}", op.label(), err)?;
        }

        if session.prompt("\nPress Enter to continue...")?.is_none() {
            writeln!(session.output)?;
            break;
        }
    }

    writeln!(session.output, "Exiting")?;
    Ok(())
}

enum Choice {
    Run(Operation),
    Invalid,
    Eof,
}

fn choose<R: BufRead, W: Write>(session: &mut Session<R, W>, choice: &str) -> Result<Choice> {
    let op = match choice {
        "1" => Operation::CleanCaches,
        "2" => Operation::CleanTrash,
        "3" => Operation::CleanLogs,
        "4" => {
            let default = session.config.sweep.min_size_mb;
            let Some(answer) =
                session.prompt(&format!("Minimum size in MB [{}]: ", default))?
            else {
                return Ok(Choice::Eof);
            };
            Operation::FindLarge {
                min_size: parse_min_size(&answer).unwrap_or_else(|| megabytes(default)),
            }
        }
        "5" => {
            let default = session.config.sweep.old_days;
            let Some(answer) = session.prompt(&format!("Minimum age in days [{}]: ", default))?
            else {
                return Ok(Choice::Eof);
            };
            Operation::FindOld {
                days: answer.parse().unwrap_or(default),
            }
        }
        "6" => Operation::FreeRam,
        "7" => Operation::FlushDns,
        "8" => Operation::DiskUsage,
        "9" => Operation::All,
        "10" => {
            let Some(name) = session.prompt("App name: ")? else {
                return Ok(Choice::Eof);
            };
            Operation::AppLeftovers { name }
        }
        _ => return Ok(Choice::Invalid),
    };
    Ok(Choice::Run(op))
}
