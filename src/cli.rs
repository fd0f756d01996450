use clap::{Args, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::commands::{Operation, RunFlags};
use crate::config::Config;
use crate::sweep::parse_min_size;

/// mac-sweeper - A macOS disk cleanup and maintenance utility
///
/// Run without an operation flag to get the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "mac-sweeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write log records to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    #[command(flatten)]
    pub operations: OperationArgs,

    #[command(flatten)]
    pub options: SweepArgs,
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Operations")]
pub struct OperationArgs {
    /// Delete everything in ~/Library/Caches
    #[arg(long)]
    pub clean_caches: bool,

    /// Empty the trash (including per-volume trashes)
    #[arg(long)]
    pub clean_trash: bool,

    /// Delete log files under ~/Library/Logs
    #[arg(long)]
    pub clean_logs: bool,

    /// Run all cleaners, then show disk usage
    #[arg(long)]
    pub all: bool,

    /// Find large files
    #[arg(long)]
    pub find_large: bool,

    /// Find files not modified for a long time
    #[arg(long)]
    pub find_old: bool,

    /// Find (and optionally delete) files left behind by an uninstalled app
    #[arg(long, value_name = "NAME")]
    pub app_leftovers: Option<String>,

    /// Show disk usage of the home volume
    #[arg(long)]
    pub disk_usage: bool,

    /// Free purgeable memory
    #[arg(long)]
    pub free_ram: bool,

    /// Flush the DNS cache (needs sudo)
    #[arg(long)]
    pub flush_dns: bool,
}

#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// Minimum size for --find-large, in MB or with a unit (e.g. 1.5GB)
    #[arg(long, value_name = "N", requires = "find_large", value_parser = parse_min_size_arg)]
    pub min_size: Option<u64>,

    /// Minimum age in days for --find-old
    #[arg(long, value_name = "N", requires = "find_old")]
    pub days: Option<u64>,

    /// Directories searched by --find-large / --find-old (default: home)
    #[arg(long, value_name = "P", num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Maximum number of results to report (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Show what would be deleted without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Print find results as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_min_size_arg(s: &str) -> Result<u64, String> {
    parse_min_size(s).ok_or_else(|| format!("invalid size '{}'", s))
}

impl Cli {
    /// Requested operations in a fixed order. Empty means interactive mode.
    pub fn requested_operations(&self, config: &Config) -> Vec<Operation> {
        let ops = &self.operations;
        let mut requested = Vec::new();

        if ops.all {
            requested.push(Operation::All);
        } else {
            if ops.clean_caches {
                requested.push(Operation::CleanCaches);
            }
            if ops.clean_trash {
                requested.push(Operation::CleanTrash);
            }
            if ops.clean_logs {
                requested.push(Operation::CleanLogs);
            }
        }
        if ops.find_large {
            requested.push(Operation::FindLarge {
                min_size: self
                    .options
                    .min_size
                    .unwrap_or_else(|| crate::sweep::megabytes(config.sweep.min_size_mb)),
            });
        }
        if ops.find_old {
            requested.push(Operation::FindOld {
                days: self.options.days.unwrap_or(config.sweep.old_days),
            });
        }
        if let Some(name) = &ops.app_leftovers {
            requested.push(Operation::AppLeftovers { name: name.clone() });
        }
        if ops.disk_usage && !ops.all {
            requested.push(Operation::DiskUsage);
        }
        if ops.free_ram {
            requested.push(Operation::FreeRam);
        }
        if ops.flush_dns {
            requested.push(Operation::FlushDns);
        }

        requested
    }

    pub fn run_flags(&self, config: &Config) -> RunFlags {
        RunFlags {
            dry_run: self.options.dry_run,
            assume_yes: self.options.yes,
            json: self.options.json,
            quiet: self.quiet,
            limit: self.options.limit.unwrap_or(config.sweep.limit),
            paths: self.options.paths.clone(),
        }
    }
}
