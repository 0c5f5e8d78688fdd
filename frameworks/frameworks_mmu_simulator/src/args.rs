//! Command-Line Argument Parsing Module
//!
//! Uses clap for type-safe argument parsing. Exactly one policy flag must be
//! given.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use log::LevelFilter;
use usecases_memory_management::AllocationPolicy;

/// mmu command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mmu")]
#[command(about = "Simulate first-fit, best-fit and worst-fit partition allocation")]
#[command(group(ArgGroup::new("policy").required(true).args(["fifo", "bestfit", "worstfit"])))]
pub struct MmuArgs {
    /// Command file: partition size followed by (id, size) pairs
    pub input: PathBuf,

    /// First-fit allocation
    #[arg(short = 'F', long, alias = "first-fit", short_alias = 'f')]
    pub fifo: bool,

    /// Best-fit allocation
    #[arg(short = 'B', long, alias = "best-fit", short_alias = 'b')]
    pub bestfit: bool,

    /// Worst-fit allocation
    #[arg(short = 'W', long, alias = "worst-fit", short_alias = 'w')]
    pub worstfit: bool,

    /// Check partition conservation after every command
    #[arg(long)]
    pub verify: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl MmuArgs {
    /// Policy selected by the flags
    pub fn policy(&self) -> AllocationPolicy {
        if self.bestfit {
            AllocationPolicy::BestFit
        } else if self.worstfit {
            AllocationPolicy::WorstFit
        } else {
            AllocationPolicy::FirstFit
        }
    }

    /// Log level for the `-v` count, starting at warn
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
