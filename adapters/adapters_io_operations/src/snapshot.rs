//! Snapshot Module
//!
//! Renders the trace of a simulation run: a banner naming each command, any
//! error the command produced, then both block lists.
//!
//! ```text
//! ************************
//! ALLOCATE: 20 FROM PID: 1
//! ************************
//! Free Memory:
//! Block 0:	 START: 20	 END: 99
//!
//! Allocated Memory:
//! Block 0:	 START: 0	 END: 19	 PID: 1
//!
//!
//! ```

use std::fmt::Display;
use std::io::{self, Write};

use entities_memory_blocks::BlockList;
use usecases_memory_management::Command;

/// Separator printed around every command header
pub const BANNER: &str = "************************";

/// Write the opening banner and header of `command`
pub fn write_command_banner(out: &mut impl Write, command: &Command) -> io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    match command {
        Command::Allocate { pid, size } => writeln!(out, "ALLOCATE: {} FROM PID: {}", size, pid),
        Command::Deallocate { pid } => writeln!(out, "DEALLOCATE MEM: PID {}", pid),
        Command::Coalesce => writeln!(out, "COALESCE/COMPACT"),
    }
}

/// Write a recoverable command error
pub fn write_error(out: &mut impl Write, error: &impl Display) -> io::Result<()> {
    writeln!(out, "Error: {}", error)
}

/// Write `list` under `title`, one numbered line per block
pub fn write_block_list(out: &mut impl Write, title: &str, list: &BlockList) -> io::Result<()> {
    writeln!(out, "{}:", title)?;
    for (i, block) in list.iter().enumerate() {
        write!(out, "Block {}:\t START: {}\t END: {}", i, block.start(), block.end())?;
        if let Some(pid) = block.owner() {
            write!(out, "\t PID: {}", pid)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write the closing banner followed by both lists
pub fn write_snapshot(
    out: &mut impl Write,
    free_list: &BlockList,
    allocated_list: &BlockList,
) -> io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    write_block_list(out, "Free Memory", free_list)?;
    write_block_list(out, "\nAllocated Memory", allocated_list)?;
    write!(out, "\n\n")
}
