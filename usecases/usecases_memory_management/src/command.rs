//! Simulation Commands
//!
//! A run is driven by a stream of commands, each encoded in the input as an
//! `(id, size)` pair of integers:
//!
//! - `id > 0`: allocate `size` units to process `id`
//! - `id < 0`: deallocate the memory of process `|id|` (size ignored)
//! - `id == COALESCE_SENTINEL`: coalesce the free list
//!
//! An id of 0 is rejected because 0 is the free tag.

use std::fmt;

use entities_memory_blocks::ProcessId;

/// Command id meaning "coalesce the free list"
pub const COALESCE_SENTINEL: i64 = -99999;

/// One step of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Allocate `size` units to `pid`
    Allocate { pid: ProcessId, size: usize },
    /// Release the memory held by `pid`
    Deallocate { pid: ProcessId },
    /// Sort and merge the free list
    Coalesce,
}

/// Errors decoding an `(id, size)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Process id 0 is reserved for free blocks
    #[error("process id 0 is reserved")]
    ReservedProcessId,
    /// The id does not fit a process id
    #[error("process id {id} is out of range")]
    ProcessIdOutOfRange { id: i64 },
    /// Allocation with a negative size
    #[error("negative allocation size {size} for pid {pid}")]
    NegativeSize { pid: ProcessId, size: i64 },
}

impl Command {
    /// Decode an `(id, size)` pair from the command stream
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ReservedProcessId` for id 0,
    /// `CommandError::ProcessIdOutOfRange` when `|id|` does not fit a
    /// process id and `CommandError::NegativeSize` for an allocation with a
    /// negative size.
    pub fn from_pair(id: i64, size: i64) -> Result<Self, CommandError> {
        if id == COALESCE_SENTINEL {
            return Ok(Command::Coalesce);
        }
        let pid = u32::try_from(id.unsigned_abs())
            .ok()
            .and_then(ProcessId::new);
        let pid = match pid {
            Some(pid) => pid,
            None if id == 0 => return Err(CommandError::ReservedProcessId),
            None => return Err(CommandError::ProcessIdOutOfRange { id }),
        };

        if id < 0 {
            return Ok(Command::Deallocate { pid });
        }
        let size = usize::try_from(size).map_err(|_| CommandError::NegativeSize { pid, size })?;
        Ok(Command::Allocate { pid, size })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Allocate { pid, size } => write!(f, "allocate {} units to pid {}", size, pid),
            Command::Deallocate { pid } => write!(f, "deallocate pid {}", pid),
            Command::Coalesce => f.write_str("coalesce"),
        }
    }
}
