//! Command File Module
//!
//! Reads the input of a simulation run.
//!
//! ## Format
//!
//! Whitespace-separated integers. The first one is the partition size; the
//! rest are read as `(id, size)` pairs:
//!
//! ```text
//! 100
//! 1 20
//! 2 30
//! -1 0
//! -99999 0
//! ```
//!
//! Reading stops quietly at the end of input, at the first token that is not
//! an integer, or at a trailing id with no size. Everything read up to that
//! point is kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use usecases_memory_management::{Command, CommandError};

/// Parsed command file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScript {
    partition_size: usize,
    commands: Vec<Command>,
}

impl CommandScript {
    pub fn new(partition_size: usize, commands: Vec<Command>) -> Self {
        Self {
            partition_size,
            commands,
        }
    }

    pub fn partition_size(&self) -> usize {
        self.partition_size
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Errors in the contents of a command file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The file does not start with an integer
    #[error("unable to read partition size")]
    MissingPartitionSize,
    /// The partition size is zero or negative
    #[error("invalid partition size {value}")]
    InvalidPartitionSize { value: i64 },
    /// A pair could not be turned into a command
    #[error("command {index}: {source}")]
    InvalidCommand {
        index: usize,
        #[source]
        source: CommandError,
    },
}

/// Errors loading a command file from disk
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Parse the text of a command file
///
/// # Errors
///
/// Returns `ParseError::MissingPartitionSize` when the first token is
/// missing or not an integer, `ParseError::InvalidPartitionSize` when it is
/// not positive, and `ParseError::InvalidCommand` when a pair cannot be
/// decoded (see `Command::from_pair`).
pub fn parse_command_script(input: &str) -> Result<CommandScript, ParseError> {
    let mut tokens = input.split_whitespace();

    let partition_size = tokens
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or(ParseError::MissingPartitionSize)?;
    let partition_size = usize::try_from(partition_size)
        .ok()
        .filter(|&size| size > 0)
        .ok_or(ParseError::InvalidPartitionSize {
            value: partition_size,
        })?;

    let mut next_int = || {
        let token = tokens.next()?;
        match token.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("stopped reading commands at {:?}", token);
                None
            }
        }
    };

    let mut commands = Vec::new();
    while let Some(id) = next_int() {
        let Some(size) = next_int() else {
            warn!("ignoring id {} without a size", id);
            break;
        };
        let command = Command::from_pair(id, size).map_err(|source| ParseError::InvalidCommand {
            index: commands.len(),
            source,
        })?;
        commands.push(command);
    }

    Ok(CommandScript::new(partition_size, commands))
}

/// Read and parse a command file
///
/// # Errors
///
/// Returns `ReadError::Io` if the file cannot be read and `ReadError::Parse`
/// if its contents are invalid.
pub fn read_command_script(path: impl AsRef<Path>) -> Result<CommandScript, ReadError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_command_script(&input).map_err(|source| ReadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
