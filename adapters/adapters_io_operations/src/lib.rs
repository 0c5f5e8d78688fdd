//! Adapters Layer: I/O Operations
//!
//! Provides I/O adapter operations:
//! - Command file reading (partition size plus `(id, size)` pairs)
//! - Snapshot rendering of the free and allocated lists
//!
//! Depends on Entities and Use Cases layers.

pub mod command_file;
pub mod snapshot;

pub use command_file::{parse_command_script, read_command_script, CommandScript, ParseError, ReadError};
pub use snapshot::{write_block_list, write_command_banner, write_error, write_snapshot, BANNER};
