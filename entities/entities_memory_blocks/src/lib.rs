//! Entities Layer: Memory Blocks
//!
//! Provides the memory block entities of the partition simulator.
//!
//! ## Overview
//!
//! The `entities_memory_blocks` crate is the innermost layer of the simulator.
//! It knows nothing about allocation policies; it only models the values the
//! policies work on:
//!
//! - **[`block`](block/index.html)**: `Block`, an inclusive interval that is
//!   either free or owned by a `ProcessId`
//!
//! - **[`block_list`](block_list/index.html)**: `BlockList`, an index-linked
//!   list of blocks with the four insertion disciplines (`InsertionPolicy`),
//!   handle-based removal (`NodeId`) and adjacent coalescing
//!
//! ## See Also
//!
//! - [`usecases_memory_management`](../../usecases/usecases_memory_management/index.html):
//!   allocation, deallocation and coalescing over these lists

pub mod block;
pub mod block_list;

pub use block::{Block, ProcessId};
pub use block_list::{BlockList, InsertionPolicy, NodeId};
