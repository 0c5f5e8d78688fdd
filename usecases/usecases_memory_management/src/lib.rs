//! Use Cases Layer: Memory Management
//!
//! Provides the allocation policies of the partition simulator and the three
//! operations that mutate a partition: allocate, deallocate and coalesce.
//!
//! ## Overview
//!
//! The `usecases_memory_management` crate holds the business logic of the
//! simulator. A partition is tracked as two `BlockList`s (free and
//! allocated). Every operation runs against an `AllocatorContext`, which
//! borrows both lists and carries the active `AllocationPolicy`.
//!
//! ## Allocation Strategies
//!
//! - **[`firstfit`](firstfit/index.html)**: First-fit - the first free block in
//!   list order that is large enough
//!
//! - **[`bestfit`](bestfit/index.html)**: Best-fit - the free block leaving the
//!   smallest leftover
//!
//! - **[`worstfit`](worstfit/index.html)**: Worst-fit - the free block leaving
//!   the largest leftover
//!
//! - **[`allocator`](allocator/index.html)**: Policy selection, the
//!   `PlacementStrategy` trait and the allocate/deallocate operations
//!
//! ## Other Modules
//!
//! - **[`coalesce`](coalesce/index.html)**: Address sort and merge of free blocks
//! - **[`partition`](partition/index.html)**: Owning partition state and
//!   conservation checks
//! - **[`command`](command/index.html)**: The command stream driving a run
//!
//! ## See Also
//!
//! - [`entities_memory_blocks`](../../entities/entities_memory_blocks/index.html): Blocks and block lists

pub mod allocator;
pub mod bestfit;
pub mod coalesce;
pub mod command;
pub mod firstfit;
pub mod partition;
pub mod worstfit;

pub use allocator::{AllocationError, AllocationPolicy, AllocatorContext, PlacementStrategy};
pub use coalesce::coalesce;
pub use command::{Command, CommandError, COALESCE_SENTINEL};
pub use partition::{verify_partition, Partition, PartitionError, PartitionViolation};
