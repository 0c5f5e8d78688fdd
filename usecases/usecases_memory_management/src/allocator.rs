//! Allocator Policies and Operations
//!
//! Defines the allocation policies of the simulator and the operations that
//! move blocks between the free list and the allocated list.
//!
//! ## Overview
//!
//! Each policy is a `PlacementStrategy`. A strategy answers two questions:
//! which free block should serve a request, and in which order the free list
//! is kept. The second answer matters because every block that re-enters the
//! free list (a split remainder or a released block) must be inserted with
//! the same discipline, otherwise first-fit scans see a different "first".
//!
//! | Policy | Selection | Free list order |
//! |---|---|---|
//! | FirstFit | first block that fits | arrival (back insert) |
//! | BestFit | smallest leftover, earliest on ties | ascending size |
//! | WorstFit | largest leftover, earliest on ties | descending size |
//!
//! The allocated list is always kept in ascending address order.
//!
//! ## Examples
//!
//! ```rust
//! use entities_memory_blocks::{Block, BlockList, ProcessId};
//! use usecases_memory_management::{AllocationPolicy, AllocatorContext};
//!
//! let mut free_list = BlockList::new();
//! free_list.push_back(Block::free(0, 99).unwrap());
//! let mut allocated = BlockList::new();
//!
//! let pid = ProcessId::new(1).unwrap();
//! let mut ctx = AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::BestFit);
//! ctx.allocate(pid, 30).unwrap();
//! ctx.deallocate(pid).unwrap();
//! ```
//!
//! ## See Also
//!
//! - [`firstfit`](super::firstfit/index.html): First-fit selection
//! - [`bestfit`](super::bestfit/index.html): Best-fit selection
//! - [`worstfit`](super::worstfit/index.html): Worst-fit selection
//! - [`coalesce`](super::coalesce/index.html): Free list compaction

use std::fmt;

use entities_memory_blocks::{Block, BlockList, InsertionPolicy, NodeId, ProcessId};
use log::{debug, trace};

use crate::bestfit::BestFit;
use crate::coalesce::coalesce;
use crate::command::Command;
use crate::firstfit::FirstFit;
use crate::worstfit::WorstFit;

/// Allocation policy of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationPolicy {
    /// First-fit (FIFO placement order)
    FirstFit,
    /// Best-fit allocation strategy
    BestFit,
    /// Worst-fit allocation strategy
    WorstFit,
}

impl AllocationPolicy {
    /// Strategy implementing this policy
    pub fn strategy(self) -> &'static dyn PlacementStrategy {
        match self {
            AllocationPolicy::FirstFit => &FirstFit,
            AllocationPolicy::BestFit => &BestFit,
            AllocationPolicy::WorstFit => &WorstFit,
        }
    }

    /// Discipline used for every insert into the free list
    pub fn free_list_order(self) -> InsertionPolicy {
        self.strategy().free_list_order()
    }

    /// Short lowercase name, e.g. `best-fit`
    pub fn name(self) -> &'static str {
        match self {
            AllocationPolicy::FirstFit => "first-fit",
            AllocationPolicy::BestFit => "best-fit",
            AllocationPolicy::WorstFit => "worst-fit",
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement strategy trait for the different allocation policies
///
/// Implementations only choose; moving blocks is done by
/// `AllocatorContext`, so every strategy gets the same split and
/// reinsertion behaviour.
pub trait PlacementStrategy {
    /// Choose the free block that should serve a request of `requested_size`
    ///
    /// Returns `None` when no block in `free_list` is large enough.
    fn select(&self, free_list: &BlockList, requested_size: usize) -> Option<NodeId>;

    /// Discipline that keeps the free list in this strategy's order
    fn free_list_order(&self) -> InsertionPolicy;
}

/// Recoverable allocation errors
///
/// Both leave the free list and the allocated list exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// No free block is large enough
    #[error("Memory Allocation {requested_size} blocks")]
    AllocationFailed { requested_size: usize },
    /// No allocated block is owned by the process
    #[error("Can't locate Memory Used by PID: {process_id}")]
    NotFound { process_id: ProcessId },
}

/// Both lists of a partition plus the active policy
///
/// The context borrows the lists for the duration of one or more operations;
/// nothing else can observe them while a block is in transit between them.
pub struct AllocatorContext<'a> {
    free_list: &'a mut BlockList,
    allocated_list: &'a mut BlockList,
    policy: AllocationPolicy,
}

impl<'a> AllocatorContext<'a> {
    pub fn new(
        free_list: &'a mut BlockList,
        allocated_list: &'a mut BlockList,
        policy: AllocationPolicy,
    ) -> Self {
        Self {
            free_list,
            allocated_list,
            policy,
        }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn free_list(&self) -> &BlockList {
        &*self.free_list
    }

    pub fn allocated_list(&self) -> &BlockList {
        &*self.allocated_list
    }

    /// Allocate `requested_size` units to `pid`
    ///
    /// The block chosen by the policy is detached from the free list, trimmed
    /// to the requested size, handed to `pid` and inserted into the allocated
    /// list by address. Any remainder goes back to the free list as a new
    /// free block, inserted in the policy's free list order.
    ///
    /// # Returns
    /// A copy of the allocated block.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::AllocationFailed` if no free block is large
    /// enough or `requested_size` is 0.
    pub fn allocate(&mut self, pid: ProcessId, requested_size: usize) -> Result<Block, AllocationError> {
        let failed = AllocationError::AllocationFailed { requested_size };
        if requested_size == 0 {
            return Err(failed);
        }

        let strategy = self.policy.strategy();
        let id = strategy
            .select(self.free_list, requested_size)
            .ok_or(failed)?;
        let mut block = self.free_list.remove_node(id).ok_or(failed)?;
        trace!("{} selected {} for {} units", self.policy, block, requested_size);

        let remainder = block.split_off(requested_size);
        block.assign(pid);
        self.allocated_list.insert_sorted_by_address(block);

        if let Some(rest) = remainder {
            self.free_list.insert(rest, strategy.free_list_order());
        }

        debug!("allocated {} to pid {}", block, pid);
        Ok(block)
    }

    /// Release the first block owned by `pid`
    ///
    /// The block is marked free and inserted into the free list in the
    /// policy's free list order. It is not merged with its neighbours; that
    /// only happens on an explicit coalesce.
    ///
    /// # Returns
    /// A copy of the released block.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NotFound` if `pid` owns no block.
    pub fn deallocate(&mut self, pid: ProcessId) -> Result<Block, AllocationError> {
        let not_found = AllocationError::NotFound { process_id: pid };
        let (_, id, _) = self
            .allocated_list
            .find_first(|block| block.is_owned_by(pid))
            .ok_or(not_found)?;
        let mut block = self.allocated_list.remove_node(id).ok_or(not_found)?;

        block.release();
        self.free_list.insert(block, self.policy.free_list_order());

        debug!("released {} from pid {}", block, pid);
        Ok(block)
    }

    /// Sort the free list by address and merge adjacent free blocks
    ///
    /// The allocated list is left untouched. Afterwards the free list is in
    /// address order whatever the policy.
    ///
    /// # Returns
    /// The number of blocks removed by merging.
    pub fn coalesce(&mut self) -> usize {
        let before = self.free_list.len();
        *self.free_list = coalesce(std::mem::take(self.free_list));
        let merged = before - self.free_list.len();
        debug!("coalesced free list: {} blocks merged away", merged);
        merged
    }

    /// Run a single command
    pub fn execute(&mut self, command: &Command) -> Result<(), AllocationError> {
        match *command {
            Command::Allocate { pid, size } => self.allocate(pid, size).map(|_| ()),
            Command::Deallocate { pid } => self.deallocate(pid).map(|_| ()),
            Command::Coalesce => {
                self.coalesce();
                Ok(())
            }
        }
    }
}
