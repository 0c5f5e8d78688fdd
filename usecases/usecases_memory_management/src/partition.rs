//! Partition State
//!
//! Provides `Partition`, which owns the free list and the allocated list of
//! one simulated address range together with the policy of the run, and the
//! conservation check that validates them.
//!
//! ## Invariants
//!
//! Between commands:
//! - every block on the free list is free
//! - every block on the allocated list is owned
//! - the blocks of both lists, taken together, tile `[0, size - 1]` with no
//!   gap and no overlap
//!
//! `verify_partition` checks all three and reports the first violation.

use entities_memory_blocks::{Block, BlockList, ProcessId};

use crate::allocator::{AllocationError, AllocationPolicy, AllocatorContext};
use crate::command::Command;

/// Errors creating a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    /// A partition must hold at least one unit
    #[error("partition size must be greater than zero")]
    EmptyPartition,
}

/// A broken conservation invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PartitionViolation {
    /// An owned block sits on the free list
    #[error("free list holds owned block {block}")]
    NotFree { block: Block },
    /// A free block sits on the allocated list
    #[error("allocated list holds free block {block}")]
    NotOwned { block: Block },
    /// Units `[start, end]` are covered by no block
    #[error("units {start}..={end} are not covered by any block")]
    Gap { start: usize, end: usize },
    /// Two blocks cover the same units
    #[error("block {first} overlaps block {second}")]
    Overlap { first: Block, second: Block },
    /// A block reaches past the end of the partition
    #[error("block {block} extends past partition end {last}")]
    Overrun { block: Block, last: usize },
}

/// Check that `free_list` and `allocated_list` tile a partition of `size`
///
/// # Errors
///
/// Returns the first `PartitionViolation` found. Ownership is checked first,
/// then coverage in address order.
pub fn verify_partition(
    size: usize,
    free_list: &BlockList,
    allocated_list: &BlockList,
) -> Result<(), PartitionViolation> {
    if let Some(block) = free_list.iter().find(|b| !b.is_free()) {
        return Err(PartitionViolation::NotFree { block: *block });
    }
    if let Some(block) = allocated_list.iter().find(|b| b.is_free()) {
        return Err(PartitionViolation::NotOwned { block: *block });
    }

    let mut blocks: Vec<Block> = free_list.iter().chain(allocated_list.iter()).copied().collect();
    blocks.sort_by_key(Block::start);

    let last = size.saturating_sub(1);
    let mut next_unit = 0;
    let mut previous: Option<Block> = None;
    for block in blocks {
        if block.end() > last {
            return Err(PartitionViolation::Overrun { block, last });
        }
        if let Some(prev) = previous.filter(|prev| prev.overlaps(&block)) {
            return Err(PartitionViolation::Overlap { first: prev, second: block });
        }
        if block.start() > next_unit {
            return Err(PartitionViolation::Gap {
                start: next_unit,
                end: block.start() - 1,
            });
        }
        next_unit = block.end() + 1;
        previous = Some(block);
    }

    if next_unit < size {
        return Err(PartitionViolation::Gap {
            start: next_unit,
            end: last,
        });
    }
    Ok(())
}

/// Free and allocated lists of one simulated partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    size: usize,
    policy: AllocationPolicy,
    free_list: BlockList,
    allocated_list: BlockList,
}

impl Partition {
    /// Create a partition of `size` units, entirely free
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::EmptyPartition` if `size` is 0.
    pub fn new(size: usize, policy: AllocationPolicy) -> Result<Self, PartitionError> {
        let whole = Block::free_with_size(0, size).ok_or(PartitionError::EmptyPartition)?;
        let mut free_list = BlockList::new();
        free_list.push_front(whole);
        Ok(Self {
            size,
            policy,
            free_list,
            allocated_list: BlockList::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn free_list(&self) -> &BlockList {
        &self.free_list
    }

    pub fn allocated_list(&self) -> &BlockList {
        &self.allocated_list
    }

    /// Borrow both lists as an allocator context
    pub fn context(&mut self) -> AllocatorContext<'_> {
        AllocatorContext::new(&mut self.free_list, &mut self.allocated_list, self.policy)
    }

    /// Allocate `size` units to `pid`, see `AllocatorContext::allocate`
    pub fn allocate(&mut self, pid: ProcessId, size: usize) -> Result<Block, AllocationError> {
        self.context().allocate(pid, size)
    }

    /// Release the block of `pid`, see `AllocatorContext::deallocate`
    pub fn deallocate(&mut self, pid: ProcessId) -> Result<Block, AllocationError> {
        self.context().deallocate(pid)
    }

    /// Coalesce the free list, see `AllocatorContext::coalesce`
    pub fn coalesce(&mut self) -> usize {
        self.context().coalesce()
    }

    /// Run a single command
    pub fn execute(&mut self, command: &Command) -> Result<(), AllocationError> {
        self.context().execute(command)
    }

    /// Units currently free
    pub fn free_units(&self) -> usize {
        self.free_list.iter().map(Block::size).sum()
    }

    /// Units currently allocated
    pub fn allocated_units(&self) -> usize {
        self.allocated_list.iter().map(Block::size).sum()
    }

    /// Check the conservation invariants of this partition
    pub fn verify(&self) -> Result<(), PartitionViolation> {
        verify_partition(self.size, &self.free_list, &self.allocated_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u32) -> ProcessId {
        ProcessId::new(id).unwrap()
    }

    fn free(start: usize, end: usize) -> Block {
        Block::free(start, end).unwrap()
    }

    fn owned(start: usize, end: usize, id: u32) -> Block {
        Block::owned(start, end, pid(id)).unwrap()
    }

    #[test]
    fn test_new_partition_is_one_free_block() {
        let partition = Partition::new(100, AllocationPolicy::FirstFit).unwrap();
        assert_eq!(partition.free_list().len(), 1);
        assert_eq!(*partition.free_list().front().unwrap(), free(0, 99));
        assert!(partition.allocated_list().is_empty());
        assert_eq!(partition.free_units(), 100);
        assert!(partition.verify().is_ok());
    }

    #[test]
    fn test_empty_partition_rejected() {
        assert_eq!(
            Partition::new(0, AllocationPolicy::BestFit),
            Err(PartitionError::EmptyPartition)
        );
    }

    #[test]
    fn test_units_are_conserved() {
        let mut partition = Partition::new(64, AllocationPolicy::WorstFit).unwrap();
        partition.allocate(pid(1), 10).unwrap();
        partition.allocate(pid(2), 20).unwrap();
        assert_eq!(partition.allocated_units(), 30);
        assert_eq!(partition.free_units(), 34);
        assert!(partition.verify().is_ok());
    }

    #[test]
    fn test_verify_detects_gap() {
        let free_list: BlockList = [free(0, 4)].into_iter().collect();
        let allocated: BlockList = [owned(6, 9, 1)].into_iter().collect();
        assert_eq!(
            verify_partition(10, &free_list, &allocated),
            Err(PartitionViolation::Gap { start: 5, end: 5 })
        );
    }

    #[test]
    fn test_verify_detects_trailing_gap() {
        let free_list: BlockList = [free(0, 4)].into_iter().collect();
        assert_eq!(
            verify_partition(10, &free_list, &BlockList::new()),
            Err(PartitionViolation::Gap { start: 5, end: 9 })
        );
    }

    #[test]
    fn test_verify_detects_overlap() {
        let free_list: BlockList = [free(0, 5)].into_iter().collect();
        let allocated: BlockList = [owned(5, 9, 1)].into_iter().collect();
        assert_eq!(
            verify_partition(10, &free_list, &allocated),
            Err(PartitionViolation::Overlap {
                first: free(0, 5),
                second: owned(5, 9, 1)
            })
        );
    }

    #[test]
    fn test_verify_detects_overrun() {
        let free_list: BlockList = [free(0, 10)].into_iter().collect();
        assert!(matches!(
            verify_partition(10, &free_list, &BlockList::new()),
            Err(PartitionViolation::Overrun { last: 9, .. })
        ));
    }

    #[test]
    fn test_verify_detects_misplaced_blocks() {
        let free_list: BlockList = [owned(0, 9, 1)].into_iter().collect();
        assert!(matches!(
            verify_partition(10, &free_list, &BlockList::new()),
            Err(PartitionViolation::NotFree { .. })
        ));

        let allocated: BlockList = [free(0, 9)].into_iter().collect();
        assert!(matches!(
            verify_partition(10, &BlockList::new(), &allocated),
            Err(PartitionViolation::NotOwned { .. })
        ));
    }
}
