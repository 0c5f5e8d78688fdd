//! Memory Block Entity
//!
//! Provides the `Block` value and the `ProcessId` owner tag.
//!
//! A block is an inclusive interval `[start, end]` of the simulated partition.
//! It is either free or owned by exactly one process. The size is always
//! derived from the bounds, so a block can never disagree with itself about
//! how large it is.

use std::fmt;
use std::num::NonZeroU32;

/// Identifier of a process owning memory
///
/// Zero is the classic "free" tag and is therefore not a valid process id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(NonZeroU32);

impl ProcessId {
    /// Create a process id, returning `None` for the reserved value 0
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Raw numeric value of the id
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contiguous interval of the partition
///
/// Both bounds are inclusive. Construction rejects `end < start`, so every
/// block has a size of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    start: usize,
    end: usize,
    owner: Option<ProcessId>,
}

impl Block {
    /// Create a free block covering `[start, end]`
    ///
    /// Returns `None` if `end < start`.
    pub fn free(start: usize, end: usize) -> Option<Self> {
        Self::new(start, end, None)
    }

    /// Create a block covering `[start, end]` owned by `owner`
    ///
    /// Returns `None` if `end < start`.
    pub fn owned(start: usize, end: usize, owner: ProcessId) -> Option<Self> {
        Self::new(start, end, Some(owner))
    }

    /// Create a block with an optional owner (`None` means free)
    pub fn new(start: usize, end: usize, owner: Option<ProcessId>) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(Self { start, end, owner })
    }

    /// Create a free block of `size` units starting at `start`
    ///
    /// Returns `None` for a zero size or when the end would overflow.
    pub fn free_with_size(start: usize, size: usize) -> Option<Self> {
        let last = size.checked_sub(1)?;
        Self::free(start, start.checked_add(last)?)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn owner(&self) -> Option<ProcessId> {
        self.owner
    }

    /// Number of units covered, `end - start + 1`
    pub fn size(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Check if this block is owned by `pid`
    pub fn is_owned_by(&self, pid: ProcessId) -> bool {
        self.owner == Some(pid)
    }

    /// Check if the block can hold `size` units
    pub fn fits(&self, size: usize) -> bool {
        size <= self.size()
    }

    /// Check if `next` begins exactly one unit after this block ends
    pub fn is_adjacent_to(&self, next: &Block) -> bool {
        self.end.checked_add(1) == Some(next.start)
    }

    /// Check if the two intervals share at least one unit
    pub fn overlaps(&self, other: &Block) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Hand the block to `owner`
    pub fn assign(&mut self, owner: ProcessId) {
        self.owner = Some(owner);
    }

    /// Mark the block as free
    pub fn release(&mut self) {
        self.owner = None;
    }

    /// Split the block after its first `size` units
    ///
    /// The block keeps the first `size` units. The remainder is returned as a
    /// new free block, or `None` when `size` covers the whole block.
    /// `size` must be in `1..=self.size()`; anything else leaves the block
    /// untouched and returns `None`.
    pub fn split_off(&mut self, size: usize) -> Option<Block> {
        if size == 0 || size >= self.size() {
            return None;
        }
        let original_end = self.end;
        self.end = self.start + size - 1;
        Some(Block {
            start: self.end + 1,
            end: original_end,
            owner: None,
        })
    }

    /// Absorb an adjacent block that directly follows this one
    ///
    /// Returns `false` and leaves both untouched when `next` is not adjacent.
    pub fn absorb(&mut self, next: Block) -> bool {
        if !self.is_adjacent_to(&next) {
            return false;
        }
        self.end = next.end;
        true
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(pid) => write!(f, "[{}, {}] pid {}", self.start, self.end, pid),
            None => write!(f, "[{}, {}] free", self.start, self.end),
        }
    }
}
