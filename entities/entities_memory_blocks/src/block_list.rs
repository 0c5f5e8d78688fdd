//! Ordered Block List
//!
//! Provides `BlockList`, the sequence that holds the free and the allocated
//! blocks of a partition.
//!
//! ## Storage
//!
//! Nodes live in an arena (`Vec` of slots) and are linked by slot index
//! instead of pointers. Every node owns exactly one `Block`; removing a node
//! moves its block out to the caller, and dropping the list drops the blocks.
//! Vacated slots are recycled, and each slot carries a generation counter so
//! that a `NodeId` taken before a removal can never address the node that
//! later reuses the slot.
//!
//! ## Insertion disciplines
//!
//! The list itself has no ordering. Ordering comes from the discipline the
//! caller uses on every insert, selected with `InsertionPolicy`:
//!
//! - **Back**: append, keeping arrival order
//! - **AscendingAddress**: before the first block whose start is not smaller
//! - **AscendingSize**: after every block that is not larger
//! - **DescendingSize**: after every block that is not smaller
//!
//! Mixing disciplines on one list silently breaks its order, so callers pick
//! one per list and stick to it.

use std::fmt;
use std::iter::FusedIterator;

use crate::block::{Block, ProcessId};

/// Insertion discipline applied by `BlockList::insert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertionPolicy {
    /// Append to the back of the list
    Back,
    /// Keep blocks in ascending order of start address
    AscendingAddress,
    /// Keep blocks in ascending order of size
    AscendingSize,
    /// Keep blocks in descending order of size
    DescendingSize,
}

/// Structural handle to one node of a `BlockList`
///
/// Handles are returned by inserts and scans. They stay valid until the node
/// is removed; afterwards every lookup through them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node {
    block: Block,
    next: Option<u32>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Singly linked list of blocks stored in an index arena
#[derive(Clone, Default)]
pub struct BlockList {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl BlockList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of blocks in the list
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every block
    ///
    /// Slots are kept for reuse; every handle taken before the call goes
    /// stale.
    pub fn clear(&mut self) {
        while self.remove_front().is_some() {}
    }

    /// Insert at the front of the list
    pub fn push_front(&mut self, block: Block) -> NodeId {
        self.link_after(None, block)
    }

    /// Insert at the back of the list
    pub fn push_back(&mut self, block: Block) -> NodeId {
        self.link_after(self.tail, block)
    }

    /// Insert before the node at position `index`
    ///
    /// Index 0 (or an empty list) inserts at the front, an index at or past
    /// the end appends.
    pub fn insert_at(&mut self, block: Block, index: usize) -> NodeId {
        if index == 0 || self.is_empty() {
            return self.push_front(block);
        }
        let prev = self.nth_index(index.min(self.len) - 1);
        self.link_after(prev, block)
    }

    /// Insert using the given discipline
    pub fn insert(&mut self, block: Block, policy: InsertionPolicy) -> NodeId {
        match policy {
            InsertionPolicy::Back => self.push_back(block),
            InsertionPolicy::AscendingAddress => self.insert_sorted_by_address(block),
            InsertionPolicy::AscendingSize => self.insert_sorted_by_size_ascending(block),
            InsertionPolicy::DescendingSize => self.insert_sorted_by_size_descending(block),
        }
    }

    /// Insert before the first block whose start is >= the new start
    pub fn insert_sorted_by_address(&mut self, block: Block) -> NodeId {
        let start = block.start();
        self.insert_after_run(block, |current| start > current.start())
    }

    /// Insert after every block whose size is <= the new size
    pub fn insert_sorted_by_size_ascending(&mut self, block: Block) -> NodeId {
        let size = block.size();
        self.insert_after_run(block, |current| size >= current.size())
    }

    /// Insert after every block whose size is >= the new size
    pub fn insert_sorted_by_size_descending(&mut self, block: Block) -> NodeId {
        let size = block.size();
        self.insert_after_run(block, |current| size <= current.size())
    }

    /// Remove the first block
    pub fn remove_front(&mut self) -> Option<Block> {
        self.unlink_after(None)
    }

    /// Remove the last block
    pub fn remove_back(&mut self) -> Option<Block> {
        let tail = self.tail?;
        let prev = self.predecessor_of(tail)?;
        self.unlink_after(prev)
    }

    /// Remove the block at position `index`, if there is one
    pub fn remove_at(&mut self, index: usize) -> Option<Block> {
        if index >= self.len {
            return None;
        }
        let prev = match index {
            0 => None,
            _ => Some(self.nth_index(index - 1)?),
        };
        self.unlink_after(prev)
    }

    /// Remove the exact node behind `id`
    ///
    /// Returns `None` when the handle is stale.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Block> {
        self.get(id)?;
        let prev = self.predecessor_of(id.index)?;
        self.unlink_after(prev)
    }

    /// Block behind a node handle
    pub fn get(&self, id: NodeId) -> Option<&Block> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref().map(|node| &node.block)
    }

    /// First block of the list
    pub fn front(&self) -> Option<&Block> {
        self.iter().next()
    }

    /// Last block of the list
    pub fn back(&self) -> Option<&Block> {
        self.node(self.tail?).map(|node| &node.block)
    }

    /// Block at position `index`
    pub fn get_at(&self, index: usize) -> Option<&Block> {
        self.iter().nth(index)
    }

    /// Iterate over the blocks in list order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: self.nodes(),
        }
    }

    /// Iterate over `(handle, block)` pairs in list order
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// First block matching `predicate`, with its position and handle
    pub fn find_first<P>(&self, mut predicate: P) -> Option<(usize, NodeId, &Block)>
    where
        P: FnMut(&Block) -> bool,
    {
        self.nodes()
            .enumerate()
            .find(|(_, (_, block))| predicate(block))
            .map(|(index, (id, block))| (index, id, block))
    }

    /// Check for a block equal to `value` (same bounds and owner)
    pub fn contains(&self, value: &Block) -> bool {
        self.index_of(value).is_some()
    }

    /// Position of the first block equal to `value`
    pub fn index_of(&self, value: &Block) -> Option<usize> {
        self.find_first(|block| block == value).map(|(index, _, _)| index)
    }

    /// Check for a block that can hold `size` units
    pub fn contains_size_at_least(&self, size: usize) -> bool {
        self.index_of_size_at_least(size).is_some()
    }

    /// Position of the first block that can hold `size` units
    pub fn index_of_size_at_least(&self, size: usize) -> Option<usize> {
        self.find_first(|block| block.fits(size)).map(|(index, _, _)| index)
    }

    /// Check for a block owned by `pid`
    pub fn contains_owner(&self, pid: ProcessId) -> bool {
        self.index_of_owner(pid).is_some()
    }

    /// Position of the first block owned by `pid`
    pub fn index_of_owner(&self, pid: ProcessId) -> Option<usize> {
        self.find_first(|block| block.is_owned_by(pid)).map(|(index, _, _)| index)
    }

    /// Merge neighbouring free blocks that touch
    ///
    /// A pair merges when both blocks are free and the left one ends exactly
    /// one unit before the right one starts. The merged block is compared
    /// again with its new neighbour, so each run collapses into one block.
    /// Owned blocks and gaps break runs. Only list neighbours are considered:
    /// the list should already be in address order for this to find every
    /// run.
    ///
    /// Every node is relinked, so all handles taken before the call go
    /// stale, including those of blocks that were not merged.
    ///
    /// Returns the number of merges performed.
    pub fn coalesce_adjacent(&mut self) -> usize {
        let before = self.len;
        let runs = std::iter::from_fn(|| self.remove_front())
            .fold(Vec::with_capacity(before), |mut runs: Vec<Block>, block| {
                let merged = match runs.last_mut() {
                    Some(last) if last.is_free() && block.is_free() => last.absorb(block),
                    _ => false,
                };
                if !merged {
                    runs.push(block);
                }
                runs
            });
        self.extend(runs);
        before - self.len
    }

    fn node(&self, index: u32) -> Option<&Node> {
        self.slots.get(index as usize)?.node.as_ref()
    }

    fn node_mut(&mut self, index: u32) -> Option<&mut Node> {
        self.slots.get_mut(index as usize)?.node.as_mut()
    }

    /// Slot index of the node at position `position`
    fn nth_index(&self, position: usize) -> Option<u32> {
        self.nodes().nth(position).map(|(id, _)| id.index)
    }

    /// Slot index of the node linked before `target`
    ///
    /// The outer `Option` is `None` when `target` is not linked into the
    /// list; the inner one is `None` when `target` is the head.
    fn predecessor_of(&self, target: u32) -> Option<Option<u32>> {
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            if index == target {
                return Some(prev);
            }
            prev = cursor;
            cursor = self.node(index)?.next;
        }
        None
    }

    /// Walk while `advance` holds and insert in front of the first miss
    fn insert_after_run<F>(&mut self, block: Block, advance: F) -> NodeId
    where
        F: Fn(&Block) -> bool,
    {
        let mut prev = None;
        for (id, current) in self.nodes() {
            if !advance(current) {
                break;
            }
            prev = Some(id.index);
        }
        self.link_after(prev, block)
    }

    /// Link a new node after `prev`, or at the head when `prev` is `None`
    fn link_after(&mut self, prev: Option<u32>, block: Block) -> NodeId {
        let next = match prev {
            Some(index) => self.node(index).and_then(|node| node.next),
            None => self.head,
        };
        let id = self.allocate_slot(Node { block, next });

        match prev {
            Some(index) => {
                if let Some(node) = self.node_mut(index) {
                    node.next = Some(id.index);
                }
            }
            None => self.head = Some(id.index),
        }
        if next.is_none() {
            self.tail = Some(id.index);
        }
        self.len += 1;
        id
    }

    /// Unlink the node after `prev` (the head when `prev` is `None`)
    fn unlink_after(&mut self, prev: Option<u32>) -> Option<Block> {
        let target = match prev {
            Some(index) => self.node(index)?.next?,
            None => self.head?,
        };
        let node = self.release_slot(target)?;

        match prev {
            Some(index) => {
                if let Some(prev_node) = self.node_mut(index) {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        if self.tail == Some(target) {
            self.tail = prev;
        }
        self.len -= 1;
        Some(node.block)
    }

    fn allocate_slot(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release_slot(&mut self, index: u32) -> Option<Node> {
        let slot = self.slots.get_mut(index as usize)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(index);
        Some(node)
    }
}

impl PartialEq for BlockList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for BlockList {}

impl fmt::Debug for BlockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Block> for BlockList {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        let mut list = BlockList::new();
        list.extend(iter);
        list
    }
}

impl Extend<Block> for BlockList {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        for block in iter {
            self.push_back(block);
        }
    }
}

/// Iterator over `(NodeId, &Block)` in list order
pub struct Nodes<'a> {
    list: &'a BlockList,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (NodeId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = self.list.slots.get(index as usize)?;
        let node = slot.node.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        let id = NodeId {
            index,
            generation: slot.generation,
        };
        Some((id, &node.block))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for Nodes<'_> {}

/// Iterator over `&Block` in list order
pub struct Iter<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|(_, block)| block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Block;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator that drains a list from the front
pub struct IntoIter {
    list: BlockList,
}

impl Iterator for IntoIter {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.remove_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

impl IntoIterator for BlockList {
    type Item = Block;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
