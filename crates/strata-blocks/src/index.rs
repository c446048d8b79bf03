//! Deduplicating state index: one [`BlockList`] per distinct [`BlockState`].
//!
//! The index keeps a `state → slot` map next to a dense `Vec<BlockList>`
//! where the slot number is the vector position. Every key in the map points
//! at a live list whose state equals the key, and no two slots share a state.

use rustc_hash::FxHashMap;
use strata_pos::{BlockPos, ChunkPos, PackedPos};
use tracing::debug;

use crate::block_list::BlockList;
use crate::compact::BlockListRecord;
use crate::error::BlockListError;
use crate::ordered::OrderedBlockIndex;
use crate::state::{BlockState, BlockTag};

/// Groups positions by block state with amortized O(1) insertion.
///
/// Group order is creation order; positions inside a group keep append order.
#[derive(Clone, Debug, Default)]
pub struct BlockListIndex {
    slots: FxHashMap<BlockState, usize>,
    lists: Vec<BlockList>,
}

impl BlockListIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from existing lists, merging lists that share a state.
    pub fn from_lists(lists: impl IntoIterator<Item = BlockList>) -> Self {
        let mut index = Self::new();
        for list in lists {
            index.put_list(list);
        }
        index
    }

    /// Returns `lists` with every state appearing in exactly one list.
    ///
    /// Lists are merged in input order: the first list for a state decides
    /// its position in the output, later ones are appended to it. Uses a
    /// private map, so it never touches any other index. O(total positions).
    pub fn cleaned(lists: impl IntoIterator<Item = BlockList>) -> Vec<BlockList> {
        Self::from_lists(lists).into_lists()
    }

    /// Slot of `state`, creating an empty list for it if needed.
    fn slot_for(&mut self, state: &BlockState) -> usize {
        if let Some(&slot) = self.slots.get(state) {
            return slot;
        }
        let slot = self.lists.len();
        self.lists.push(BlockList::new(state.clone()));
        self.slots.insert(state.clone(), slot);
        debug!(%state, slot, "new block list");
        slot
    }

    /// Adds one position under `state`.
    pub fn put(&mut self, state: &BlockState, pos: BlockPos) {
        let slot = self.slot_for(state);
        self.lists[slot].add(pos);
    }

    /// Adds one already packed position under `state`.
    pub fn put_packed(&mut self, state: &BlockState, packed: PackedPos) {
        let slot = self.slot_for(state);
        self.lists[slot].add_packed(packed);
    }

    /// Adds positions under `state`, appended after any existing ones.
    pub fn put_all(&mut self, state: &BlockState, positions: impl IntoIterator<Item = BlockPos>) {
        let slot = self.slot_for(state);
        self.lists[slot].add_all(positions);
    }

    /// Adds one position and, if `tag` is present, makes it the group's tag.
    ///
    /// An untagged put never clears a tag set earlier.
    pub fn put_tagged(&mut self, state: &BlockState, tag: Option<BlockTag>, pos: BlockPos) {
        let slot = self.slot_for(state);
        let list = &mut self.lists[slot];
        if tag.is_some() {
            list.set_tag(tag);
        }
        list.add(pos);
    }

    /// Adds a whole list.
    ///
    /// If its state is already indexed, the incoming positions are appended to
    /// the existing list (see [`BlockList::absorb`]); otherwise the list takes
    /// a new slot as is.
    pub fn put_list(&mut self, list: BlockList) {
        match self.slots.get(list.state()).copied() {
            Some(slot) => {
                debug!(state = %list.state(), slot, merged = list.len(), "merging block list");
                self.lists[slot].absorb(list);
            }
            None => {
                let slot = self.lists.len();
                self.slots.insert(list.state().clone(), slot);
                self.lists.push(list);
            }
        }
    }

    // -- queries ------------------------------------------------------------

    /// The list holding `state`, if any.
    pub fn get(&self, state: &BlockState) -> Option<&BlockList> {
        self.slots.get(state).map(|&slot| &self.lists[slot])
    }

    pub fn get_mut(&mut self, state: &BlockState) -> Option<&mut BlockList> {
        let slot = *self.slots.get(state)?;
        Some(&mut self.lists[slot])
    }

    /// Slot number of `state`, if indexed.
    pub fn slot_of(&self, state: &BlockState) -> Option<usize> {
        self.slots.get(state).copied()
    }

    pub fn contains_state(&self, state: &BlockState) -> bool {
        self.slots.contains_key(state)
    }

    /// All lists in slot order.
    pub fn lists(&self) -> &[BlockList] {
        &self.lists
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockList> {
        self.lists.iter()
    }

    /// Number of groups (distinct states).
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total positions across all groups.
    pub fn position_count(&self) -> usize {
        self.lists.iter().map(BlockList::len).sum()
    }

    pub fn into_lists(self) -> Vec<BlockList> {
        self.lists
    }

    // -- conversion ---------------------------------------------------------

    /// Flattens into a single globally ordered sequence.
    ///
    /// The unordered index does not remember cross-group insertion order, so
    /// the result walks groups in slot order and each group in append order.
    /// Callers that need true placement order should fill an
    /// [`OrderedBlockIndex`] directly.
    pub fn to_ordered(&self) -> OrderedBlockIndex {
        let mut ordered = OrderedBlockIndex::with_capacity(self.position_count());
        for list in &self.lists {
            ordered.put_list(list);
        }
        ordered
    }

    /// Exports every group. The first group with an out-of-window position
    /// aborts the export.
    pub fn to_records(&self, offset: BlockPos, chunk: ChunkPos) -> Result<Vec<BlockListRecord>, BlockListError> {
        self.lists
            .iter()
            .map(|list| list.to_record(offset, chunk))
            .collect()
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.slots.len(), self.lists.len());
        for (state, &slot) in &self.slots {
            assert_eq!(self.lists[slot].state(), state);
        }
    }
}

impl FromIterator<BlockList> for BlockListIndex {
    fn from_iter<I: IntoIterator<Item = BlockList>>(iter: I) -> Self {
        Self::from_lists(iter)
    }
}

impl Extend<BlockList> for BlockListIndex {
    fn extend<I: IntoIterator<Item = BlockList>>(&mut self, iter: I) {
        for list in iter {
            self.put_list(list);
        }
    }
}

impl<'a> IntoIterator for &'a BlockListIndex {
    type Item = &'a BlockList;
    type IntoIter = std::slice::Iter<'a, BlockList>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.iter()
    }
}
