//! A list of packed positions that all share one block payload.
//!
//! Storing one [`BlockState`] per group and a flat `Vec<PackedPos>` instead of
//! a `(state, pos)` pair per block keeps memory proportional to the number of
//! positions, not to the number of positions times the payload size.

use rand::Rng;
use strata_pos::{BlockPos, PackedPos};

use crate::error::BlockListError;
use crate::state::{BlockState, BlockTag, PlacementRule};

/// Positions sharing one state, tag, and placement rule.
///
/// Duplicates are allowed; nothing is deduplicated on insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockList {
    state: BlockState,
    tag: Option<BlockTag>,
    rule: Option<PlacementRule>,
    positions: Vec<PackedPos>,
}

impl BlockList {
    /// Creates an empty list for `state`.
    pub fn new(state: BlockState) -> Self {
        Self {
            state,
            tag: None,
            rule: None,
            positions: Vec::new(),
        }
    }

    /// Creates a list holding a single position.
    pub fn with_position(state: BlockState, pos: BlockPos) -> Self {
        let mut list = Self::new(state);
        list.add(pos);
        list
    }

    /// Creates a list from a sequence of positions, preserving their order.
    pub fn with_positions(state: BlockState, positions: impl IntoIterator<Item = BlockPos>) -> Self {
        let mut list = Self::new(state);
        list.add_all(positions);
        list
    }

    pub fn with_tag(mut self, tag: BlockTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_rule(mut self, rule: PlacementRule) -> Self {
        self.rule = Some(rule);
        self
    }

    // -- payload ------------------------------------------------------------

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn set_state(&mut self, state: BlockState) {
        self.state = state;
    }

    pub fn tag(&self) -> Option<&BlockTag> {
        self.tag.as_ref()
    }

    pub fn set_tag(&mut self, tag: Option<BlockTag>) {
        self.tag = tag;
    }

    pub fn rule(&self) -> Option<&PlacementRule> {
        self.rule.as_ref()
    }

    pub fn set_rule(&mut self, rule: Option<PlacementRule>) {
        self.rule = rule;
    }

    // -- insertion ----------------------------------------------------------

    /// Appends a position. Amortized O(1).
    pub fn add(&mut self, pos: BlockPos) {
        self.positions.push(pos.pack());
    }

    /// Appends an already packed position. Amortized O(1).
    pub fn add_packed(&mut self, packed: PackedPos) {
        self.positions.push(packed);
    }

    /// Appends every position in order.
    pub fn add_all(&mut self, positions: impl IntoIterator<Item = BlockPos>) {
        self.positions
            .extend(positions.into_iter().map(BlockPos::pack));
    }

    /// Appends already packed positions in order.
    pub fn add_all_packed(&mut self, packed: impl IntoIterator<Item = PackedPos>) {
        self.positions.extend(packed);
    }

    /// Replaces the whole position sequence.
    pub fn set_positions(&mut self, positions: impl IntoIterator<Item = BlockPos>) {
        self.positions.clear();
        self.add_all(positions);
    }

    /// Replaces the position at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, pos: BlockPos) -> Result<BlockPos, BlockListError> {
        let len = self.positions.len();
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(BlockListError::IndexOutOfRange { index, len })?;
        let old = *slot;
        *slot = pos.pack();
        Ok(old.decode())
    }

    // -- access -------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<BlockPos, BlockListError> {
        self.positions
            .get(index)
            .map(|p| p.decode())
            .ok_or(self.out_of_range(index))
    }

    pub fn first(&self) -> Result<BlockPos, BlockListError> {
        self.get(0)
    }

    pub fn last(&self) -> Result<BlockPos, BlockListError> {
        match self.positions.last() {
            Some(p) => Ok(p.decode()),
            None => Err(self.out_of_range(0)),
        }
    }

    /// Picks a uniformly random position using the caller's generator.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BlockPos, BlockListError> {
        if self.positions.is_empty() {
            return Err(self.out_of_range(0));
        }
        let index = rng.random_range(0..self.positions.len());
        self.get(index)
    }

    /// Returns `true` if `pos` occurs at least once. O(n).
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.positions.contains(&pos.pack())
    }

    /// Iterates decoded positions in stored order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = BlockPos> + '_ {
        self.positions.iter().map(|p| p.decode())
    }

    /// Raw packed storage.
    pub fn packed(&self) -> &[PackedPos] {
        &self.positions
    }

    // -- removal ------------------------------------------------------------

    /// Removes the first occurrence of `pos`.
    ///
    /// Linear scan, O(n). Keep it out of hot loops. Returns `false` and leaves
    /// the list untouched when `pos` is absent.
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        let packed = pos.pack();
        match self.positions.iter().position(|p| *p == packed) {
            Some(i) => {
                self.positions.remove(i);
                true
            }
            None => false,
        }
    }

    /// Removes the first occurrence of each given position. O(n·m).
    ///
    /// Returns how many positions were actually removed.
    pub fn remove_all(&mut self, positions: impl IntoIterator<Item = BlockPos>) -> usize {
        positions.into_iter().filter(|p| self.remove(*p)).count()
    }

    /// Removes the element at `index`, shifting the tail left. O(n), keeps order.
    pub fn remove_at(&mut self, index: usize) -> Result<BlockPos, BlockListError> {
        if index >= self.positions.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.positions.remove(index).decode())
    }

    /// Removes the element at `index` by moving the last element into its
    /// place. O(1), does not keep order.
    pub fn swap_remove_at(&mut self, index: usize) -> Result<BlockPos, BlockListError> {
        if index >= self.positions.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.positions.swap_remove(index).decode())
    }

    /// Removes the first element. O(n), keeps order.
    pub fn remove_first(&mut self) -> Result<BlockPos, BlockListError> {
        self.remove_at(0)
    }

    /// Removes the last element. O(1).
    pub fn remove_last(&mut self) -> Result<BlockPos, BlockListError> {
        let len = self.positions.len();
        self.positions
            .pop()
            .map(PackedPos::decode)
            .ok_or(BlockListError::IndexOutOfRange { index: 0, len })
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    // -- merging ------------------------------------------------------------

    /// Appends `other`'s positions after this list's own.
    ///
    /// A tag carried by `other` replaces ours; `other`'s rule is adopted only
    /// when we have none. The state of `other` is ignored.
    pub fn absorb(&mut self, other: BlockList) {
        if other.tag.is_some() {
            self.tag = other.tag;
        }
        if self.rule.is_none() {
            self.rule = other.rule;
        }
        if self.positions.is_empty() {
            self.positions = other.positions;
        } else {
            self.positions.extend(other.positions);
        }
    }

    fn out_of_range(&self, index: usize) -> BlockListError {
        BlockListError::IndexOutOfRange {
            index,
            len: self.positions.len(),
        }
    }
}
