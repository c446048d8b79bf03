//! Placement-ordered block index.
//!
//! Where [`BlockListIndex`] answers "what occupies where", this index answers
//! "what was placed when": every `(state, position)` pair keeps its global
//! insertion order, while states are interned in a palette so each entry
//! costs a palette slot plus a [`PackedPos`].

use rustc_hash::FxHashMap;
use strata_pos::{BlockPos, PackedPos};

use crate::block_list::BlockList;
use crate::error::BlockListError;
use crate::index::BlockListIndex;
use crate::state::{BlockState, BlockTag, PlacementRule};

/// One interned payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteEntry {
    pub state: BlockState,
    pub tag: Option<BlockTag>,
    pub rule: Option<PlacementRule>,
}

/// Globally ordered `(state, position)` sequence with a state palette.
#[derive(Clone, Debug, Default)]
pub struct OrderedBlockIndex {
    slots: FxHashMap<BlockState, usize>,
    palette: Vec<PaletteEntry>,
    entries: Vec<(usize, PackedPos)>,
}

impl OrderedBlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn intern(&mut self, state: &BlockState) -> usize {
        if let Some(&slot) = self.slots.get(state) {
            return slot;
        }
        let slot = self.palette.len();
        self.palette.push(PaletteEntry {
            state: state.clone(),
            tag: None,
            rule: None,
        });
        self.slots.insert(state.clone(), slot);
        slot
    }

    /// Appends `pos` under `state` at the end of the global sequence.
    pub fn put(&mut self, state: &BlockState, pos: BlockPos) {
        let slot = self.intern(state);
        self.entries.push((slot, pos.pack()));
    }

    /// Like [`put`](Self::put), making `tag` the payload's tag when present.
    pub fn put_tagged(&mut self, state: &BlockState, tag: Option<BlockTag>, pos: BlockPos) {
        let slot = self.intern(state);
        if tag.is_some() {
            self.palette[slot].tag = tag;
        }
        self.entries.push((slot, pos.pack()));
    }

    /// Appends several positions under `state`, in order.
    pub fn put_all(&mut self, state: &BlockState, positions: impl IntoIterator<Item = BlockPos>) {
        let slot = self.intern(state);
        self.entries
            .extend(positions.into_iter().map(|p| (slot, p.pack())));
    }

    /// Appends every position of `list` and merges its payload into the palette.
    pub fn put_list(&mut self, list: &BlockList) {
        let slot = self.intern(list.state());
        let entry = &mut self.palette[slot];
        if let Some(tag) = list.tag() {
            entry.tag = Some(tag.clone());
        }
        if entry.rule.is_none() {
            entry.rule = list.rule().cloned();
        }
        self.entries
            .extend(list.packed().iter().map(|&p| (slot, p)));
    }

    // -- queries ------------------------------------------------------------

    /// The `index`-th placement.
    pub fn get(&self, index: usize) -> Result<(&BlockState, BlockPos), BlockListError> {
        let &(slot, packed) = self
            .entries
            .get(index)
            .ok_or(BlockListError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        Ok((&self.palette[slot].state, packed.decode()))
    }

    /// Iterates placements in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&BlockState, BlockPos)> + '_ {
        self.entries
            .iter()
            .map(|&(slot, packed)| (&self.palette[slot].state, packed.decode()))
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct states.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    // -- conversion ---------------------------------------------------------

    /// Regroups by state. Groups appear in first-placement order.
    pub fn to_unordered(&self) -> BlockListIndex {
        let mut index = BlockListIndex::new();
        for entry in &self.palette {
            let mut list = BlockList::new(entry.state.clone());
            list.set_tag(entry.tag.clone());
            list.set_rule(entry.rule.clone());
            index.put_list(list);
        }
        for &(slot, packed) in &self.entries {
            index.put_packed(&self.palette[slot].state, packed);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> BlockState {
        BlockState::new("stone")
    }

    fn glass() -> BlockState {
        BlockState::new("glass")
    }

    #[test]
    fn test_insertion_order_is_global() {
        let mut ordered = OrderedBlockIndex::new();
        ordered.put(&stone(), BlockPos::new(0, 0, 0));
        ordered.put(&glass(), BlockPos::new(1, 0, 0));
        ordered.put(&stone(), BlockPos::new(2, 0, 0));

        let seen: Vec<_> = ordered.iter().map(|(s, p)| (s.block_id().to_string(), p.x)).collect();
        assert_eq!(
            seen,
            vec![
                ("minecraft:stone".to_string(), 0),
                ("minecraft:glass".to_string(), 1),
                ("minecraft:stone".to_string(), 2),
            ]
        );
        assert_eq!(ordered.palette_len(), 2);
        assert_eq!(ordered.len(), 3);
    }

    #[test]
    fn test_palette_slots_stay_distinct() {
        let mut ordered = OrderedBlockIndex::new();
        for round in 0..2 {
            for i in 0..1_000 {
                ordered.put(&BlockState::new(format!("block_{i}")), BlockPos::new(i, round, 0));
            }
        }
        assert_eq!(ordered.palette_len(), 1_000);
        assert_eq!(ordered.len(), 2_000);
        for (i, entry) in ordered.palette().iter().enumerate() {
            assert_eq!(entry.state, BlockState::new(format!("block_{i}")));
        }
        let (state, pos) = ordered.get(1_999).unwrap();
        assert_eq!(state, &BlockState::new("block_999"));
        assert_eq!(pos, BlockPos::new(999, 1, 0));
    }

    #[test]
    fn test_get_out_of_range() {
        let mut ordered = OrderedBlockIndex::new();
        ordered.put(&stone(), BlockPos::ORIGIN);
        assert_eq!(ordered.get(0).unwrap(), (&stone(), BlockPos::ORIGIN));
        assert!(matches!(
            ordered.get(1),
            Err(BlockListError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_to_unordered_groups_by_state() {
        let mut ordered = OrderedBlockIndex::new();
        ordered.put(&glass(), BlockPos::new(0, 0, 0));
        ordered.put(&stone(), BlockPos::new(1, 0, 0));
        ordered.put_tagged(&glass(), Some(BlockTag::new().with("lit", true)), BlockPos::new(2, 0, 0));

        let index = ordered.to_unordered();
        assert_eq!(index.len(), 2);
        assert_eq!(index.slot_of(&glass()), Some(0));
        let glass_list = index.get(&glass()).unwrap();
        assert_eq!(
            glass_list.positions().map(|p| p.x).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(glass_list.tag().is_some());
        assert_eq!(index.position_count(), 3);
    }

    #[test]
    fn test_put_list_carries_rule() {
        let list = BlockList::with_positions(stone(), [BlockPos::ORIGIN, BlockPos::new(0, 1, 0)])
            .with_rule(PlacementRule::forced());
        let mut ordered = OrderedBlockIndex::new();
        ordered.put_list(&list);
        ordered.put_all(&glass(), [BlockPos::new(5, 5, 5)]);
        assert_eq!(ordered.len(), 3);
        assert_eq!(ordered.palette()[0].rule, Some(PlacementRule::forced()));

        let back = ordered.to_unordered();
        assert_eq!(back.get(&stone()), Some(&list));
    }

    #[test]
    fn test_unordered_ordered_unordered_preserves_groups() {
        let mut index = BlockListIndex::new();
        for i in 0..20 {
            let state = if i % 3 == 0 { glass() } else { stone() };
            index.put(&state, BlockPos::new(i, -i, i * 7));
        }
        let back = index.to_ordered().to_unordered();
        assert_eq!(back.lists(), index.lists());
    }
}
