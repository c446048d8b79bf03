//! Block state payloads, position lists, deduplicating state indexes, chunk
//! record export, and parallel world collection.

pub mod block_list;
pub mod collect;
pub mod compact;
pub mod error;
pub mod index;
pub mod ordered;
pub mod state;

pub use block_list::BlockList;
pub use collect::{BlockSource, Collector, MemoryWorld};
pub use compact::{BlockListRecord, RelPos, pack_compact, unpack_compact, write_records};
pub use error::BlockListError;
pub use index::BlockListIndex;
pub use ordered::{OrderedBlockIndex, PaletteEntry};
pub use state::{BlockSample, BlockState, BlockTag, PlacementRule, StateParseError};
