//! Bounded chunk-relative export of [`BlockList`]s.
//!
//! Each position is relativized to a chunk column and an offset, then packed
//! into a single `i32`. The resulting [`BlockListRecord`] is a one-way
//! interchange artifact for external tooling and debugging.
//!
//! ## Compact Position Layout
//!
//! | Bits | Field |
//! |------|-------|
//! | 21..=31 | relX (11 bits, `0..2048`) |
//! | 11..=20 | relY + 512 (10 bits, relY in `-512..512`) |
//! | 0..=10 | relZ (11 bits, `0..2048`) |
//!
//! Positions with relX ≥ 1024 set bit 31, so the stored `i32` is negative.
//! relY = 512 would need an eleventh Y bit and overlap relX, so it is rejected.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_pos::{BlockPos, ChunkPos};
use tracing::{debug, warn};

use crate::block_list::BlockList;
use crate::error::BlockListError;

/// Exclusive upper bound of relX and relZ.
pub const WINDOW_XZ: i32 = 2048;

/// Inclusive lower bound of relY.
pub const WINDOW_Y_MIN: i32 = -512;

/// Exclusive upper bound of relY.
pub const WINDOW_Y_MAX: i32 = 512;

const X_SHIFT: u32 = 21;
const Y_SHIFT: u32 = 11;
const XZ_MASK: u32 = 0x7FF;
const Y_MASK: u32 = 0x3FF;

/// Serialized form of one [`BlockList`].
///
/// Field names are part of the external format and must not change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockListRecord {
    /// Display form of the block state.
    #[serde(rename = "type")]
    pub kind: String,
    /// Currently identical to `type`.
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(
        rename = "overriddenBlock",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub overridden_block: Option<Vec<String>>,
    /// Metadata tag rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Compact positions, see the module docs for the bit layout.
    pub positions: Vec<i32>,
}

/// A position in the window frame of a chunk and offset.
///
/// Axes are `i64` so any `i32` position, offset, and chunk combine without
/// overflow; the window check happens afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl RelPos {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for RelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Translates a world position into the window frame of `chunk` and `offset`.
pub fn relativize(pos: BlockPos, offset: BlockPos, chunk: ChunkPos) -> RelPos {
    RelPos::new(
        i64::from(pos.x) - chunk.min_block_x() - i64::from(offset.x),
        i64::from(pos.y) - i64::from(offset.y),
        i64::from(pos.z) - chunk.min_block_z() - i64::from(offset.z),
    )
}

/// Packs a window-relative position, rejecting anything outside the window.
///
/// `pos` is only used for the error report.
fn pack_relative(pos: BlockPos, rel: RelPos) -> Result<i32, BlockListError> {
    let xz = 0..i64::from(WINDOW_XZ);
    let in_window = xz.contains(&rel.x)
        && xz.contains(&rel.z)
        && (i64::from(WINDOW_Y_MIN)..i64::from(WINDOW_Y_MAX)).contains(&rel.y);
    if !in_window {
        return Err(BlockListError::OutOfWindow { pos, rel });
    }
    // In-window axes fit 11 bits, so the narrowing casts are exact.
    let biased_y = (rel.y - i64::from(WINDOW_Y_MIN)) as u32;
    let packed = ((rel.x as u32) << X_SHIFT) | (biased_y << Y_SHIFT) | rel.z as u32;
    Ok(packed as i32)
}

/// Relativizes and packs one world position.
pub fn pack_compact(pos: BlockPos, offset: BlockPos, chunk: ChunkPos) -> Result<i32, BlockListError> {
    pack_relative(pos, relativize(pos, offset, chunk))
}

/// Inverse of the packing step: returns the window-relative `(relX, relY, relZ)`.
pub fn unpack_compact(packed: i32) -> BlockPos {
    let bits = packed as u32;
    BlockPos::new(
        ((bits >> X_SHIFT) & XZ_MASK) as i32,
        ((bits >> Y_SHIFT) & Y_MASK) as i32 + WINDOW_Y_MIN,
        (bits & XZ_MASK) as i32,
    )
}

impl BlockList {
    /// Builds the interchange record for this list.
    ///
    /// Fails on the first position outside the window; nothing is skipped.
    pub fn to_record(&self, offset: BlockPos, chunk: ChunkPos) -> Result<BlockListRecord, BlockListError> {
        let positions = self
            .positions()
            .map(|pos| pack_compact(pos, offset, chunk))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(state = %self.state(), %chunk, "record export failed: {e}"))?;

        let state = self.state().to_string();
        Ok(BlockListRecord {
            kind: state.clone(),
            state,
            force: self.rule().map(|r| r.force),
            overridden_block: self.rule().map(|r| r.overridden_blocks.clone()),
            tag: self.tag().map(|t| t.to_string()),
            positions,
        })
    }

    /// Writes this list's record to `path` as compact JSON.
    pub fn write_json(&self, path: &Path, offset: BlockPos, chunk: ChunkPos) -> Result<(), BlockListError> {
        let record = self.to_record(offset, chunk)?;
        write_records(path, &record, false)
    }
}

/// Serializes `value` as JSON into a freshly created file at `path`.
///
/// Errors are returned, never swallowed; the caller decides whether to retry.
pub fn write_records<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<(), BlockListError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), "wrote block records");
    Ok(())
}
