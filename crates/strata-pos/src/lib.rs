//! Block coordinates, chunk columns, and the 64-bit packed position codec.
//!
//! Positions live in three forms:
//!
//! 1. **[`BlockPos`]**: an unpacked signed `(x, y, z)` triple of `i32`.
//! 2. **[`PackedPos`]**: the same triple packed into one `u64` (21 bits per axis).
//! 3. **[`ChunkPos`]**: a 16×16 column index on the X/Z plane.
//!
//! ```rust
//! use strata_pos::{BlockPos, ChunkPos, PackedPos};
//!
//! let pos = BlockPos::new(-37, 64, 1_000);
//! let packed = pos.pack();
//! assert_eq!(packed.decode(), pos);
//! assert_eq!(ChunkPos::containing(pos), ChunkPos::new(-3, 62));
//! ```

mod packed;

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

pub use packed::{AXIS_BITS, Axis, MAX_COORD, MIN_COORD, PackedPos, PosError};

/// Side length of a chunk column in blocks.
pub const CHUNK_WIDTH: i32 = 16;

/// Unpacked integer block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by `(dx, dy, dz)`.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Like [`offset`](Self::offset), but `None` if any axis leaves `i32`.
    pub fn checked_offset(self, dx: i64, dy: i64, dz: i64) -> Option<Self> {
        let axis = |base: i32, d: i64| i32::try_from(i64::from(base) + d).ok();
        Some(Self::new(axis(self.x, dx)?, axis(self.y, dy)?, axis(self.z, dz)?))
    }

    /// Packs this position, truncating each axis to 21 bits.
    ///
    /// See [`PackedPos::encode`]. Use [`BlockPos::try_pack`] when values outside
    /// [`MIN_COORD`]`..=`[`MAX_COORD`] must be rejected.
    pub const fn pack(self) -> PackedPos {
        PackedPos::encode(self.x, self.y, self.z)
    }

    /// Packs this position, failing if any axis is outside the codec domain.
    pub fn try_pack(self) -> Result<PackedPos, PosError> {
        PackedPos::try_encode(self.x, self.y, self.z)
    }

    /// Squared Euclidean distance to `other`, widened to avoid overflow.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }
}

impl Add for BlockPos {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<PackedPos> for BlockPos {
    fn from(packed: PackedPos) -> Self {
        packed.decode()
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Index of a 16-wide chunk column on the X/Z plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk column that contains `pos`.
    ///
    /// Uses arithmetic shift so that `x = -1` lands in chunk `-1`, not `0`.
    pub const fn containing(pos: BlockPos) -> Self {
        Self::new(pos.x >> 4, pos.z >> 4)
    }

    /// Smallest block X coordinate inside this chunk.
    ///
    /// Widened to `i64`: chunk indexes past `i32::MAX / 16` have no `i32`
    /// block coordinate.
    pub const fn min_block_x(self) -> i64 {
        self.x as i64 * CHUNK_WIDTH as i64
    }

    /// Smallest block Z coordinate inside this chunk.
    pub const fn min_block_z(self) -> i64 {
        self.z as i64 * CHUNK_WIDTH as i64
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
