//! 64-bit packed block positions.
//!
//! ## Bit Layout
//!
//! | Bits | Field |
//! |------|-------|
//! | 63 | Unused, always 0 |
//! | 42..=62 | X, 21-bit two's complement |
//! | 21..=41 | Y, 21-bit two's complement |
//! | 0..=20 | Z, 21-bit two's complement |
//!
//! Every axis covers [`MIN_COORD`]`..=`[`MAX_COORD`] (−1 048 576 to 1 048 575).
//! Inside that domain encode and decode are exact inverses.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BlockPos;

/// Bits allocated to each axis.
pub const AXIS_BITS: u32 = 21;

/// Smallest coordinate representable on any axis.
pub const MIN_COORD: i32 = -(1 << (AXIS_BITS - 1));

/// Largest coordinate representable on any axis.
pub const MAX_COORD: i32 = (1 << (AXIS_BITS - 1)) - 1;

const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;
const Z_SHIFT: u32 = 0;
const Y_SHIFT: u32 = AXIS_BITS;
const X_SHIFT: u32 = AXIS_BITS * 2;

/// One of the three coordinate axes, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Errors produced by the strict packing path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PosError {
    /// A coordinate does not fit in 21 signed bits.
    #[error("{axis} coordinate {value} outside packable range -1048576..=1048575")]
    OutOfRange {
        /// The offending axis.
        axis: Axis,
        /// The rejected value.
        value: i32,
    },
}

/// A block position packed into a single `u64`.
///
/// Two packed positions are equal iff their raw integers are equal, so the type
/// can be used directly as a hash or sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedPos(u64);

impl PackedPos {
    /// Packs `(x, y, z)`.
    ///
    /// Values outside the codec domain are silently truncated to their low
    /// 21 bits. Callers that need hard failure use [`PackedPos::try_encode`].
    pub const fn encode(x: i32, y: i32, z: i32) -> Self {
        Self(
            ((x as u64 & AXIS_MASK) << X_SHIFT)
                | ((y as u64 & AXIS_MASK) << Y_SHIFT)
                | ((z as u64 & AXIS_MASK) << Z_SHIFT),
        )
    }

    /// Packs `(x, y, z)`, rejecting any coordinate outside the codec domain.
    pub fn try_encode(x: i32, y: i32, z: i32) -> Result<Self, PosError> {
        check_axis(Axis::X, x)?;
        check_axis(Axis::Y, y)?;
        check_axis(Axis::Z, z)?;
        Ok(Self::encode(x, y, z))
    }

    /// Unpacks into a [`BlockPos`].
    pub const fn decode(self) -> BlockPos {
        BlockPos::new(self.x(), self.y(), self.z())
    }

    pub const fn x(self) -> i32 {
        extract(self.0, X_SHIFT)
    }

    pub const fn y(self) -> i32 {
        extract(self.0, Y_SHIFT)
    }

    pub const fn z(self) -> i32 {
        extract(self.0, Z_SHIFT)
    }

    /// The underlying integer.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Wraps a raw integer. No validation: bit 63 is ignored on decode.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns `true` if every axis of `pos` survives a round trip.
    pub const fn in_domain(pos: BlockPos) -> bool {
        fits(pos.x) && fits(pos.y) && fits(pos.z)
    }
}

impl From<BlockPos> for PackedPos {
    fn from(pos: BlockPos) -> Self {
        pos.pack()
    }
}

impl fmt::Display for PackedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x} {}", self.0, self.decode())
    }
}

const fn fits(value: i32) -> bool {
    value >= MIN_COORD && value <= MAX_COORD
}

fn check_axis(axis: Axis, value: i32) -> Result<(), PosError> {
    if fits(value) {
        Ok(())
    } else {
        Err(PosError::OutOfRange { axis, value })
    }
}

/// Reads one 21-bit field and sign-extends it.
const fn extract(raw: u64, shift: u32) -> i32 {
    let field = ((raw >> shift) & AXIS_MASK) as i64;
    let unused = 64 - AXIS_BITS;
    ((field << unused) >> unused) as i32
}
