//! Voxel spheres.

use strata_pos::BlockPos;

use crate::filling::Filling;

/// Largest accepted radius; matches the span of a packed position axis.
pub const MAX_RADIUS: u32 = 1 << 20;

/// A block sphere around `center`.
///
/// A block belongs to the sphere when its squared distance to the center is
/// at most `r² + r`, which rounds the silhouette the same way as testing
/// against `(r + 0.5)²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    center: BlockPos,
    radius: u32,
    filling: Filling,
}

impl Sphere {
    /// A solid sphere. `radius` is clamped to [`MAX_RADIUS`].
    pub fn new(center: BlockPos, radius: u32) -> Self {
        Self {
            center,
            radius: radius.min(MAX_RADIUS),
            filling: Filling::Full,
        }
    }

    pub fn with_filling(mut self, filling: Filling) -> Self {
        self.filling = filling;
        self
    }

    pub fn center(&self) -> BlockPos {
        self.center
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn filling(&self) -> Filling {
        self.filling
    }

    fn limit(&self) -> i64 {
        let r = i64::from(self.radius);
        r * r + r
    }

    fn inside(&self, dx: i64, dy: i64, dz: i64) -> bool {
        dx * dx + dy * dy + dz * dz <= self.limit()
    }

    /// Inside, with at least one face neighbour outside.
    fn on_surface(&self, dx: i64, dy: i64, dz: i64) -> bool {
        self.inside(dx, dy, dz)
            && [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)]
                .iter()
                .any(|&(ox, oy, oz)| !self.inside(dx + ox, dy + oy, dz + oz))
    }

    /// Returns `true` if `pos` is one of the generated blocks.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let dx = i64::from(pos.x) - i64::from(self.center.x);
        let dy = i64::from(pos.y) - i64::from(self.center.y);
        let dz = i64::from(pos.z) - i64::from(self.center.z);
        if !self.inside(dx, dy, dz) {
            return false;
        }
        let inner = f64::from(self.radius) * (1.0 - f64::from(self.filling.fill_ratio()));
        let d2 = (dx * dx + dy * dy + dz * dz) as f64;
        d2 >= inner * inner || self.on_surface(dx, dy, dz)
    }

    /// All blocks, ordered by y, then z, then x.
    ///
    /// Blocks that would lie outside the `i32` coordinate range are left out.
    pub fn positions(&self) -> Vec<BlockPos> {
        let r = i64::from(self.radius);
        let mut out = Vec::new();
        for y in -r..=r {
            for z in -r..=r {
                for x in -r..=r {
                    let Some(pos) = self.center.checked_offset(x, y, z) else {
                        continue;
                    };
                    if self.contains(pos) {
                        out.push(pos);
                    }
                }
            }
        }
        out
    }
}
