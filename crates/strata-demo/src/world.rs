//! A small layered planetoid to collect from.

use strata_blocks::{BlockState, BlockTag, MemoryWorld};
use strata_config::ShapeConfig;
use strata_pos::BlockPos;
use strata_shapes::Sphere;

/// Fills a world with the configured sphere.
///
/// The top third is grass over a dirt band, the rest is stone, and the
/// center holds a tagged chest. Returns the world and the positions of its
/// bounding box, air included, in y/z/x order.
pub(crate) fn build_world(shape: &ShapeConfig) -> (MemoryWorld, Vec<BlockPos>) {
    let [cx, cy, cz] = shape.center;
    let center = BlockPos::new(cx, cy, cz);
    let sphere = Sphere::new(center, shape.radius).with_filling(shape.filling);

    let radius = i64::from(sphere.radius());
    let grass = BlockState::new("grass_block").with_property("snowy", "false");
    let dirt = BlockState::new("dirt");
    let stone = BlockState::new("stone");

    let mut world = MemoryWorld::new();
    for pos in sphere.positions() {
        let height = i64::from(pos.y) - i64::from(cy);
        let state = if height * 3 > radius * 2 {
            &grass
        } else if height * 3 > radius {
            &dirt
        } else {
            &stone
        };
        world.set(pos, state.clone());
    }
    world.set_tagged(
        center,
        BlockState::new("chest").with_property("facing", "north"),
        BlockTag::new().with("Lock", "strata"),
    );

    let mut positions = Vec::new();
    for dy in -radius..=radius {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                positions.extend(center.checked_offset(dx, dy, dz));
            }
        }
    }
    (world, positions)
}

#[cfg(test)]
mod tests {
    use strata_blocks::BlockSource;
    use strata_shapes::Filling;

    use super::*;

    fn shape(radius: u32, filling: Filling) -> ShapeConfig {
        ShapeConfig {
            center: [8, 64, 8],
            radius,
            filling,
        }
    }

    #[test]
    fn test_bounding_box_covers_world() {
        let (world, positions) = build_world(&shape(3, Filling::Full));
        assert_eq!(positions.len(), 7 * 7 * 7);
        let occupied = positions.iter().filter(|p| world.sample(**p).is_some()).count();
        assert_eq!(occupied, world.len());
    }

    #[test]
    fn test_layers_and_chest() {
        let (world, _) = build_world(&shape(6, Filling::Full));
        let top = world.sample(BlockPos::new(8, 70, 8)).unwrap();
        assert_eq!(top.state.block_id(), "minecraft:grass_block");
        let bottom = world.sample(BlockPos::new(8, 58, 8)).unwrap();
        assert_eq!(bottom.state.block_id(), "minecraft:stone");

        let chest = world.sample(BlockPos::new(8, 64, 8)).unwrap();
        assert_eq!(chest.state.block_id(), "minecraft:chest");
        assert!(chest.tag.is_some());
    }

    #[test]
    fn test_world_at_coordinate_limit() {
        let shape = ShapeConfig {
            center: [i32::MAX - 1, 0, 0],
            radius: 2,
            filling: Filling::Full,
        };
        let (world, positions) = build_world(&shape);
        // x offsets +2 fall off the edge of the coordinate range.
        assert_eq!(positions.len(), 4 * 5 * 5);
        assert!(world.sample(BlockPos::new(i32::MAX, 0, 0)).is_some());
    }

    #[test]
    fn test_hollow_sphere_still_has_chest() {
        let (world, _) = build_world(&shape(6, Filling::Empty));
        assert!(world.sample(BlockPos::new(8, 64, 8)).is_some());
        assert!(world.sample(BlockPos::new(8, 63, 8)).is_none());
    }
}
