//! Coordinate translation and hit-testing over a level snapshot
//!
//! Pure functions: nothing here mutates the level, but results are only
//! valid for the snapshot queried - changing scale or an enabled flag
//! invalidates earlier answers.

use uuid::Uuid;

use crate::Level;

/// Nominal world-unit footprint width used to hit-test a thing. The core has
/// no image pipeline; real sprite extents belong to the rendering layer.
pub const THING_WIDTH: i32 = 50;
/// Nominal world-unit footprint height; things stand on their y baseline.
pub const THING_HEIGHT: i32 = 80;

/// A pixel position resolved to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHit {
    pub index: usize,
    /// Position relative to the block's own origin
    pub local_x: i32,
}

/// A pixel position resolved to a thing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThingHit {
    pub block: usize,
    pub thing: Uuid,
}

/// World x where an enabled block begins: the summed lengths of the enabled
/// blocks before it. `None` for a disabled or out-of-range block - disabled
/// blocks have no place on the world axis.
pub fn block_world_start(level: &Level, index: usize) -> Option<i32> {
    let block = level.block(index)?;
    if !block.enabled {
        return None;
    }
    Some(
        level.blocks()[..index]
            .iter()
            .filter(|b| b.enabled)
            .map(|b| b.length())
            .sum(),
    )
}

/// Translate a block-local x to world space
pub fn world_x(level: &Level, block_index: usize, local_x: i32) -> Option<i32> {
    block_world_start(level, block_index).map(|start| start + local_x)
}

/// World units to pixels at the given scale
pub fn world_to_pixel(world: i32, scale: f64) -> i32 {
    (world as f64 * scale).round() as i32
}

/// Pixels back to world units; callers guarantee a positive scale
pub fn pixel_to_world(pixel: i32, scale: f64) -> i32 {
    (pixel as f64 / scale).round() as i32
}

/// Which enabled block is under this pixel x?
///
/// Blocks occupy half-open `[start, start + length)` ranges, so a position
/// exactly on a boundary belongs to the block starting there. Positions past
/// the last enabled block miss - a miss is a normal outcome, not an error.
pub fn block_at_pixel(level: &Level, pixel_x: i32) -> Option<BlockHit> {
    let target = pixel_to_world(pixel_x, level.scale());
    let mut accum = 0;
    for (index, block) in level.blocks().iter().enumerate() {
        if !block.enabled {
            continue;
        }
        if target >= accum && target < accum + block.length() {
            return Some(BlockHit {
                index,
                local_x: target - accum,
            });
        }
        accum += block.length();
    }
    None
}

/// Which thing is under this pixel position?
///
/// Resolves the block first, then takes the first thing in the block's child
/// order whose footprint contains the point - list order is the only
/// z-ordering there is.
pub fn thing_at_pixel(level: &Level, pixel_x: i32, pixel_y: i32) -> Option<ThingHit> {
    let hit = block_at_pixel(level, pixel_x)?;
    let world_y = pixel_to_world(pixel_y, level.scale());
    let block = level.block(hit.index)?;
    block
        .things()
        .iter()
        .find(|thing| {
            let half = THING_WIDTH / 2;
            hit.local_x >= thing.x - half
                && hit.local_x < thing.x + half
                && world_y > thing.y - THING_HEIGHT
                && world_y <= thing.y
        })
        .map(|thing| ThingHit {
            block: hit.index,
            thing: thing.id,
        })
}
