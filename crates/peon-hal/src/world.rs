//! Generic [`World`] trait – the block map and path planner.

use std::time::Duration;

use peon_types::BlockPos;

/// Lowest block height a world can contain; downward scans stop here.
pub const MIN_BUILD_HEIGHT: i32 = -64;

/// Read access to the loaded world around the agent.
pub trait World: Send + Sync {
    /// `Some(true)` if the block at `pos` is solid, `None` when the chunk
    /// is not loaded or `pos` is outside the build height.
    fn is_solid_block(&self, pos: BlockPos) -> Option<bool>;

    /// Nearest solid block strictly below `pos`, scanning downwards.
    fn next_solid_block_below(&self, pos: BlockPos) -> Option<BlockPos> {
        let mut cursor = pos.below();
        while cursor.y >= MIN_BUILD_HEIGHT {
            if self.is_solid_block(cursor)? {
                return Some(cursor);
            }
            cursor = cursor.below();
        }
        None
    }

    /// Plan a path from `from` to within `space` blocks of `to`.
    ///
    /// The returned path excludes `from` and ends at its last waypoint.
    /// `None` if no path was found within `timeout`.
    fn find_path(
        &self,
        from: BlockPos,
        to: BlockPos,
        space: u32,
        timeout: Duration,
    ) -> Option<Vec<BlockPos>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat world: solid at or below `floor`, unknown below zero.
    struct Flat {
        floor: i32,
    }

    impl World for Flat {
        fn is_solid_block(&self, pos: BlockPos) -> Option<bool> {
            (pos.y >= 0).then_some(pos.y <= self.floor)
        }

        fn find_path(&self, _: BlockPos, _: BlockPos, _: u32, _: Duration) -> Option<Vec<BlockPos>> {
            None
        }
    }

    #[test]
    fn scan_finds_first_solid_block_below() {
        let world = Flat { floor: 60 };
        assert_eq!(
            world.next_solid_block_below(BlockPos::new(0, 70, 0)),
            Some(BlockPos::new(0, 60, 0))
        );
    }

    #[test]
    fn scan_is_strictly_below() {
        let world = Flat { floor: 60 };
        assert_eq!(
            world.next_solid_block_below(BlockPos::new(3, 60, 3)),
            Some(BlockPos::new(3, 59, 3))
        );
    }

    /// Reports every block as known air.
    struct Void;

    impl World for Void {
        fn is_solid_block(&self, _: BlockPos) -> Option<bool> {
            Some(false)
        }

        fn find_path(&self, _: BlockPos, _: BlockPos, _: u32, _: Duration) -> Option<Vec<BlockPos>> {
            None
        }
    }

    #[test]
    fn scan_gives_up_at_min_build_height() {
        assert_eq!(Void.next_solid_block_below(BlockPos::new(0, 64, 0)), None);
        assert_eq!(Void.next_solid_block_below(BlockPos::new(0, MIN_BUILD_HEIGHT, 0)), None);
    }

    #[test]
    fn scan_stops_at_unknown_blocks() {
        let world = Flat { floor: -10 };
        assert_eq!(world.next_solid_block_below(BlockPos::new(0, 5, 0)), None);
    }
}
