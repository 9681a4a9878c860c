//! Block coordinates and partially-known agent positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer block coordinate in the game world.
///
/// Serialises as a `[x, y, z]` array so settings and config files can
/// write `home = [10, 64, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The block directly beneath this one.
    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The block directly above this one.
    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Euclidean distance between two block coordinates.
    pub fn distance(self, other: BlockPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(p: BlockPos) -> Self {
        [p.x, p.y, p.z]
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The agent's position as last reported by the server.
///
/// Each axis stays `None` until the first position update arrives.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Position {
    /// A fully known position.
    pub fn known(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// `true` once every axis has been reported.
    pub fn is_known(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// Floor every axis onto the block grid, or `None` if any axis is
    /// still unknown.
    pub fn floor(&self) -> Option<BlockPos> {
        Some(BlockPos::new(
            self.x?.floor() as i32,
            self.y?.floor() as i32,
            self.z?.floor() as i32,
        ))
    }
}

impl From<BlockPos> for Position {
    fn from(p: BlockPos) -> Self {
        Self::known(f64::from(p.x), f64::from(p.y), f64::from(p.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rounds_towards_negative_infinity() {
        let p = Position::known(1.7, 64.0, -0.2);
        assert_eq!(p.floor(), Some(BlockPos::new(1, 64, -1)));
    }

    #[test]
    fn floor_is_none_while_any_axis_unknown() {
        let p = Position {
            x: Some(1.0),
            y: None,
            z: Some(3.0),
        };
        assert!(!p.is_known());
        assert_eq!(p.floor(), None);
        assert_eq!(Position::default().floor(), None);
    }

    #[test]
    fn block_pos_serialises_as_array() {
        let json = serde_json::to_string(&BlockPos::new(10, 64, -3)).unwrap();
        assert_eq!(json, "[10,64,-3]");
        let back: BlockPos = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(back, BlockPos::new(1, 2, 3));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = BlockPos::new(0, 0, 0);
        assert!((a.distance(BlockPos::new(3, 4, 0)) - 5.0).abs() < f64::EPSILON);
    }
}
