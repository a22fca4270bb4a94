use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// A numbered tile, always in `1..=9`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tile(u8);

impl Tile {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Tile {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value).ok_or(GameError::InvalidTile(value))
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two tiles pair up when they are equal or add up to ten.
pub const fn is_valid_pair(a: Tile, b: Tile) -> bool {
    a.0 == b.0 || a.0 + b.0 == 10
}

/// Points awarded for removing `a` and `b`, zero when they do not pair.
pub const fn pair_points(a: Tile, b: Tile) -> Score {
    match (a.0, b.0) {
        (5, 5) => 3,
        (x, y) if x == y => 1,
        (x, y) if x + y == 10 => 2,
        _ => 0,
    }
}
