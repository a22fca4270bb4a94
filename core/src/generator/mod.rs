use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;
pub use sequence::*;

mod sequence;

/// Tiles in a freshly generated grid.
pub const STARTING_TILES: usize = 27;

/// Builds the starting grid for `mode`.
pub fn generate<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Grid {
    use Mode::*;

    let tiles = match mode {
        Classic => classic_sequence(),
        Random => {
            let mut tiles = classic_sequence();
            tiles.shuffle(rng);
            tiles
        }
        Chaotic => random_tiles(STARTING_TILES, rng),
    };
    log::debug!("Generated {} grid with {} tiles", mode, tiles.len());
    Grid::from_tiles(tiles)
}

/// Tiles appended by Add Numbers, given the tiles still on the board.
///
/// The result is not yet truncated to the remaining grid capacity.
pub fn refill_tiles<R: Rng + ?Sized>(mode: Mode, present: Vec<Tile>, rng: &mut R) -> Vec<Tile> {
    use Mode::*;

    match mode {
        Classic => present,
        Random => {
            let mut tiles = present;
            tiles.shuffle(rng);
            tiles
        }
        Chaotic => random_tiles(present.len(), rng),
    }
}
