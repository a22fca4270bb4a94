use alloc::vec::Vec;
use rand::Rng;

use crate::*;

/// 1 through 9, then the non-zero digits of 11 through 19.
pub fn classic_sequence() -> Vec<Tile> {
    (1..=9u8)
        .chain((11..=19u8).flat_map(|n| [n / 10, n % 10]))
        .filter_map(Tile::new)
        .collect()
}

/// `count` tiles drawn independently and uniformly from 1..=9.
pub fn random_tiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Tile> {
    (0..count)
        .filter_map(|_| Tile::new(rng.random_range(Tile::MIN..=Tile::MAX)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn classic_sequence_has_twenty_seven_tiles() {
        let tiles = classic_sequence();

        assert_eq!(tiles.len(), 27);
        assert_eq!(tiles.iter().filter(|tile| tile.value() == 1).count(), 11);
        assert_eq!(tiles.iter().filter(|tile| tile.value() == 5).count(), 2);
    }

    #[test]
    fn random_tiles_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(9);
        let tiles = random_tiles(500, &mut rng);

        assert_eq!(tiles.len(), 500);
        for value in Tile::MIN..=Tile::MAX {
            assert!(tiles.iter().any(|tile| tile.value() == value));
        }
    }
}
