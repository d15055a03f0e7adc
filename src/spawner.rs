//! Random piece generation
//!
//! Both colors are drawn independently and uniformly from the palette, so
//! doubles are common.

use crate::piece::{MATRIX_SIZE, Piece};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deals out fresh two-cell pieces for one session
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
    palette_size: u8,
}

impl Spawner {
    /// Create a spawner with a random seed
    #[allow(dead_code)]
    pub fn new(palette_size: u8) -> Self {
        Self::with_seed(palette_size, rand::random())
    }

    /// Create a spawner with a fixed seed (deterministic sequence)
    pub fn with_seed(palette_size: u8, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            palette_size,
        }
    }

    /// Spawn column of the matrix origin: one left of the centered position
    pub fn spawn_x(grid_width: usize) -> i32 {
        grid_width as i32 / 2 - MATRIX_SIZE as i32 / 2 - 1
    }

    /// Deal the next piece, above the visible grid at y = -1 so the first
    /// gravity step brings its colored row onto the top row
    pub fn next(&mut self, grid_width: usize) -> Piece {
        let color_a = self.rng.gen_range(1..=self.palette_size);
        let color_b = self.rng.gen_range(1..=self.palette_size);
        Piece::new(color_a, color_b, Self::spawn_x(grid_width), -1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn test_colors_stay_in_palette() {
        let mut spawner = Spawner::new(7);
        for _ in 0..100 {
            let piece = spawner.next(10);
            for (_, _, color) in piece.filled_cells() {
                assert!((1..=7).contains(&color));
            }
        }
    }

    #[test]
    fn test_template_and_position() {
        let mut spawner = Spawner::with_seed(4, 1);
        let piece = spawner.next(10);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, -1);
        assert!(piece.cell(1, 1).is_filled());
        assert!(piece.cell(2, 1).is_filled());
        let filled = piece.filled_cells().count();
        assert_eq!(filled, 2);
        assert_eq!(piece.cell(0, 0), Cell::Empty);
        assert_eq!(piece.cell(1, 0), Cell::Empty);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Spawner::with_seed(7, 42);
        let mut b = Spawner::with_seed(7, 42);
        for _ in 0..20 {
            assert_eq!(a.next(10), b.next(10));
        }
    }
}
