//! Connected-region matching and clear resolution

use crate::grid::{Cell, Grid};
use std::collections::HashSet;

/// Regions of at least this many cells clear
pub const MATCH_THRESHOLD: usize = 3;

/// One maximal 4-connected blob of same-colored cells
#[derive(Debug, Clone)]
pub struct Region {
    pub color: u8,
    cells: HashSet<(usize, usize)>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().copied()
    }
}

/// What a resolution pass removed from the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub regions: u32,
    pub cells: u32,
}

/// Collect the maximal 4-connected region of cells sharing the seed's
/// color. Stack-based flood fill; the visited set doubles as the result.
/// Seeding an empty or out-of-bounds cell yields an empty region.
pub fn find_region(grid: &Grid, x: usize, y: usize) -> Region {
    let Some(Cell::Filled(color)) = grid.get(x as i32, y as i32) else {
        return Region {
            color: 0,
            cells: HashSet::new(),
        };
    };

    let mut cells = HashSet::new();
    let mut stack = vec![(x, y)];
    cells.insert((x, y));

    while let Some((cx, cy)) = stack.pop() {
        for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if grid.get(nx, ny) == Some(Cell::Filled(color)) {
                let pos = (nx as usize, ny as usize);
                if cells.insert(pos) {
                    stack.push(pos);
                }
            }
        }
    }

    Region { color, cells }
}

/// Clear every region meeting the threshold, settling after each clear.
///
/// Scans row-major; a clear plus compaction invalidates earlier positions,
/// so the scan restarts from the top until a full pass finds nothing.
/// Idempotent once stable. The caller scores the outcome.
pub fn clear_matches(grid: &mut Grid) -> ClearOutcome {
    let mut outcome = ClearOutcome::default();

    'rescan: loop {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let Some(cell) = grid.get(x as i32, y as i32) else {
                    continue;
                };
                if cell.is_empty() {
                    continue;
                }
                let region = find_region(grid, x, y);
                if region.len() < MATCH_THRESHOLD {
                    continue;
                }
                tracing::trace!(color = region.color, cells = region.len(), "clearing region");
                for (cx, cy) in region.iter() {
                    grid.set(cx as i32, cy as i32, Cell::Empty);
                }
                outcome.regions += 1;
                outcome.cells += region.len() as u32;
                grid.settle();
                continue 'rescan;
            }
        }
        return outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&[u8]]) -> Grid {
        let mut grid = Grid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    grid.set(x as i32, y as i32, Cell::Filled(v));
                }
            }
        }
        grid
    }

    #[test]
    fn test_isolated_cell_is_region_of_one() {
        let grid = grid_from(&[&[0, 0, 0], &[0, 4, 0], &[0, 0, 0]]);
        let region = find_region(&grid, 1, 1);
        assert_eq!(region.len(), 1);
        assert_eq!(region.color, 4);
        assert!(region.contains(1, 1));
    }

    #[test]
    fn test_empty_seed_yields_empty_region() {
        let grid = Grid::new(3, 3);
        assert!(find_region(&grid, 0, 0).is_empty());
    }

    #[test]
    fn test_region_size_independent_of_seed() {
        // L-shaped blob of color 2, size 4, with a distractor of color 3
        let grid = grid_from(&[
            &[2, 0, 3],
            &[2, 0, 3],
            &[2, 2, 0],
        ]);
        for &(x, y) in &[(0, 0), (0, 1), (0, 2), (1, 2)] {
            let region = find_region(&grid, x, y);
            assert_eq!(region.len(), 4, "seed ({x},{y})");
            assert_eq!(region.color, 2);
        }
        assert_eq!(find_region(&grid, 2, 0).len(), 2);
    }

    #[test]
    fn test_diagonals_do_not_connect() {
        let grid = grid_from(&[&[5, 0], &[0, 5]]);
        assert_eq!(find_region(&grid, 0, 0).len(), 1);
    }

    #[test]
    fn test_square_blob_terminates() {
        // 2x2 same-color square: every cell found exactly once
        let grid = grid_from(&[&[6, 6], &[6, 6]]);
        assert_eq!(find_region(&grid, 0, 0).len(), 4);
    }

    #[test]
    fn test_clear_qualifying_region() {
        let mut grid = grid_from(&[
            &[0, 0, 0],
            &[0, 1, 0],
            &[1, 1, 0],
        ]);
        let outcome = clear_matches(&mut grid);
        assert_eq!(outcome, ClearOutcome { regions: 1, cells: 3 });
        assert!(grid.is_empty());
    }

    #[test]
    fn test_pair_is_left_alone() {
        let mut grid = grid_from(&[
            &[0, 0, 0],
            &[0, 0, 0],
            &[1, 1, 0],
        ]);
        let outcome = clear_matches(&mut grid);
        assert_eq!(outcome, ClearOutcome::default());
        assert_eq!(grid.get(0, 2), Some(Cell::Filled(1)));
        assert_eq!(grid.get(1, 2), Some(Cell::Filled(1)));
    }

    #[test]
    fn test_clear_is_idempotent_once_stable() {
        let mut grid = grid_from(&[
            &[0, 0, 0],
            &[2, 0, 0],
            &[2, 3, 3],
        ]);
        assert_eq!(clear_matches(&mut grid), ClearOutcome::default());
        let before = grid.clone();
        assert_eq!(clear_matches(&mut grid), ClearOutcome::default());
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y), before.get(x, y));
            }
        }
    }

    #[test]
    fn test_cascade_clears_in_one_call() {
        // Clearing the row of 1s drops the two 2s onto the third one:
        // the second region only forms after compaction.
        let mut grid = grid_from(&[
            &[2, 2, 0],
            &[1, 1, 1],
            &[2, 0, 0],
        ]);
        let outcome = clear_matches(&mut grid);
        assert_eq!(outcome, ClearOutcome { regions: 2, cells: 6 });
        assert!(grid.is_empty());
    }
}
