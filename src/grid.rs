//! Playing field representation, collision detection and gravity

use crate::piece::Piece;

/// A cell on the grid - either empty or filled with a palette color index.
///
/// Indices run 1..=palette_size; the index-to-color mapping belongs to the
/// renderer, the engine only compares indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(u8),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The settled playing field
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Rows stored top-down: cells[y][x], row 0 is the top
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a position
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y][x])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[y][x] = cell;
        true
    }

    /// Test whether the piece overlaps settled cells or leaves the field.
    ///
    /// Bound policy: probes above the top row are open (pieces spawn above
    /// the visible grid), probes past either side or below the floor always
    /// collide. The full 3x3 matrix is scanned, not just the interior.
    pub fn collides(&self, piece: &Piece) -> bool {
        for (x, y, _) in piece.filled_cells() {
            if x < 0 || x >= self.width as i32 {
                return true;
            }
            if y >= self.height as i32 {
                return true;
            }
            if y < 0 {
                continue;
            }
            if self.cells[y as usize][x as usize].is_filled() {
                return true;
            }
        }
        false
    }

    /// Copy the piece's filled cells into the grid (cells still above the
    /// top edge are discarded)
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y, color) in piece.filled_cells() {
            self.set(x, y, Cell::Filled(color));
        }
    }

    /// Gravity compaction: swap unsupported cells down one row per pass
    /// until a full pass moves nothing. Converges in at most `height` passes.
    pub fn settle(&mut self) {
        loop {
            let mut moved = false;
            for y in 0..self.height.saturating_sub(1) {
                for x in 0..self.width {
                    if self.cells[y][x].is_filled() && self.cells[y + 1][x].is_empty() {
                        self.cells[y + 1][x] = self.cells[y][x];
                        self.cells[y][x] = Cell::Empty;
                        moved = true;
                    }
                }
            }
            if !moved {
                break;
            }
        }
    }

    /// Wipe the field (top-out reset)
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }

    /// Check if the grid is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
