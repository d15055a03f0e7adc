//! Active falling piece: matrix rotation, movement, kick search

use crate::grid::{Cell, Grid};

/// Side length of the piece matrix
pub const MATRIX_SIZE: usize = 3;

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn opposite(&self) -> RotationDirection {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// The active falling piece: a 3x3 cell matrix plus its offset into grid
/// coordinates. The template has two colored cells on the center row
/// (columns 1-2); rotation carries them around the matrix center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    cells: [[Cell; MATRIX_SIZE]; MATRIX_SIZE],
    /// Grid x of the matrix origin
    pub x: i32,
    /// Grid y of the matrix origin (negative while above the visible grid)
    pub y: i32,
}

impl Piece {
    /// Build the two-cell template at the given position
    pub fn new(color_a: u8, color_b: u8, x: i32, y: i32) -> Self {
        let mut cells = [[Cell::Empty; MATRIX_SIZE]; MATRIX_SIZE];
        cells[1][1] = Cell::Filled(color_a);
        cells[1][2] = Cell::Filled(color_b);
        Self { cells, x, y }
    }

    /// Cell at matrix position (mx, my)
    #[allow(dead_code)]
    pub fn cell(&self, mx: usize, my: usize) -> Cell {
        self.cells[my][mx]
    }

    /// The filled cells in grid coordinates: (x, y, color)
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(my, row)| {
            row.iter().enumerate().filter_map(move |(mx, cell)| match cell {
                Cell::Filled(color) => Some((self.x + mx as i32, self.y + my as i32, *color)),
                Cell::Empty => None,
            })
        })
    }

    /// Rotate the matrix 90 degrees in place: transpose along the main
    /// diagonal, then reverse each row (clockwise) or the row order
    /// (counter-clockwise). Four rotations in one direction are the identity.
    pub fn rotate_matrix(&mut self, direction: RotationDirection) {
        for my in 0..MATRIX_SIZE {
            for mx in 0..my {
                let tmp = self.cells[my][mx];
                self.cells[my][mx] = self.cells[mx][my];
                self.cells[mx][my] = tmp;
            }
        }
        match direction {
            RotationDirection::Clockwise => {
                for row in &mut self.cells {
                    row.reverse();
                }
            }
            RotationDirection::CounterClockwise => {
                self.cells.reverse();
            }
        }
    }

    /// Try to rotate, kicking sideways to find a legal column.
    ///
    /// The kick offsets are cumulative +1, -2, +3, -4; the search aborts
    /// once the next offset exceeds the matrix width. A bounded local
    /// search, not an exhaustive one. On failure the rotation and position
    /// are fully rolled back; returns false.
    pub fn rotate(&mut self, direction: RotationDirection, grid: &Grid) -> bool {
        let original_x = self.x;
        self.rotate_matrix(direction);

        let mut offset: i32 = 1;
        while grid.collides(self) {
            self.x += offset;
            offset = -(offset + offset.signum());
            if offset > MATRIX_SIZE as i32 {
                self.rotate_matrix(direction.opposite());
                self.x = original_x;
                return false;
            }
        }
        true
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, grid: &Grid) -> bool {
        self.x -= 1;
        if grid.collides(self) {
            self.x += 1;
            return false;
        }
        true
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, grid: &Grid) -> bool {
        self.x += 1;
        if grid.collides(self) {
            self.x -= 1;
            return false;
        }
        true
    }

    /// Try to move down one row, returns true if successful
    pub fn move_down(&mut self, grid: &Grid) -> bool {
        self.y += 1;
        if grid.collides(self) {
            self.y -= 1;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_shape() {
        let piece = Piece::new(3, 5, 0, 0);
        assert_eq!(piece.cell(1, 1), Cell::Filled(3));
        assert_eq!(piece.cell(2, 1), Cell::Filled(5));
        let filled: Vec<_> = piece.filled_cells().collect();
        assert_eq!(filled, vec![(1, 1, 3), (2, 1, 5)]);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let original = Piece::new(1, 2, 4, 7);
        let mut piece = original.clone();
        for _ in 0..4 {
            piece.rotate_matrix(RotationDirection::Clockwise);
        }
        assert_eq!(piece, original);
        for _ in 0..4 {
            piece.rotate_matrix(RotationDirection::CounterClockwise);
        }
        assert_eq!(piece, original);
    }

    #[test]
    fn test_rotation_round_trip() {
        let original = Piece::new(4, 6, 0, 0);
        let mut piece = original.clone();
        piece.rotate_matrix(RotationDirection::Clockwise);
        piece.rotate_matrix(RotationDirection::CounterClockwise);
        assert_eq!(piece, original);
    }

    #[test]
    fn test_clockwise_moves_cells_to_column() {
        let mut piece = Piece::new(1, 2, 0, 0);
        piece.rotate_matrix(RotationDirection::Clockwise);
        // Horizontal pair becomes a vertical pair in the center column
        assert_eq!(piece.cell(1, 1), Cell::Filled(1));
        assert_eq!(piece.cell(1, 2), Cell::Filled(2));
        assert_eq!(piece.filled_cells().count(), 2);
    }

    #[test]
    fn test_move_rollback_at_wall() {
        let grid = Grid::new(10, 16);
        // Filled cells at columns 0-1; moving left would leave the field
        let mut piece = Piece::new(1, 2, -1, 5);
        assert!(!piece.move_left(&grid));
        assert_eq!(piece.x, -1);
        assert!(piece.move_right(&grid));
        assert_eq!(piece.x, 0);
    }

    #[test]
    fn test_move_down_blocked_by_floor() {
        let grid = Grid::new(5, 5);
        let mut piece = Piece::new(1, 2, 1, 3);
        assert!(!piece.move_down(&grid));
        assert_eq!(piece.y, 3);
    }

    #[test]
    fn test_rotate_kicks_off_occupied_cell() {
        let mut grid = Grid::new(10, 16);
        let mut piece = Piece::new(1, 2, 3, 5);
        piece.rotate_matrix(RotationDirection::Clockwise);
        // Vertical pair at column 4, rows 6-7. Rotating clockwise again
        // targets columns 3-4 of row 6; block column 3 so the first kick
        // (+1) has to resolve it.
        grid.set(3, 6, Cell::Filled(7));
        assert!(piece.rotate(RotationDirection::Clockwise, &grid));
        assert_eq!(piece.x, 4);
        let filled: Vec<_> = piece.filled_cells().collect();
        assert_eq!(filled, vec![(4, 6, 2), (5, 6, 1)]);
    }

    #[test]
    fn test_rotate_rolls_back_when_no_kick_fits() {
        let mut grid = Grid::new(9, 16);
        let mut piece = Piece::new(1, 2, 3, 5);
        piece.rotate_matrix(RotationDirection::Clockwise);
        let before = piece.clone();
        // Vertical pair occupies (4,6) and (4,7). Fill row 6 everywhere else:
        // no two adjacent free columns remain, so every kick offset fails.
        for x in 0..9 {
            if x != 4 {
                grid.set(x, 6, Cell::Filled(7));
            }
        }
        assert!(!piece.rotate(RotationDirection::Clockwise, &grid));
        assert_eq!(piece, before);
    }
}
