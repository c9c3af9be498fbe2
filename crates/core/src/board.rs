//! Board module - the 10x22 playfield
//!
//! Rows `0..HIDDEN_ROWS` are the hidden spawn buffer, the rest is the visible
//! field; `y` grows downward and the floor is row `TOTAL_HEIGHT - 1`. Cells are
//! stored row-major in one fixed array, so nothing here allocates.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_WIDTH, HIDDEN_ROWS, TOTAL_HEIGHT, VISIBLE_HEIGHT};

const WIDTH: usize = BOARD_WIDTH as usize;
const ROWS: usize = TOTAL_HEIGHT as usize;
const CELLS: usize = WIDTH * ROWS;

/// Row indices reported by line detection, top to bottom
pub type RowList = ArrayVec<usize, ROWS>;

/// Visible part of the grid, row-major
pub type VisibleGrid = [[Cell; WIDTH]; VISIBLE_HEIGHT as usize];

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }

    /// Offset of (x, y) in the cell array, `None` off the grid
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < WIDTH && y < ROWS).then_some(y * WIDTH + x)
    }

    fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total rows including the hidden buffer
    pub fn height(&self) -> u8 {
        TOTAL_HEIGHT
    }

    /// Cell contents, or `None` when (x, y) is off the grid
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite one cell; false when (x, y) is off the grid
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        let Some(i) = Self::index(x, y) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// On the grid and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        self.get(x, y) == Some(None)
    }

    /// On the grid and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get(x, y).flatten().is_some()
    }

    /// Check whether a piece fits at its current position and rotation
    ///
    /// Minos above the top of the buffer (y < 0) only need to be in the
    /// horizontal range; everything else must land on an empty in-bounds cell.
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= TOTAL_HEIGHT as i8 {
                return false;
            }
            y < 0 || self.is_valid(x, y)
        })
    }

    /// Write the piece kind into every cell it covers
    ///
    /// The caller validates the position first. Minos outside the grid
    /// (including y < 0) are skipped rather than written.
    pub fn place_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
    }

    /// Every cell of row `y` is filled (false for rows off the grid)
    pub fn is_row_full(&self, y: usize) -> bool {
        y < ROWS && self.row(y).iter().all(Option::is_some)
    }

    /// Indices of all full rows, top to bottom, without modifying the board
    pub fn full_rows(&self) -> RowList {
        (0..ROWS).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Full rows as a bit set, bit `y` for row `y`
    pub fn full_row_mask(&self) -> u32 {
        self.full_rows().iter().fold(0, |mask, &y| mask | 1 << y)
    }

    /// Remove all full rows and return their indices (top to bottom)
    ///
    /// Surviving rows keep their order and settle onto the floor; the rows
    /// freed at the top come back empty.
    pub fn clear_lines(&mut self) -> RowList {
        let mut removed = RowList::new();
        // Next destination row for a surviving row, filled from the floor up.
        let mut dst = ROWS;

        for src in (0..ROWS).rev() {
            if self.is_row_full(src) {
                removed.push(src);
                continue;
            }
            dst -= 1;
            if dst != src {
                self.cells.copy_within(src * WIDTH..(src + 1) * WIDTH, dst * WIDTH);
            }
        }
        self.cells[..dst * WIDTH].fill(None);

        removed.reverse();
        removed
    }

    /// True iff any cell in the hidden buffer rows is occupied
    pub fn is_game_over(&self) -> bool {
        self.cells[..HIDDEN_ROWS as usize * WIDTH]
            .iter()
            .any(Option::is_some)
    }

    /// How many rows the piece can fall before colliding
    pub fn drop_distance(&self, piece: &Piece) -> u8 {
        let mut distance: u8 = 0;
        while self.is_valid_position(&piece.shifted(0, distance as i8 + 1)) {
            distance += 1;
        }
        distance
    }

    /// All cells, row-major, hidden buffer first
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the visible rows (hidden buffer excluded) into `out`
    pub fn write_visible(&self, out: &mut VisibleGrid) {
        for (y, out_row) in out.iter_mut().enumerate() {
            out_row.copy_from_slice(self.row(y + HIDDEN_ROWS as usize));
        }
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Fill an entire row with one kind (setup helper for tests and benches)
    pub fn fill_row(&mut self, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            self.set(x, y, Some(kind));
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells = [None; CELLS];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_covers_grid_only() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(3, 2), Some(23));
        assert_eq!(Board::index(9, 21), Some(CELLS - 1));
        for (x, y) in [(-1, 0), (0, -1), (10, 0), (0, 22)] {
            assert_eq!(Board::index(x, y), None, "({x}, {y})");
        }
    }

    #[test]
    fn test_valid_position_allows_rows_above_buffer() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::I, 3, -3);
        // Row 2 of the I mask lands at y = -1.
        assert!(board.is_valid_position(&piece));
    }

    #[test]
    fn test_place_piece_skips_negative_rows() {
        let mut board = Board::new();
        // Vertical I at column 2 covering rows -2..=1.
        let vertical = Piece {
            rotation: 1,
            ..Piece::new(PieceKind::I, 0, -2)
        };
        board.place_piece(&vertical);
        assert_eq!(board.filled_count(), 2);
        assert!(board.is_occupied(2, 0));
        assert!(board.is_occupied(2, 1));
    }

    #[test]
    fn test_write_visible_skips_hidden_rows() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::Z));
        board.set(1, HIDDEN_ROWS as i8, Some(PieceKind::T));

        let mut grid: VisibleGrid = [[None; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize];
        board.write_visible(&mut grid);
        assert_eq!(grid[0][1], Some(PieceKind::T));
        assert!(grid.iter().flatten().all(|c| *c != Some(PieceKind::Z)));
    }

    #[test]
    fn test_full_row_mask_matches_full_rows() {
        let mut board = Board::new();
        assert_eq!(board.full_row_mask(), 0);
        board.fill_row(5, PieceKind::S);
        board.fill_row(21, PieceKind::S);
        board.set(0, 20, Some(PieceKind::S));
        assert_eq!(board.full_row_mask(), 1 << 5 | 1 << 21);
    }

    #[test]
    fn test_game_over_only_from_buffer_rows() {
        let mut board = Board::new();
        board.set(4, HIDDEN_ROWS as i8, Some(PieceKind::O));
        assert!(!board.is_game_over());

        board.set(4, HIDDEN_ROWS as i8 - 1, Some(PieceKind::O));
        assert!(board.is_game_over());
    }
}
