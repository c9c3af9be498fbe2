//! Read-only view handed to the render collaborator
//!
//! Rows are in visible coordinates: row 0 is the top visible row, so a piece
//! still partly inside the hidden buffer reports negative `y` values.

use crate::board::{Board, VisibleGrid};
use crate::pieces::Piece;
use crate::types::{GameStatus, PieceKind, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_HEIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    /// Absolute mino positions
    pub cells: [(i8, i8); 4],
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        let offset = HIDDEN_ROWS as i8;
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y - offset,
            cells: value.cells().map(|(x, y)| (x, y - offset)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: VisibleGrid,
    pub current: Option<PieceSnapshot>,
    pub next: Option<PieceKind>,
    /// Origin row the current piece would land on (drop shadow)
    pub ghost_y: Option<i8>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub status: GameStatus,
    /// Visible rows flashing before removal
    pub flashing_rows: [bool; VISIBLE_HEIGHT as usize],
}

impl GameSnapshot {
    /// Fill in the board, current piece and shadow from live state
    pub fn capture_board(&mut self, board: &Board, current: Option<&Piece>) {
        board.write_visible(&mut self.board);
        self.current = current.map(|piece| PieceSnapshot::from(*piece));
        self.ghost_y = current
            .map(|piece| piece.y + board.drop_distance(piece) as i8 - HIDDEN_ROWS as i8);
    }

    /// Mark flashing rows from a board row mask (bit `y` for board row `y`)
    pub fn capture_flash(&mut self, mask: u32) {
        let hidden = HIDDEN_ROWS as usize;
        for (row, flashing) in self.flashing_rows.iter_mut().enumerate() {
            *flashing = mask & (1 << (row + hidden)) != 0;
        }
    }

    /// Number of filled visible cells
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize],
            current: None,
            next: None,
            ghost_y: None,
            score: 0,
            level: 0,
            lines: 0,
            status: GameStatus::Menu,
            flashing_rows: [false; VISIBLE_HEIGHT as usize],
        }
    }
}
