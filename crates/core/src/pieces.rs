//! Pieces module - Tetromino catalog and classic rotation
//!
//! Shapes use Nintendo-style orientations and are stored as precomputed mino
//! offset tables inside a 3x3 (T, S, Z, J, L) or 4x4 (I, O) bounding box.
//! There is no kick table: a rotation that does not fit is rejected unless the
//! caller opts into [`RotationPolicy::Nudge`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, HIDDEN_ROWS};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Static catalog data for one piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: PieceKind,
    /// Display color as RGB
    pub color: (u8, u8, u8),
    /// Side length of the bounding box the masks live in
    pub box_size: u8,
    /// Rotation masks, clockwise order starting at the spawn orientation
    pub rotations: &'static [PieceShape],
    /// Origin at spawn, relative to the first visible row
    pub spawn_offset: (i8, i8),
}

const I_ROTATIONS: [PieceShape; 2] = [
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];

const O_ROTATIONS: [PieceShape; 1] = [[(1, 1), (2, 1), (1, 2), (2, 2)]];

// Spawns flat side up with the stem pointing down.
const T_ROTATIONS: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
];

const S_ROTATIONS: [PieceShape; 2] = [
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
];

const Z_ROTATIONS: [PieceShape; 2] = [
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
];

const J_ROTATIONS: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
];

const L_ROTATIONS: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
];

/// Catalog indexed by [`PieceKind::index`]
static CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        kind: PieceKind::I,
        color: (0, 240, 240),
        box_size: 4,
        rotations: &I_ROTATIONS,
        spawn_offset: (3, -2),
    },
    CatalogEntry {
        kind: PieceKind::O,
        color: (240, 240, 0),
        box_size: 4,
        rotations: &O_ROTATIONS,
        spawn_offset: (3, -1),
    },
    CatalogEntry {
        kind: PieceKind::T,
        color: (160, 0, 240),
        box_size: 3,
        rotations: &T_ROTATIONS,
        spawn_offset: (4, -1),
    },
    CatalogEntry {
        kind: PieceKind::S,
        color: (0, 240, 0),
        box_size: 3,
        rotations: &S_ROTATIONS,
        spawn_offset: (4, -1),
    },
    CatalogEntry {
        kind: PieceKind::Z,
        color: (240, 0, 0),
        box_size: 3,
        rotations: &Z_ROTATIONS,
        spawn_offset: (4, -1),
    },
    CatalogEntry {
        kind: PieceKind::J,
        color: (0, 0, 240),
        box_size: 3,
        rotations: &J_ROTATIONS,
        spawn_offset: (4, -1),
    },
    CatalogEntry {
        kind: PieceKind::L,
        color: (240, 160, 0),
        box_size: 3,
        rotations: &L_ROTATIONS,
        spawn_offset: (4, -1),
    },
];

/// Look up the catalog entry for a piece kind
pub fn entry(kind: PieceKind) -> &'static CatalogEntry {
    &CATALOG[kind.index()]
}

/// Number of distinct rotation states (1 for O, 2 for I/S/Z, 4 for T/J/L)
pub fn rotation_count(kind: PieceKind) -> u8 {
    entry(kind).rotations.len() as u8
}

/// Get the shape (mino offsets) for a piece kind and rotation index
///
/// The index wraps modulo the kind's rotation count.
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    let rotations = entry(kind).rotations;
    rotations[rotation as usize % rotations.len()]
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at an explicit origin in spawn orientation
    pub fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation: 0,
            x,
            y,
        }
    }

    /// Create a piece at its catalog spawn position (board coordinates)
    pub fn spawn(kind: PieceKind) -> Self {
        let (dx, dy) = entry(kind).spawn_offset;
        Self::new(kind, dx, HIDDEN_ROWS as i8 + dy)
    }

    /// Mino offsets for the current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Lowest board row the piece occupies
    pub fn lowest_row(&self) -> i8 {
        self.cells().iter().map(|&(_, y)| y).max().unwrap_or(self.y)
    }
}

/// Select the next (clockwise) or previous rotation state
///
/// Does not check placement; the engine validates the result.
pub fn rotate_piece(piece: &Piece, clockwise: bool) -> Piece {
    let count = rotation_count(piece.kind);
    let rotation = if clockwise {
        (piece.rotation + 1) % count
    } else {
        (piece.rotation + count - 1) % count
    };
    Piece { rotation, ..*piece }
}

/// How a blocked rotation is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RotationPolicy {
    /// Rotation is rejected whenever the target orientation collides
    #[default]
    Classic,
    /// Also tries the target orientation one column left or right
    Nudge,
}

impl RotationPolicy {
    /// Origin offsets tried in order
    pub fn offsets(&self) -> &'static [(i8, i8)] {
        match self {
            RotationPolicy::Classic => &[(0, 0)],
            RotationPolicy::Nudge => &[(0, 0), (-1, 0), (1, 0)],
        }
    }
}

/// Try to rotate a piece under the given policy
///
/// Returns the rotated (and possibly nudged) piece, or `None` if every
/// candidate collides.
pub fn try_rotate(
    piece: &Piece,
    clockwise: bool,
    policy: RotationPolicy,
    is_valid: impl Fn(&Piece) -> bool,
) -> Option<Piece> {
    let rotated = rotate_piece(piece, clockwise);
    if rotated.rotation == piece.rotation {
        // Single-state pieces have nothing to rotate into.
        return None;
    }

    policy
        .offsets()
        .iter()
        .map(|&(dx, dy)| rotated.shifted(dx, dy))
        .find(|candidate| is_valid(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        assert_eq!(rotation_count(PieceKind::O), 1);
        assert_eq!(rotation_count(PieceKind::I), 2);
        assert_eq!(rotation_count(PieceKind::S), 2);
        assert_eq!(rotation_count(PieceKind::Z), 2);
        assert_eq!(rotation_count(PieceKind::T), 4);
        assert_eq!(rotation_count(PieceKind::J), 4);
        assert_eq!(rotation_count(PieceKind::L), 4);
    }

    #[test]
    fn test_masks_fit_their_box() {
        for kind in PieceKind::ALL {
            let e = entry(kind);
            assert_eq!(e.kind, kind);
            for shape in e.rotations {
                for &(x, y) in shape {
                    assert!(x >= 0 && (x as u8) < e.box_size, "{kind:?} x={x}");
                    assert!(y >= 0 && (y as u8) < e.box_size, "{kind:?} y={y}");
                }
            }
        }
    }

    #[test]
    fn test_rotate_piece_wraps_both_ways() {
        let t = Piece::spawn(PieceKind::T);
        assert_eq!(rotate_piece(&t, true).rotation, 1);
        assert_eq!(rotate_piece(&t, false).rotation, 3);

        let i = Piece::spawn(PieceKind::I);
        let turned = rotate_piece(&rotate_piece(&i, true), true);
        assert_eq!(turned.rotation, 0);

        let o = Piece::spawn(PieceKind::O);
        assert_eq!(rotate_piece(&o, true).rotation, 0);
    }

    #[test]
    fn test_spawn_cells_sit_in_top_visible_rows() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            for (x, y) in piece.cells() {
                assert!((3..=6).contains(&x), "{kind:?} spawns at column {x}");
                assert!(
                    y == HIDDEN_ROWS as i8 || y == HIDDEN_ROWS as i8 + 1,
                    "{kind:?} spawns at row {y}"
                );
            }
        }
    }

    #[test]
    fn test_try_rotate_classic_rejects_without_nudge() {
        let piece = Piece::new(PieceKind::I, 0, 5);
        // Only the unshifted candidate is valid.
        let ok = try_rotate(&piece, true, RotationPolicy::Classic, |p| p.x == 0);
        assert_eq!(ok.map(|p| p.rotation), Some(1));

        let blocked = try_rotate(&piece, true, RotationPolicy::Classic, |p| p.x == 1);
        assert_eq!(blocked, None);

        let nudged = try_rotate(&piece, true, RotationPolicy::Nudge, |p| p.x == 1);
        assert_eq!(nudged.map(|p| (p.x, p.rotation)), Some((1, 1)));
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let piece = Piece::spawn(PieceKind::O);
        assert_eq!(try_rotate(&piece, true, RotationPolicy::Nudge, |_| true), None);
    }
}
