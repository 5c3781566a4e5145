//! Read-only position view used by the move codec, SEE and evaluation.
//!
//! Wraps a `chess::Board` and caches what the board does not report
//! directly: pinned pieces for both colors and the en-passant target square.

use crate::error::PositionError;
use crate::types::{BitBoard, Board, Color, File, Hash, Piece, Square, EMPTY};
use chess::{between, get_bishop_rays, get_rook_rays};
use std::fmt;
use std::str::FromStr;

/// Castling wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

#[derive(Clone, Copy)]
pub struct Position {
    board: Board,
    /// Absolutely pinned pieces, indexed by the color of the pinned piece
    pinned: [BitBoard; 2],
}

impl Position {
    pub fn new(board: Board) -> Self {
        Self {
            pinned: [
                pinned_pieces(&board, Color::White),
                pinned_pieces(&board, Color::Black),
            ],
            board,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Board::from_str(fen)
            .map(Self::new)
            .map_err(|e| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{:?}", e),
            })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.board.side_to_move()
    }

    #[inline]
    pub fn hash(&self) -> Hash {
        self.board.get_hash()
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board.piece_on(sq)
    }

    #[inline]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.board.color_on(sq)
    }

    /// Pieces of one kind, both colors.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> BitBoard {
        *self.board.pieces(piece)
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        *self.board.combined()
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> BitBoard {
        *self.board.color_combined(color)
    }

    #[inline]
    pub fn king(&self, color: Color) -> Square {
        self.board.king_square(color)
    }

    #[inline]
    pub fn pinned(&self, color: Color) -> BitBoard {
        self.pinned[color.to_index()]
    }

    /// Square a pawn lands on when capturing en passant.
    ///
    /// The board stores the square of the pawn that just double-pushed, and
    /// only when a capture is actually available.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.board
            .en_passant()
            .map(|pawn| pawn.uforward(self.board.side_to_move()))
    }

    #[inline]
    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.board.castle_rights(color).has_kingside()
    }

    #[inline]
    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.board.castle_rights(color).has_queenside()
    }

    #[inline]
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.can_castle_kingside(color),
            CastleSide::Queenside => self.can_castle_queenside(color),
        }
    }

    /// Square the king lands on when castling to `side`.
    #[inline]
    pub fn castle_square(&self, color: Color, side: CastleSide) -> Square {
        let file = match side {
            CastleSide::Kingside => File::G,
            CastleSide::Queenside => File::C,
        };
        Square::make_square(color.to_my_backrank(), file)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.board)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl From<Board> for Position {
    fn from(board: Board) -> Self {
        Self::new(board)
    }
}

/// Pieces of `color` that stand alone between their king and an enemy slider.
fn pinned_pieces(board: &Board, color: Color) -> BitBoard {
    let king = board.king_square(color);
    let ours = *board.color_combined(color);
    let theirs = *board.color_combined(!color);
    let queens = *board.pieces(Piece::Queen);
    let diagonal = *board.pieces(Piece::Bishop) | queens;
    let orthogonal = *board.pieces(Piece::Rook) | queens;

    let pinners =
        ((get_bishop_rays(king) & diagonal) | (get_rook_rays(king) & orthogonal)) & theirs;

    let mut pinned = EMPTY;
    for pinner in pinners {
        let blockers = between(king, pinner) & *board.combined();
        if blockers.popcnt() == 1 && (blockers & ours) != EMPTY {
            pinned |= blockers;
        }
    }
    pinned
}
