//! Compact 16-bit move.
//!
//! Layout: from (6) | to (6) | type (2) | promotion (2).
//! The all-zero value is the null move.

use super::{ChessMove, File, Piece, Square, ALL_SQUARES};
use std::fmt;

const SQUARE_MASK: u16 = 0x3F;
const TO_SHIFT: u16 = 6;
const TYPE_SHIFT: u16 = 12;
const PROMO_SHIFT: u16 = 14;

/// How a move is carried out on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveType {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castle = 3,
}

impl MoveType {
    #[inline]
    const fn from_bits(bits: u16) -> Self {
        match bits & 0x3 {
            1 => MoveType::Promotion,
            2 => MoveType::EnPassant,
            3 => MoveType::Castle,
            _ => MoveType::Normal,
        }
    }
}

/// A chess move packed into 16 bits.
///
/// Castle moves store the king's origin in `from`. Where `to` points depends
/// on the castling notation the move was decoded under: the king's landing
/// square for standard notation, the castling rook's square otherwise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// The "no move" sentinel.
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn null() -> Self {
        Self::NULL
    }

    #[inline]
    pub fn new(from: Square, to: Square, move_type: MoveType) -> Self {
        Move(
            from.to_index() as u16
                | (to.to_index() as u16) << TO_SHIFT
                | (move_type as u16) << TYPE_SHIFT,
        )
    }

    /// Create a promotion. Pawns and kings are not promotion targets and
    /// fall back to a queen.
    #[inline]
    pub fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        let promo: u16 = match piece {
            Piece::Knight => 0,
            Piece::Bishop => 1,
            Piece::Rook => 2,
            _ => 3,
        };
        Move(Self::new(from, to, MoveType::Promotion).0 | promo << PROMO_SHIFT)
    }

    #[inline]
    pub const fn from_u16(raw: u16) -> Self {
        Move(raw)
    }

    #[inline]
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn from(self) -> Square {
        ALL_SQUARES[(self.0 & SQUARE_MASK) as usize]
    }

    #[inline]
    pub fn to(self) -> Square {
        ALL_SQUARES[((self.0 >> TO_SHIFT) & SQUARE_MASK) as usize]
    }

    #[inline]
    pub const fn move_type(self) -> MoveType {
        MoveType::from_bits(self.0 >> TYPE_SHIFT)
    }

    /// Promoted piece, for promotion moves only.
    #[inline]
    pub fn promotion_piece(self) -> Option<Piece> {
        if self.move_type() != MoveType::Promotion {
            return None;
        }
        Some(match self.0 >> PROMO_SHIFT {
            0 => Piece::Knight,
            1 => Piece::Bishop,
            2 => Piece::Rook,
            _ => Piece::Queen,
        })
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        self.move_type() == MoveType::Castle
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.move_type() == MoveType::EnPassant
    }

    /// Promotion to a rook or bishop.
    #[inline]
    pub fn is_under_promotion(self) -> bool {
        matches!(self.promotion_piece(), Some(Piece::Rook | Piece::Bishop))
    }

    /// Square the king lands on when castling, two files toward the rook.
    #[inline]
    pub fn castle_king_target(self) -> Square {
        let from = self.from();
        let file = if self.to().to_index() > from.to_index() {
            File::G
        } else {
            File::C
        };
        Square::make_square(from.get_rank(), file)
    }

    /// Convert to the `chess` crate's move. The null move has no counterpart.
    pub fn to_chess_move(self) -> Option<ChessMove> {
        if self.is_null() {
            return None;
        }
        let to = if self.is_castle() {
            self.castle_king_target()
        } else {
            self.to()
        };
        Some(ChessMove::new(self.from(), to, self.promotion_piece()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::uci::notation::encode(
            *self,
            crate::uci::CastlingNotation::Standard,
        ))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self, self.move_type())
    }
}
