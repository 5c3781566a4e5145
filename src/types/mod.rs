//! Core types for the engine core.
//!
//! Board, square and bitboard types come from the `chess` crate and are
//! re-exported here as the canonical source. Engine-specific types
//! (`Move`, `Score`, `Depth`) are defined locally.

mod chess_move;
mod depth;
mod score;

pub use chess_move::{Move, MoveType};
pub use depth::Depth;
pub use score::{Score, SCORE_MATE};

pub use chess::{
    BitBoard, Board, ChessMove, Color, File, MoveGen, Piece, Rank, Square, ALL_SQUARES, EMPTY,
};

/// Zobrist hash type (key for hash tables)
pub type Hash = u64;

/// Centipawn value type
pub type Value = i32;

/// Piece kinds in least-to-most valuable order
pub const PIECE_ORDER: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Build a square from zero-based rank and file, if both are on the board.
#[inline]
pub fn square_at(rank: usize, file: usize) -> Option<Square> {
    (rank < 8 && file < 8).then(|| ALL_SQUARES[rank * 8 + file])
}
