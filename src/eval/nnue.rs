//! HalfKP network via `nnue-rs`.
//!
//! Positions are evaluated from scratch: a fresh accumulator is built from
//! the board every call. Incremental updates belong to the search, which
//! knows the move sequence.

use super::NeuralEvaluator;
use crate::error::NetworkError;
use crate::position::Position;
use crate::types::{Color, Piece, Square, Value};
use binread::BinRead;
use nnue::stockfish::halfkp::{scale_nn_to_centipawns, SfHalfKpFullModel};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Non-king pieces; in HalfKP the kings index the features instead.
const FEATURE_PIECES: [Piece; 5] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
];

#[inline]
fn nnue_square(sq: Square) -> nnue::Square {
    // Both crates use A1=0, H8=63 ordering
    nnue::Square::from_index(sq.to_index())
}

#[inline]
fn nnue_piece(piece: Piece) -> nnue::Piece {
    match piece {
        Piece::Pawn => nnue::Piece::Pawn,
        Piece::Knight => nnue::Piece::Knight,
        Piece::Bishop => nnue::Piece::Bishop,
        Piece::Rook => nnue::Piece::Rook,
        Piece::Queen => nnue::Piece::Queen,
        Piece::King => nnue::Piece::King,
    }
}

#[inline]
fn nnue_color(color: Color) -> nnue::Color {
    match color {
        Color::White => nnue::Color::White,
        Color::Black => nnue::Color::Black,
    }
}

/// A loaded Stockfish HalfKP network. Clones share the weights.
#[derive(Clone)]
pub struct NnueNetwork {
    model: Arc<SfHalfKpFullModel>,
}

impl NnueNetwork {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let network = Self::from_reader(&mut reader)?;
        info!(path = %path.display(), desc = %network.description(), "NNUE model loaded");
        Ok(network)
    }

    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, NetworkError> {
        let model = SfHalfKpFullModel::read(reader)?;
        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// Description string embedded in the network file.
    pub fn description(&self) -> &str {
        &self.model.desc
    }
}

impl fmt::Debug for NnueNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NnueNetwork")
            .field("desc", &self.description())
            .finish()
    }
}

impl NeuralEvaluator for NnueNetwork {
    fn evaluate(&self, pos: &Position) -> Value {
        let model = &self.model.model;
        let mut state = model.new_state(
            nnue_square(pos.king(Color::White)),
            nnue_square(pos.king(Color::Black)),
        );

        for piece in FEATURE_PIECES {
            for color in [Color::White, Color::Black] {
                for sq in pos.pieces_of(piece, color) {
                    let sq = nnue_square(sq);
                    let (piece, color) = (nnue_piece(piece), nnue_color(color));
                    state.add(nnue::Color::White, piece, color, sq);
                    state.add(nnue::Color::Black, piece, color, sq);
                }
            }
        }

        let output = state.activate(nnue_color(pos.turn()));
        scale_nn_to_centipawns(output[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_conversions() {
        assert_eq!(nnue_square(Square::A1), nnue::Square::A1);
        assert_eq!(nnue_square(Square::E4), nnue::Square::E4);
        assert_eq!(nnue_square(Square::H8), nnue::Square::H8);
        assert_eq!(nnue_piece(Piece::Knight), nnue::Piece::Knight);
        assert_eq!(nnue_color(Color::Black), nnue::Color::Black);
    }

    #[test]
    fn test_missing_file() {
        let err = NnueNetwork::load("/nonexistent/model.nnue").unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)));
    }

    #[test]
    fn test_truncated_network() {
        let mut reader = Cursor::new(vec![0u8; 16]);
        let err = NnueNetwork::from_reader(&mut reader).unwrap_err();
        assert!(matches!(err, NetworkError::Format(_)));
    }
}
