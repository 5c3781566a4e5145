//! Plain material count, used when no network is loaded.

use super::NeuralEvaluator;
use crate::position::Position;
use crate::types::{Color, Piece, Value};

const MATERIAL: [(Piece, Value); 5] = [
    (Piece::Pawn, 100),
    (Piece::Knight, 320),
    (Piece::Bishop, 330),
    (Piece::Rook, 500),
    (Piece::Queen, 900),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialNetwork;

impl MaterialNetwork {
    /// Material balance from white's perspective.
    pub fn white_balance(pos: &Position) -> Value {
        MATERIAL
            .iter()
            .map(|&(piece, value)| {
                let white = pos.pieces_of(piece, Color::White).popcnt() as Value;
                let black = pos.pieces_of(piece, Color::Black).popcnt() as Value;
                value * (white - black)
            })
            .sum()
    }
}

impl NeuralEvaluator for MaterialNetwork {
    fn evaluate(&self, pos: &Position) -> Value {
        let eval = Self::white_balance(pos);
        if pos.turn() == Color::White {
            eval
        } else {
            -eval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_material() {
        assert_eq!(MaterialNetwork.evaluate(&Position::default()), 0);
    }

    #[test]
    fn test_side_to_move_relative() {
        // White is a knight up
        let white = Position::from_fen("4k3/8/8/8/8/8/8/3NK3 w - - 0 1").expect("valid fen");
        let black = Position::from_fen("4k3/8/8/8/8/8/8/3NK3 b - - 0 1").expect("valid fen");
        assert_eq!(MaterialNetwork.evaluate(&white), 320);
        assert_eq!(MaterialNetwork.evaluate(&black), -320);
    }
}
