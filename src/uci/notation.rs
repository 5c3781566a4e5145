//! Coordinate move notation (`e2e4`, `e7e8q`, `e1g1`).
//!
//! Decoding needs the position: the text alone cannot tell a castle, an
//! en-passant capture and a plain move apart. Malformed text is not an error,
//! it decodes to the null move.

use super::CastlingNotation;
use crate::position::{CastleSide, Position};
use crate::types::{
    square_at, BitBoard, ChessMove, Color, File, Move, MoveType, Piece, Square, EMPTY,
};

const MIN_LEN: usize = 4;
const MAX_LEN: usize = 5;

/// Text of the null move.
pub const NULL_MOVE_TEXT: &str = "null";

/// King start, landing square, owner and wing of each standard castle.
const STANDARD_CASTLES: [(Square, Square, Color, CastleSide); 4] = [
    (Square::E1, Square::G1, Color::White, CastleSide::Kingside),
    (Square::E1, Square::C1, Color::White, CastleSide::Queenside),
    (Square::E8, Square::G8, Color::Black, CastleSide::Kingside),
    (Square::E8, Square::C8, Color::Black, CastleSide::Queenside),
];

#[inline]
fn parse_square(file: u8, rank: u8) -> Option<Square> {
    square_at(
        rank.wrapping_sub(b'1') as usize,
        file.wrapping_sub(b'a') as usize,
    )
}

#[inline]
fn parse_promotion(c: u8) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        b'q' => Some(Piece::Queen),
        b'r' => Some(Piece::Rook),
        b'b' => Some(Piece::Bishop),
        b'n' => Some(Piece::Knight),
        _ => None,
    }
}

#[inline]
fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        _ => 'q',
    }
}

/// Decode coordinate notation against `pos`.
pub fn decode(text: &str, pos: &Position, notation: CastlingNotation) -> Move {
    let bytes = text.as_bytes();
    if !(MIN_LEN..=MAX_LEN).contains(&bytes.len()) {
        return Move::NULL;
    }

    let (Some(from), Some(mut to)) = (
        parse_square(bytes[0], bytes[1]),
        parse_square(bytes[2], bytes[3]),
    ) else {
        return Move::NULL;
    };

    if bytes.len() == MAX_LEN {
        return match parse_promotion(bytes[4]) {
            Some(piece) => Move::promotion(from, to, piece),
            None => Move::NULL,
        };
    }

    let move_type = match pos.piece_on(from) {
        Some(Piece::King) => match notation {
            CastlingNotation::Standard => {
                let castle = STANDARD_CASTLES.iter().find(|&&(start, land, color, side)| {
                    start == from && land == to && pos.can_castle(color, side)
                });
                match castle {
                    Some(&(_, _, color, side)) => {
                        to = pos.castle_square(color, side);
                        MoveType::Castle
                    }
                    None => MoveType::Normal,
                }
            }
            CastlingNotation::KingTakesRook => {
                let rooks = pos.pieces_of(Piece::Rook, pos.turn());
                if rooks & BitBoard::from_square(to) != EMPTY {
                    MoveType::Castle
                } else {
                    MoveType::Normal
                }
            }
        },
        Some(Piece::Pawn) if pos.en_passant_target() == Some(to) => MoveType::EnPassant,
        _ => MoveType::Normal,
    };

    Move::new(from, to, move_type)
}

/// Render a move. Standard notation always writes castling as the king
/// hopping two files toward its rook.
pub fn encode(mv: Move, notation: CastlingNotation) -> String {
    if mv.is_null() {
        return NULL_MOVE_TEXT.to_string();
    }

    let from = mv.from();
    let to = if mv.is_castle() && notation == CastlingNotation::Standard {
        let file = from.get_file().to_index() as i32;
        let hop = if mv.to().to_index() > from.to_index() { 2 } else { -2 };
        let file = File::from_index((file + hop).clamp(0, 7) as usize);
        Square::make_square(from.get_rank(), file)
    } else {
        mv.to()
    };

    let mut text = format!("{}{}", from, to);
    if let Some(piece) = mv.promotion_piece() {
        text.push(promotion_char(piece));
    }
    text
}

/// Tag a `chess` crate move with its type for `pos`.
pub fn from_chess_move(cm: ChessMove, pos: &Position, notation: CastlingNotation) -> Move {
    let from = cm.get_source();
    let to = cm.get_dest();

    if let Some(piece) = cm.get_promotion() {
        return Move::promotion(from, to, piece);
    }

    match pos.piece_on(from) {
        Some(Piece::King) if from.to_index().abs_diff(to.to_index()) == 2 => {
            let to = match notation {
                CastlingNotation::Standard => to,
                CastlingNotation::KingTakesRook => {
                    let file = if to.to_index() > from.to_index() {
                        File::H
                    } else {
                        File::A
                    };
                    Square::make_square(from.get_rank(), file)
                }
            };
            Move::new(from, to, MoveType::Castle)
        }
        Some(Piece::Pawn) if pos.en_passant_target() == Some(to) => {
            Move::new(from, to, MoveType::EnPassant)
        }
        _ => Move::new(from, to, MoveType::Normal),
    }
}

/// Lands on an enemy piece (castling onto an own rook excluded) or captures
/// en passant.
#[inline]
pub fn is_capture(mv: Move, pos: &Position) -> bool {
    (pos.color_on(mv.to()) == Some(!pos.turn()) && !mv.is_castle()) || mv.is_en_passant()
}

/// Captures and promotions.
#[inline]
pub fn is_noisy(mv: Move, pos: &Position) -> bool {
    is_capture(mv, pos) || mv.move_type() == MoveType::Promotion
}

#[inline]
pub fn is_under_promotion(mv: Move) -> bool {
    mv.is_under_promotion()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveGen;
    use proptest::prelude::*;

    const ITALIAN: &str = "rnbqk2r/pppp1ppp/5n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    #[test]
    fn test_standard_castle() {
        let pos = pos(ITALIAN);
        let mv = decode("e1g1", &pos, CastlingNotation::Standard);
        assert_eq!(mv.move_type(), MoveType::Castle);
        assert_eq!(mv.from(), Square::E1);
        assert_eq!(mv.to(), Square::G1);
        assert_eq!(encode(mv, CastlingNotation::Standard), "e1g1");
        assert!(!is_capture(mv, &pos));
    }

    #[test]
    fn test_castle_needs_rights() {
        let pos = pos("rnbqk2r/pppp1ppp/5n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w kq - 4 4");
        let mv = decode("e1g1", &pos, CastlingNotation::Standard);
        assert_eq!(mv.move_type(), MoveType::Normal);
    }

    #[test]
    fn test_king_takes_rook_castle() {
        let pos = pos(ITALIAN);
        let mv = decode("e1h1", &pos, CastlingNotation::KingTakesRook);
        assert_eq!(mv.move_type(), MoveType::Castle);
        assert_eq!(mv.to(), Square::H1);
        assert!(!is_capture(mv, &pos));
        assert_eq!(encode(mv, CastlingNotation::KingTakesRook), "e1h1");
        assert_eq!(encode(mv, CastlingNotation::Standard), "e1g1");

        // The hop is an ordinary king move in this notation
        let hop = decode("e1g1", &pos, CastlingNotation::KingTakesRook);
        assert_eq!(hop.move_type(), MoveType::Normal);
    }

    #[test]
    fn test_promotion() {
        let pos = pos("k7/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let mv = decode("e7e8q", &pos, CastlingNotation::Standard);
        assert_eq!(mv.move_type(), MoveType::Promotion);
        assert_eq!(mv.promotion_piece(), Some(Piece::Queen));
        assert_eq!(encode(mv, CastlingNotation::Standard), "e7e8q");
        assert!(is_noisy(mv, &pos));
        assert!(!is_capture(mv, &pos));

        let knight = decode("e7e8N", &pos, CastlingNotation::Standard);
        assert_eq!(knight.promotion_piece(), Some(Piece::Knight));
        assert_eq!(encode(knight, CastlingNotation::Standard), "e7e8n");
        assert!(!is_under_promotion(knight));
        assert!(is_under_promotion(decode("e7e8r", &pos, CastlingNotation::Standard)));
        assert!(is_under_promotion(decode("e7e8B", &pos, CastlingNotation::Standard)));
    }

    #[test]
    fn test_en_passant() {
        let pos = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let mv = decode("e5d6", &pos, CastlingNotation::Standard);
        assert_eq!(mv.move_type(), MoveType::EnPassant);
        assert!(is_capture(mv, &pos));
        assert!(is_noisy(mv, &pos));

        let push = decode("e5e6", &pos, CastlingNotation::Standard);
        assert_eq!(push.move_type(), MoveType::Normal);
        assert!(!is_noisy(push, &pos));
    }

    #[test]
    fn test_captures() {
        let pos = pos(ITALIAN);
        let capture = decode("f3e5", &pos, CastlingNotation::Standard);
        assert!(is_capture(capture, &pos));
        assert!(is_noisy(capture, &pos));
        let quiet = decode("d2d3", &pos, CastlingNotation::Standard);
        assert!(!is_capture(quiet, &pos));
    }

    #[test]
    fn test_malformed_text_is_null() {
        let pos = Position::default();
        for text in ["", "e2", "e2e", "e2e4q1", "z9z9", "e2e9", "i1a1", "e0e4", "E2E4", "e7e8k", "e7e8x", "é2e4"] {
            assert!(
                decode(text, &pos, CastlingNotation::Standard).is_null(),
                "{text} should not decode"
            );
        }
        assert_eq!(encode(Move::NULL, CastlingNotation::Standard), "null");
        assert_eq!(encode(Move::NULL, CastlingNotation::KingTakesRook), "null");
        assert!(decode(NULL_MOVE_TEXT, &pos, CastlingNotation::Standard).is_null());
    }

    #[test]
    fn test_round_trip_all_legal_moves() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        ];
        for notation in [CastlingNotation::Standard, CastlingNotation::KingTakesRook] {
            for fen in fens {
                let pos = pos(fen);
                for cm in MoveGen::new_legal(pos.board()) {
                    let mv = from_chess_move(cm, &pos, notation);
                    let text = encode(mv, notation);
                    assert_eq!(decode(&text, &pos, notation), mv, "{fen}: {text}");
                    assert_eq!(mv.to_chess_move(), Some(cm), "{fen}: {text}");
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_wrong_length_is_null(text in "[a-h1-8qrbn]{0,3}|[a-h1-8qrbn]{6,10}") {
            prop_assert!(decode(&text, &Position::default(), CastlingNotation::Standard).is_null());
        }

        #[test]
        fn prop_bad_promotion_is_null(c in "[^qrbnQRBN]") {
            let text = format!("a7a8{c}");
            let pos = Position::default();
            prop_assert!(decode(&text, &pos, CastlingNotation::Standard).is_null());
        }
    }
}
