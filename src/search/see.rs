//! Static Exchange Evaluation (SEE)
//!
//! Decides whether the capture sequence on a move's destination square nets
//! at least a threshold for the side to move, assuming both sides always
//! recapture with their least valuable attacker. Used by move ordering and
//! pruning in place of a search.
//!
//! Piece scores come from [`Tunables`] so the same routine can be re-run under
//! different material weights.

use crate::position::Position;
use crate::types::{BitBoard, Color, Move, Piece, Square, EMPTY, PIECE_ORDER};
use crate::uci::Tunables;
use chess::{get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, line};

/// Upper bound on exchange steps. Every step removes a piece, so 32 is never
/// reached on a real board.
const MAX_EXCHANGE_STEPS: usize = 32;

/// All pieces of either color attacking `sq` through `occupied`.
fn attackers_to(pos: &Position, sq: Square, occupied: BitBoard) -> BitBoard {
    let queens = pos.pieces(Piece::Queen);
    let pawns = get_pawn_attacks(sq, Color::White, pos.pieces_of(Piece::Pawn, Color::Black))
        | get_pawn_attacks(sq, Color::Black, pos.pieces_of(Piece::Pawn, Color::White));

    pawns
        | (get_knight_moves(sq) & pos.pieces(Piece::Knight))
        | (get_bishop_moves(sq, occupied) & (pos.pieces(Piece::Bishop) | queens))
        | (get_rook_moves(sq, occupied) & (pos.pieces(Piece::Rook) | queens))
        | (get_king_moves(sq) & pos.pieces(Piece::King))
}

/// Cheapest piece in `attackers`, with one square it stands on.
#[inline]
fn least_valuable(pos: &Position, attackers: BitBoard) -> Option<(Piece, Square)> {
    PIECE_ORDER.iter().find_map(|&piece| {
        let set = attackers & pos.pieces(piece);
        (set != EMPTY).then(|| (piece, set.to_square()))
    })
}

/// Castling and en passant are not exchanges.
#[inline]
fn is_exempt(pos: &Position, mv: Move) -> bool {
    mv.is_en_passant()
        || mv.is_castle()
        || (pos.piece_on(mv.from()) == Some(Piece::King)
            && mv.from().to_index().abs_diff(mv.to().to_index()) == 2)
}

/// Does `mv` win at least `threshold` once the exchange on its destination
/// plays out?
pub fn see_ge(pos: &Position, mv: Move, threshold: i32, tunables: &Tunables) -> bool {
    if is_exempt(pos, mv) {
        return threshold <= 0;
    }

    let from = mv.from();
    let to = mv.to();

    // What the opponent can still gain with the next capture. If the victim
    // alone does not reach the threshold, nothing afterwards can help
    let mut score = tunables.see_value(pos.piece_on(to)) - threshold;
    if score < 0 {
        return false;
    }

    // Losing the capturing piece for free still clears the threshold
    score = tunables.see_value(pos.piece_on(from)) - score;
    if score <= 0 {
        return true;
    }

    let queens = pos.pieces(Piece::Queen);
    let diagonal = pos.pieces(Piece::Bishop) | queens;
    let orthogonal = pos.pieces(Piece::Rook) | queens;

    let mut occupied =
        pos.occupied() & !BitBoard::from_square(from) & !BitBoard::from_square(to);
    let mut attackers = attackers_to(pos, to, occupied) & occupied;

    // Pinned pieces may only join the exchange along their pin ray
    let pinned_of = |color: Color| pos.pinned(color) & pos.occupied_by(color);
    let aligned_of = |color: Color| line(to, pos.king(color)) & pinned_of(color);
    let pinned = pinned_of(Color::White) | pinned_of(Color::Black);
    let allowed = !pinned | aligned_of(Color::White) | aligned_of(Color::Black);

    let us = pos.turn();
    let mut turn = us;
    let mut winner = us;

    for _ in 0..MAX_EXCHANGE_STEPS {
        turn = !turn;
        attackers &= occupied;

        let mut ours = attackers & pos.occupied_by(turn);
        if pos.pinned(turn) & occupied != EMPTY {
            ours &= allowed;
        }

        // Out of attackers: this side loses the exchange
        if ours == EMPTY {
            break;
        }

        // Whoever still has an attacker is ahead until proven otherwise
        winner = !winner;

        let Some((piece, sq)) = least_valuable(pos, ours) else {
            break;
        };

        // A king may only take if nothing can take it back
        if piece == Piece::King {
            return if attackers & pos.occupied_by(!turn) != EMPTY {
                us != winner
            } else {
                us == winner
            };
        }

        occupied ^= BitBoard::from_square(sq);

        // Reveal sliders that were x-raying through the vacated square
        match piece {
            Piece::Pawn | Piece::Bishop => {
                attackers |= get_bishop_moves(to, occupied) & diagonal;
            }
            Piece::Rook => {
                attackers |= get_rook_moves(to, occupied) & orthogonal;
            }
            Piece::Queen => {
                attackers |= (get_bishop_moves(to, occupied) & diagonal)
                    | (get_rook_moves(to, occupied) & orthogonal);
            }
            _ => {}
        }

        // Flip perspective: what the other side gains by recapturing
        score = -score + 1 + tunables.piece_value(piece);
        if score <= 0 {
            break;
        }
    }

    us == winner
}

/// Shorthand for `see_ge(.., 0, ..)`: the exchange does not lose material.
#[inline]
pub fn is_good_capture(pos: &Position, mv: Move, tunables: &Tunables) -> bool {
    see_ge(pos, mv, 0, tunables)
}
