//! Board evaluation module.
//!
//! The network supplies the positional score; the evaluator rescales it by
//! how much material is left, since the network alone under-reacts to
//! trades. Uses NNUE if available, otherwise falls back to material.

mod material;
mod nnue;

pub use material::MaterialNetwork;
pub use self::nnue::NnueNetwork;

use crate::position::Position;
use crate::types::{Piece, Score, Value};
use crate::uci::Tunables;
use std::path::Path;
use tracing::warn;

/// Divisor applied after scaling by `MaterialScaleBase + phase`.
pub const SCALE_DENOMINATOR: i64 = 32768;

const PHASE_PIECES: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// A positional evaluator, side-to-move relative, in centipawns.
pub trait NeuralEvaluator {
    fn evaluate(&self, pos: &Position) -> Value;
}

/// A network loaded from disk, or the material fallback.
#[derive(Debug, Clone)]
pub enum Network {
    Nnue(NnueNetwork),
    Material(MaterialNetwork),
}

impl Network {
    /// Load the network at `path`, falling back to material counting when
    /// there is no path or the file cannot be read.
    pub fn load_or_material(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Network::Material(MaterialNetwork);
        };
        match NnueNetwork::load(path) {
            Ok(network) => Network::Nnue(network),
            Err(err) => {
                warn!(path = %path.display(), %err, "NNUE load failed, using material evaluation");
                Network::Material(MaterialNetwork)
            }
        }
    }
}

impl NeuralEvaluator for Network {
    fn evaluate(&self, pos: &Position) -> Value {
        match self {
            Network::Nnue(network) => network.evaluate(pos),
            Network::Material(network) => network.evaluate(pos),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Network output scaled by remaining material
    Scaled,
    /// Network output as is, for training-data generation
    Raw,
}

impl Default for EvalMode {
    fn default() -> Self {
        if cfg!(feature = "datagen") {
            EvalMode::Raw
        } else {
            EvalMode::Scaled
        }
    }
}

/// Sum of tunable piece scores over all knights, bishops, rooks and queens.
pub fn material_phase(pos: &Position, tunables: &Tunables) -> Value {
    PHASE_PIECES
        .iter()
        .map(|&piece| tunables.piece_value(piece) * pos.pieces(piece).popcnt() as Value)
        .sum()
}

#[derive(Debug, Clone)]
pub struct Evaluator<N> {
    network: N,
    mode: EvalMode,
}

impl<N: NeuralEvaluator> Evaluator<N> {
    pub fn new(network: N) -> Self {
        Self::with_mode(network, EvalMode::default())
    }

    pub fn with_mode(network: N, mode: EvalMode) -> Self {
        Self { network, mode }
    }

    #[inline]
    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EvalMode) {
        self.mode = mode;
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Evaluate `pos` for the side to move. Tunables are read on every call.
    pub fn evaluate(&self, pos: &Position, tunables: &Tunables) -> Score {
        let eval = self.network.evaluate(pos);
        if self.mode == EvalMode::Raw {
            return Score::cp(eval);
        }

        let scale = i64::from(tunables.material_scale_base() + material_phase(pos, tunables));
        Score::cp((i64::from(eval) * scale / SCALE_DENOMINATOR) as Value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed score regardless of the position.
    struct FixedNetwork(Value);

    impl NeuralEvaluator for FixedNetwork {
        fn evaluate(&self, _pos: &Position) -> Value {
            self.0
        }
    }

    const BARE_KINGS: &str = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";

    #[test]
    fn test_material_phase() {
        let tunables = Tunables::default();
        // 4 knights, 4 bishops, 4 rooks, 2 queens
        assert_eq!(
            material_phase(&Position::default(), &tunables),
            4 * 450 + 4 * 450 + 4 * 650 + 2 * 1250
        );
        let bare = Position::from_fen(BARE_KINGS).expect("valid fen");
        assert_eq!(material_phase(&bare, &tunables), 0);
    }

    #[test]
    fn test_starting_position_near_zero() {
        let evaluator = Evaluator::with_mode(MaterialNetwork, EvalMode::Scaled);
        let score = evaluator.evaluate(&Position::default(), &Tunables::default());
        assert!(score.raw().abs() < 50);
    }

    #[test]
    fn test_raw_mode_is_unscaled() {
        let evaluator = Evaluator::with_mode(FixedNetwork(123), EvalMode::Raw);
        let score = evaluator.evaluate(&Position::default(), &Tunables::default());
        assert_eq!(score, Score::cp(123));
    }

    #[test]
    fn test_scaling() {
        let tunables = Tunables::default();
        let bare = Position::from_fen(BARE_KINGS).expect("valid fen");

        // No phase material: only the base applies
        let evaluator = Evaluator::with_mode(FixedNetwork(32768), EvalMode::Scaled);
        assert_eq!(evaluator.evaluate(&bare, &tunables), Score::cp(26909));

        // Full board: (26909 + 8700) / 32768 of the raw score, truncated
        let start = Position::default();
        let evaluator = Evaluator::with_mode(FixedNetwork(123), EvalMode::Scaled);
        assert_eq!(evaluator.evaluate(&start, &tunables), Score::cp(133));
        let evaluator = Evaluator::with_mode(FixedNetwork(-123), EvalMode::Scaled);
        assert_eq!(evaluator.evaluate(&start, &tunables), Score::cp(-133));
    }

    #[test]
    fn test_tunables_are_live() {
        let mut tunables = Tunables::default();
        let bare = Position::from_fen(BARE_KINGS).expect("valid fen");
        let evaluator = Evaluator::with_mode(FixedNetwork(32768), EvalMode::Scaled);
        tunables.set("MaterialScaleBase", 16384).expect("in range");
        assert_eq!(evaluator.evaluate(&bare, &tunables), Score::cp(16384));
    }

    #[test]
    fn test_default_mode_follows_feature() {
        let expected = if cfg!(feature = "datagen") {
            EvalMode::Raw
        } else {
            EvalMode::Scaled
        };
        assert_eq!(Evaluator::new(MaterialNetwork).mode(), expected);
    }

    #[test]
    fn test_missing_network_falls_back() {
        crate::init_test_tracing();
        let network = Network::load_or_material(Some(Path::new("/nonexistent/model.nnue")));
        assert!(matches!(network, Network::Material(_)));
        assert!(matches!(Network::load_or_material(None), Network::Material(_)));
        assert_eq!(network.evaluate(&Position::default()), 0);
    }
}
