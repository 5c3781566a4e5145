//! Named, externally adjustable numeric parameters.
//!
//! Every tunable is exposed as a UCI `spin` option with its default and
//! bounds. Consumers read them per call, so a `setoption` takes effect on the
//! next evaluation.

use crate::error::OptionError;
use crate::types::{Piece, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunable {
    name: &'static str,
    value: Value,
    default: Value,
    min: Value,
    max: Value,
    step: Value,
}

impl Tunable {
    pub const fn new(
        name: &'static str,
        default: Value,
        min: Value,
        max: Value,
        step: Value,
    ) -> Self {
        Self {
            name,
            value: default,
            default,
            min,
            max,
            step,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value(&self) -> Value {
        self.value
    }

    #[inline]
    pub const fn default_value(&self) -> Value {
        self.default
    }

    #[inline]
    pub const fn bounds(&self) -> (Value, Value) {
        (self.min, self.max)
    }

    /// Tuning step, for SPSA-style tuners.
    #[inline]
    pub const fn step(&self) -> Value {
        self.step
    }

    pub fn set(&mut self, value: Value) -> Result<(), OptionError> {
        if !(self.min..=self.max).contains(&value) {
            return Err(OptionError::OutOfRange {
                name: self.name.to_string(),
                value: value.into(),
                min: self.min.into(),
                max: self.max.into(),
            });
        }
        self.value = value;
        Ok(())
    }

    pub fn uci_line(&self) -> String {
        format!(
            "option name {} type spin default {} min {} max {}",
            self.name, self.default, self.min, self.max
        )
    }
}

/// SEE score of the king. Never captured in a legal exchange, so it is not
/// exposed as an option.
const KING_SCORE: Value = 0;

/// Piece scores used by SEE and the material phase, plus the evaluation
/// scale base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunables {
    /// Pawn to queen, indexed by `Piece::to_index()`
    see_scores: [Tunable; 5],
    material_scale_base: Tunable,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            see_scores: [
                Tunable::new("SeePawnScore", 100, 50, 200, 10),
                Tunable::new("SeeKnightScore", 450, 200, 800, 25),
                Tunable::new("SeeBishopScore", 450, 200, 800, 25),
                Tunable::new("SeeRookScore", 650, 400, 1200, 25),
                Tunable::new("SeeQueenScore", 1250, 800, 2000, 50),
            ],
            material_scale_base: Tunable::new("MaterialScaleBase", 26909, 10000, 32768, 500),
        }
    }
}

impl Tunables {
    /// SEE score of a piece; an empty square is worth nothing.
    #[inline]
    pub fn see_value(&self, piece: Option<Piece>) -> Value {
        piece.map_or(0, |p| self.piece_value(p))
    }

    #[inline]
    pub fn piece_value(&self, piece: Piece) -> Value {
        match piece {
            Piece::King => KING_SCORE,
            _ => self.see_scores[piece.to_index()].value,
        }
    }

    #[inline]
    pub fn material_scale_base(&self) -> Value {
        self.material_scale_base.value
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tunable> {
        self.see_scores.iter().chain(std::iter::once(&self.material_scale_base))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tunable> {
        self.see_scores
            .iter_mut()
            .chain(std::iter::once(&mut self.material_scale_base))
    }

    /// Look up a tunable by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&Tunable> {
        self.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Returns `Ok(false)` when no tunable has this name.
    pub fn set(&mut self, name: &str, value: Value) -> Result<bool, OptionError> {
        match self.iter_mut().find(|t| t.name.eq_ignore_ascii_case(name)) {
            Some(tunable) => tunable.set(value).map(|_| true),
            None => Ok(false),
        }
    }

    /// Set a piece score directly. The king score is fixed.
    pub fn set_piece_value(&mut self, piece: Piece, value: Value) -> Result<(), OptionError> {
        match piece {
            Piece::King if value == KING_SCORE => Ok(()),
            Piece::King => Err(OptionError::OutOfRange {
                name: "king score".to_string(),
                value: value.into(),
                min: KING_SCORE.into(),
                max: KING_SCORE.into(),
            }),
            _ => self.see_scores[piece.to_index()].set(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tunables = Tunables::default();
        assert_eq!(tunables.see_value(None), 0);
        assert_eq!(tunables.see_value(Some(Piece::Pawn)), 100);
        assert_eq!(tunables.piece_value(Piece::King), 0);
        assert_eq!(tunables.material_scale_base(), 26909);
        // Five piece scores plus the scale base
        assert_eq!(tunables.iter().count(), 6);
    }

    #[test]
    fn test_king_score_is_internal() {
        let mut tunables = Tunables::default();
        assert!(tunables.get("SeeKingScore").is_none());
        assert_eq!(tunables.set("SeeKingScore", 0), Ok(false));
        assert_eq!(tunables.see_value(Some(Piece::King)), 0);
        assert!(tunables.set_piece_value(Piece::King, 0).is_ok());
        assert!(matches!(
            tunables.set_piece_value(Piece::King, 100),
            Err(OptionError::OutOfRange { .. })
        ));
        assert!(tunables.iter().all(|t| !t.name().contains("King")));
    }

    #[test]
    fn test_set_by_name() {
        let mut tunables = Tunables::default();
        assert_eq!(tunables.set("seequeenscore", 1100), Ok(true));
        assert_eq!(tunables.piece_value(Piece::Queen), 1100);
        assert_eq!(tunables.set("NoSuchThing", 1), Ok(false));
        assert!(matches!(
            tunables.set("MaterialScaleBase", 5),
            Err(OptionError::OutOfRange { min: 10000, .. })
        ));
        assert_eq!(tunables.material_scale_base(), 26909);
    }

    #[test]
    fn test_uci_line() {
        let tunables = Tunables::default();
        let base = tunables.get("MaterialScaleBase").expect("exists");
        assert_eq!(
            base.uci_line(),
            "option name MaterialScaleBase type spin default 26909 min 10000 max 32768"
        );
        assert_eq!(base.step(), 500);
    }
}
