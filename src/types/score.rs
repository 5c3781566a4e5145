//! Score type.
//!
//! Centipawn scores with mate encoding. Mate in N plies is `SCORE_MATE - N`,
//! mated in N plies is `-SCORE_MATE + N`.

use std::fmt;
use std::ops::Neg;

pub const SCORE_MATE: i32 = 31000;

const MATE_BOUND: i32 = SCORE_MATE - 1000;

/// Side-to-move relative evaluation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    #[inline]
    pub const fn cp(centipawns: i32) -> Self {
        Score(centipawns)
    }

    #[inline]
    pub const fn mate_in(ply: i32) -> Self {
        Score(SCORE_MATE - ply)
    }

    #[inline]
    pub const fn mated_in(ply: i32) -> Self {
        Score(-SCORE_MATE + ply)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_mate(self) -> bool {
        self.0 >= MATE_BOUND
    }

    #[inline]
    pub const fn is_mated(self) -> bool {
        self.0 <= -MATE_BOUND
    }

    /// Make a mate score relative to the node it is stored at.
    #[inline]
    pub const fn to_tt(self, ply: i32) -> Self {
        if self.is_mate() {
            Score(self.0 + ply)
        } else if self.is_mated() {
            Score(self.0 - ply)
        } else {
            self
        }
    }

    /// Inverse of [`Score::to_tt`].
    #[inline]
    pub const fn from_tt(self, ply: i32) -> Self {
        if self.is_mate() {
            Score(self.0 - ply)
        } else if self.is_mated() {
            Score(self.0 + ply)
        } else {
            self
        }
    }
}

impl Neg for Score {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Score(-self.0)
    }
}

impl From<i32> for Score {
    #[inline]
    fn from(v: i32) -> Self {
        Score(v)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            write!(f, "mate {}", (SCORE_MATE - self.0 + 1) / 2)
        } else if self.is_mated() {
            write!(f, "mate -{}", (self.0 + SCORE_MATE + 1) / 2)
        } else {
            write!(f, "cp {}", self.0)
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_detection() {
        assert!(Score::mate_in(5).is_mate());
        assert!(Score::mated_in(3).is_mated());
        assert!(!Score::cp(900).is_mate());
        assert_eq!(-Score::mate_in(4), Score::mated_in(4));
    }

    #[test]
    fn test_tt_adjustment_round_trip() {
        let mate = Score::mate_in(7);
        assert_eq!(mate.to_tt(3).from_tt(3), mate);
        assert_eq!(Score::cp(42).to_tt(9), Score::cp(42));
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::cp(-35).to_string(), "cp -35");
        assert_eq!(Score::mate_in(1).to_string(), "mate 1");
    }
}
