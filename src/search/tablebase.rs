//! Endgame tablebase probing interface.
//!
//! Reading tablebase files is left to an external prober. The search only
//! sees the outcome and decides when asking is worthwhile.

use crate::position::Position;
use tracing::trace;

/// Largest tablebase set in common use.
pub const MAX_TB_PIECES: u32 = 7;

/// Win/draw/loss from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// Position not covered or the probe could not be answered
    Failed,
    Win,
    Draw,
    Loss,
}

pub trait TablebaseProbe {
    /// Pieces (kings included) the loaded tables cover.
    fn max_pieces(&self) -> u32;

    fn probe(&self, pos: &Position) -> ProbeResult;
}

/// Prober used when no tables are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTablebase;

impl TablebaseProbe for NoTablebase {
    fn max_pieces(&self) -> u32 {
        0
    }

    fn probe(&self, _pos: &Position) -> ProbeResult {
        ProbeResult::Failed
    }
}

/// `SyzygyPath`, `SyzygyProbeDepth` and `SyzygyProbeLimit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyzygySettings {
    pub path: Option<String>,
    /// Minimum remaining depth before probing inside the tree
    pub probe_depth: i32,
    /// Maximum number of pieces to probe
    pub probe_limit: u32,
}

impl Default for SyzygySettings {
    fn default() -> Self {
        Self {
            path: None,
            probe_depth: 1,
            probe_limit: MAX_TB_PIECES,
        }
    }
}

impl SyzygySettings {
    /// Should a node with `pieces` on the board at `depth` be probed?
    pub fn should_probe(&self, prober: &impl TablebaseProbe, pieces: u32, depth: i32) -> bool {
        let limit = self.probe_limit.min(prober.max_pieces());
        self.path.is_some() && pieces <= limit && depth >= self.probe_depth
    }

    /// Probe `pos` if the settings allow it, otherwise report `Failed`.
    pub fn probe(&self, prober: &impl TablebaseProbe, pos: &Position, depth: i32) -> ProbeResult {
        let pieces = pos.occupied().popcnt();
        if !self.should_probe(prober, pieces, depth) {
            return ProbeResult::Failed;
        }
        let result = prober.probe(pos);
        trace!(pieces, depth, ?result, "tablebase probe");
        result
    }
}
