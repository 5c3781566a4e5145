//! Search support: the pieces a search loop drives but does not own.
//!
//! - `see`: static exchange evaluation for ordering and pruning
//! - `tt`: transposition table
//! - `tablebase`: endgame tablebase probing interface

pub mod see;
pub mod tablebase;
pub mod tt;

pub use see::{is_good_capture, see_ge};
pub use tablebase::{NoTablebase, ProbeResult, SyzygySettings, TablebaseProbe};
pub use tt::{BoundType, TTEntry, TranspositionTable};
