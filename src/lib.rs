//! Engine core: move notation, static exchange evaluation, evaluation
//! scaling and the hash tables the search runs on.
//!
//! # Modules
//! - `types`: moves, scores, depths and re-exported board types
//! - `position`: read-only board view with pins for both colors
//! - `hash`: fixed-capacity direct-mapped tables
//! - `uci`: move notation and runtime options
//! - `search`: SEE, transposition table, tablebase interface
//! - `eval`: network evaluation with material scaling

pub mod error;
pub mod eval;
pub mod hash;
pub mod position;
pub mod search;
pub mod types;
pub mod uci;

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;
    // Several tests may race to install it; only the first wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub use error::{AllocationError, NetworkError, OptionError, PositionError};
pub use eval::{EvalMode, Evaluator, NeuralEvaluator};
pub use position::Position;
pub use types::{Move, MoveType, Score};
pub use uci::{EngineOptions, Tunables};
