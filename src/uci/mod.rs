//! UCI-facing surface of the engine core.
//!
//! The protocol loop itself lives in the front end. This module owns what
//! the loop delegates: coordinate move notation and the option set that
//! `setoption` mutates.

pub mod notation;
mod options;
mod tunables;

pub use notation::{decode, encode, is_capture, is_noisy, is_under_promotion, NULL_MOVE_TEXT};
pub use options::{CastlingNotation, EngineOptions, DEFAULT_HASH_MB, MAX_HASH_MB};
pub use tunables::{Tunable, Tunables};

