//! Error types for the engine core.
//!
//! Malformed move text is deliberately absent here: the move codec degrades
//! to the null move instead of failing.

use thiserror::Error;

/// Failure to obtain backing storage for a hash table.
#[derive(Error, Debug)]
pub enum AllocationError {
    /// The requested size holds no slot at all
    #[error("hash table of {megabytes} MB holds no {slot_size}-byte slots")]
    ZeroCapacity { megabytes: usize, slot_size: usize },

    /// Byte count overflowed `usize`
    #[error("hash table of {megabytes} MB is too large for this platform")]
    TooLarge { megabytes: usize },

    /// Slot count times slot size overflowed `usize`
    #[error("{slots} slots of {slot_size} bytes overflow the address space")]
    Overflow { slots: usize, slot_size: usize },

    /// Anonymous mapping for the aligned table failed
    #[error("failed to map {bytes} bytes for hash table")]
    Map {
        bytes: usize,
        #[source]
        source: std::io::Error,
    },

    /// Heap reservation for the unaligned table failed
    #[error("failed to reserve {slots} hash table slots")]
    Reserve {
        slots: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}

/// Errors raised while applying a runtime option.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option `{name}`")]
    UnknownOption { name: String },

    #[error("option `{name}` expects {expected}, got `{value}`")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("option `{name}` value {value} outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// A position could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Loading an NNUE network failed.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("cannot open network file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed network file: {0}")]
    Format(#[from] binread::Error),
}
