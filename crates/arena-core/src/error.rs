//! Error types for decoding and configuration.
//!
//! None of these are used for simulation control flow; missing targets,
//! absent geometry and failed predictions are plain `Option`s.

use thiserror::Error;

/// Errors decoding a wire message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// Buffer ended before the field was complete.
    #[error("truncated message: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Team code outside the known range.
    #[error("unknown team code {0}")]
    UnknownTeam(i16),

    /// Bytes left over after a complete message.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),

    /// Update addressed to another shot.
    #[error("update for shot {player}:{shot} delivered to shot {expected_player}:{expected_shot}")]
    ShotMismatch {
        player: u8,
        shot: u16,
        expected_player: u8,
        expected_shot: u16,
    },
    #[error("unknown shot end reason {0}")]
    UnknownEndReason(i16),
}

/// Errors loading tunables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tunables JSON: {0}")]
    Json(#[from] serde_json::Error),
}
