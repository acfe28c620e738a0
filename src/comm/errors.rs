/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the communication layer

use thiserror::Error;

/// Result type for communicator operations
pub type Result<T> = std::result::Result<T, CommError>;

/// Errors raised by a communicator when a protocol violation can be detected
#[derive(Error, Debug)]
pub enum CommError {
    /// A world must contain at least one rank
    #[error("Invalid world size: {0}")]
    InvalidSize(usize),

    /// A call addressed a rank outside the world
    #[error("Rank {rank} addressed rank {peer}, but the world has {size} ranks")]
    InvalidRank {
        rank: usize,
        peer: usize,
        size: usize,
    },

    /// The received payload was built from a different element type
    #[error("Rank {rank} received {channel} from rank {sender} with an unexpected element type")]
    PayloadType {
        rank: usize,
        sender: usize,
        channel: String,
    },

    /// A broadcast buffer did not match the root's buffer length
    #[error("Rank {rank} expected {expected} elements in broadcast from rank {root}, found {found}")]
    LengthMismatch {
        rank: usize,
        root: usize,
        expected: usize,
        found: usize,
    },

    /// Ranks disagree on the order or root of collective calls
    #[error("Rank {rank} expected collective #{sequence} from rank {expected_root}, but rank {actual_root} issued it")]
    CollectiveMismatch {
        rank: usize,
        sequence: u64,
        expected_root: usize,
        actual_root: usize,
    },

    /// Every peer that could satisfy a receive has gone away
    #[error("Rank {rank} lost its connection while waiting for {channel} from rank {sender}")]
    Disconnected {
        rank: usize,
        sender: usize,
        channel: String,
    },

    /// A peer could not be reached on send
    #[error("Rank {rank} could not deliver {channel} to rank {dest}")]
    SendFailed {
        rank: usize,
        dest: usize,
        channel: String,
    },

    /// The thread hosting a rank could not be started
    #[error("Failed to start rank {rank}: {reason}")]
    Spawn { rank: usize, reason: String },

    /// The thread hosting a rank panicked
    #[error("Rank {rank} panicked")]
    RankPanicked { rank: usize },
}
