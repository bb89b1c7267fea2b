//! Error taxonomy for the simulator and its collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A player's ratings cannot produce meaningful probabilities.
    #[error("invalid rating for {name}: {reason}")]
    InvalidRating { name: String, reason: String },

    #[error("invalid match format: {0}")]
    InvalidFormat(String),

    /// The leg safety bound was exceeded. Always a defect in the visit model.
    #[error("leg did not finish within {visits} visits")]
    LegDidNotTerminate { visits: usize },

    #[error("tournament needs at least one entrant")]
    EmptyField,

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
