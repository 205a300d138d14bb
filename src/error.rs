//! Error taxonomy for the gameplay core
//!
//! Configuration errors are fatal and surface at load time. Pool exhaustion is
//! reported to the scheduler, which skips the spawn cycle and carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown collectible kind `{0}`")]
    UnknownCollectibleKind(String),
    #[error("unknown obstacle kind `{0}`")]
    UnknownObstacleKind(String),
    #[error("rarity table weights sum to {total}, expected 100")]
    InvalidRarityTable { total: f64 },
    #[error("invalid tuning value `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },
    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),
    #[error("{pool} pool exhausted at {capacity} entries")]
    PoolExhausted { pool: &'static str, capacity: usize },
}
