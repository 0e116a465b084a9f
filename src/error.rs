//! World error taxonomy
//!
//! Lookup misses and degenerate tables are never fatal to the frame loop: the
//! generator logs them, records them in its `GenerationReport` and moves on.

use thiserror::Error;

use crate::sim::EntityId;

/// Errors raised by the world streaming core and its data loaders
#[derive(Debug, Error)]
pub enum WorldError {
    /// Chunk shape id not present in the asset pack
    #[error("chunk prototype {0} does not exist")]
    UnknownChunk(String),

    /// Obstacle id not present in the asset pack
    #[error("obstacle {0} does not exist")]
    UnknownObstacle(String),

    /// Map name not present in the asset pack
    #[error("map {0} does not exist")]
    UnknownMap(String),

    /// Weight table whose weights sum to zero (or is empty)
    #[error("weight table {table} has zero total weight, no draw possible")]
    ZeroTotalWeight { table: String },

    /// Weight table whose sum does not fit the weight type
    #[error("weight table {table} total weight overflows")]
    WeightOverflow { table: String },

    /// A generation step did not advance the frontier
    #[error("frontier stuck on chunk {chunk}")]
    StuckFrontier { chunk: EntityId },

    /// Configuration value outside its usable range
    #[error("setting {field} is invalid: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// Pool handle that is stale or belongs to another pool
    #[error("invalid or stale pool handle")]
    InvalidHandle,

    /// Reading a configuration or asset file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration or asset file failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
