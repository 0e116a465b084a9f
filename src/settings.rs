//! World settings
//!
//! Loaded once at startup from JSON. Any field missing from the file keeps its
//! stock value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_HZ, WORLD_GEN_DEFAULT_DIST};
use crate::error::WorldError;

/// World generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    // === Randomness ===
    /// Seed for every world sampler (0 = system random)
    pub obstacle_seed: u64,

    // === Generation ===
    /// Rows generated per forward batch
    pub forward_distance: u32,
    /// Left world boundary sits at `-world_edge_size`
    pub world_edge_size: i32,
    /// Right world boundary sits at `world_edge_size - right_edge_offset`
    pub right_edge_offset: i32,
    /// Ice paths may only expand while `thickness + 1 < max_chunk_width`
    pub max_chunk_width: i32,
    /// Shape used for the first chunk after a fresh start
    pub first_ice_path: String,
    /// Obstacle placed at both world edges of every row
    pub boundary_obstacle: String,

    // === Movement ===
    /// Entities past this y are destroyed
    pub destroy_y: f32,
    /// Chunks past this y ask for more world
    pub regen_y: f32,
    /// Fixed tick rate used to derive metres per second
    pub fixed_hz: f32,

    // === Pooling ===
    /// Sprites constructed up front when the world is built
    pub pool_prewarm: usize,
    /// Free sprites kept before trimming starts
    pub pool_high_water: usize,
    /// Free sprites destroyed per maintenance call
    pub pool_trim_step: usize,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            obstacle_seed: 10403,

            forward_distance: WORLD_GEN_DEFAULT_DIST,
            world_edge_size: 14,
            right_edge_offset: 0,
            max_chunk_width: 0,
            first_ice_path: "PathEmpty".to_string(),
            boundary_obstacle: "LargeTree".to_string(),

            destroy_y: 12.0,
            regen_y: 0.0,
            fixed_hz: FIXED_HZ,

            pool_prewarm: 64,
            pool_high_water: 512,
            pool_trim_step: 8,
        }
    }
}

impl WorldSettings {
    /// Parse and validate settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the world cannot run with
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(WorldError::InvalidSetting {
                field: "fixed_hz",
                reason: format!("must be a positive rate, got {}", self.fixed_hz),
            });
        }
        if self.world_edge_size < 0 {
            return Err(WorldError::InvalidSetting {
                field: "world_edge_size",
                reason: format!("must not be negative, got {}", self.world_edge_size),
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded world settings from {}", path.display());
        Ok(settings)
    }

    /// Leftmost world column
    #[inline]
    pub fn left_world_edge(&self) -> i32 {
        -self.world_edge_size
    }

    /// Rightmost world column
    #[inline]
    pub fn right_world_edge(&self) -> i32 {
        self.world_edge_size - self.right_edge_offset
    }
}
