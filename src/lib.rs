//! Downslope - procedural world streaming for a downhill endless runner
//!
//! Core modules:
//! - `sim`: Deterministic world streaming (sampling, pooling, chunks, generator)
//! - `assets`: Collaborator-owned lookup tables (chunks, obstacles, sprites, maps)
//! - `effects`: Outward sound/particle requests
//! - `settings`: Data-driven world configuration

pub mod assets;
pub mod effects;
pub mod error;
pub mod settings;
pub mod sim;

pub use assets::{AssetPack, WeightedMapData};
pub use effects::{EffectRouter, Effects};
pub use error::WorldError;
pub use settings::WorldSettings;

use glam::Vec2;

/// World configuration constants
pub mod consts {
    /// Fixed simulation rate (Hz). Distance is integrated once per fixed step.
    pub const FIXED_HZ: f32 = 50.0;
    /// Maximum fixed substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// 1 m/s = 3.6 km/h
    pub const MPS_TO_KMH: f32 = 3.6;

    /// Default forward generation distance (rows per batch)
    pub const WORLD_GEN_DEFAULT_DIST: u32 = 24;
    /// Right edge offset applied when a map sets its edge size
    pub const MAP_RIGHT_EDGE_OFFSET: i32 = 2;

    /// Sprite name every asset pack must provide as the lookup fallback
    pub const EMPTY_SPRITE: &str = "empty";
}

/// World scroll direction. Every world entity moves up the screen.
pub const WORLD_DIRECTION: Vec2 = Vec2::Y;

/// New chunks are placed one unit against the scroll direction.
pub const CHUNK_STEP: f32 = -1.0;

/// Row cell index for a world x coordinate
#[inline]
pub fn cell_x(x: f32) -> i32 {
    x.round() as i32
}
