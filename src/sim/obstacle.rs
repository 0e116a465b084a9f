//! Obstacle definitions
//!
//! Authored externally, loaded once with the asset pack and shared read-only
//! by every sprite that carries one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision behaviour class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    #[default]
    None,
    Powder,
    Shrub,
    SmallTree,
    LargeTree,
    SmallRamp,
    Stump,
    LargeRamp,
}

/// Box collider relative to the sprite
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColliderData {
    pub size: Vec2,
    pub offset: Vec2,
}

/// Extra behaviour when the player hits the obstacle dead centre
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterCollision {
    pub distance: f32,
    pub speed_penalty: f32,
    /// Stun duration in seconds, if the hit stuns
    pub stun: Option<f32>,
    pub sfx: Option<String>,
    pub pfx: Option<String>,
}

/// Launch parameters for ramps
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampParams {
    pub forward_power: f32,
    pub vertical_power: f32,
    pub vertical_max: f32,
    pub soft_jump: bool,
}

/// Static description of one obstacle type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleDefinition {
    pub name: String,
    pub sprite_id: String,
    pub sort_id: i32,
    pub sorting_layer: String,
    /// 0 = no animator
    pub animator_id: u32,
    /// Placement offset from the row cell
    pub offset: Vec2,

    pub collision: CollisionKind,
    pub collider: ColliderData,
    /// Multiplier applied to player speed on contact
    pub speed_penalty: Option<f32>,
    pub collision_sfx: Option<String>,
    pub collision_pfx: Option<String>,
    pub center: Option<CenterCollision>,
    pub ramp: Option<RampParams>,

    pub air_collidable: bool,
    pub destroy_on_collision: bool,
    /// Obstacle placed in the next cell to the right as part of this one
    pub extended: Option<String>,
}

impl ObstacleDefinition {
    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended.is_some()
    }

    #[inline]
    pub fn is_ramp(&self) -> bool {
        self.ramp.is_some()
    }

    #[inline]
    pub fn has_animator(&self) -> bool {
        self.animator_id != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json() {
        let obstacle: ObstacleDefinition =
            serde_json::from_str(r#"{ "name": "Shrub", "sprite_id": "shrub", "collision": "Shrub" }"#).unwrap();
        assert_eq!(obstacle.collision, CollisionKind::Shrub);
        assert!(!obstacle.is_extended());
        assert!(!obstacle.is_ramp());
        assert!(!obstacle.destroy_on_collision);
    }

    #[test]
    fn test_extended_ramp() {
        let obstacle: ObstacleDefinition = serde_json::from_str(
            r#"{
                "name": "LargeRampLeft",
                "collision": "LargeRamp",
                "extended": "LargeRampRight",
                "ramp": { "forward_power": 1.5, "vertical_power": 2.0, "vertical_max": 3.0 }
            }"#,
        )
        .unwrap();
        assert!(obstacle.is_extended());
        assert_eq!(obstacle.ramp.unwrap().vertical_max, 3.0);
    }
}
