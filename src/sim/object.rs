//! Per-entity movement and destroy lifecycle
//!
//! Every moving world entity (chunks, obstacles, decorations, trails) owns one
//! `WorldObject`. State machine: Uninitialized -> Active -> Destroyed.
//! Destroy fires exactly once; the `bool` returned by the destroy paths is that
//! one-shot notification.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique world entity id, allocated from a monotonic counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and spawn position of a world object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectProps {
    pub id: EntityId,
    pub position: Vec2,
}

/// Scroll movement and the y thresholds checked against it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementProps {
    pub direction: Vec2,
    /// Destroy once y passes this
    pub destroy_y: f32,
    /// Chunks ask for more world once y passes this
    pub regen_y: f32,
}

impl Default for MovementProps {
    fn default() -> Self {
        Self {
            direction: crate::WORLD_DIRECTION,
            destroy_y: f32::INFINITY,
            regen_y: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Active,
    Destroyed,
}

/// Position/velocity/destroy state of one world entity
#[derive(Debug, Clone, Default)]
pub struct WorldObject {
    id: EntityId,
    position: Vec2,
    movement: MovementProps,
    speed: f32,
    lifecycle: Lifecycle,
}

impl WorldObject {
    /// Uninitialized -> Active. Returns false (and changes nothing) otherwise.
    pub fn initialize(&mut self, props: ObjectProps, movement: MovementProps) -> bool {
        if self.lifecycle != Lifecycle::Uninitialized {
            return false;
        }
        self.id = props.id;
        self.position = props.position;
        self.movement = movement;
        self.lifecycle = Lifecycle::Active;
        true
    }

    /// Scroll speed broadcast target
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Fixed-rate integration: position += direction * speed
    pub fn fixed_update(&mut self, time_scale: f32) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.position += self.movement.direction * (self.speed * time_scale);
    }

    /// Per-frame destroy threshold check. True on the frame destroy fires.
    pub fn update(&mut self) -> bool {
        self.lifecycle == Lifecycle::Active && self.position.y > self.movement.destroy_y && self.trigger_destroy()
    }

    /// Active -> Destroyed. True only for the call that performed the transition.
    pub fn trigger_destroy(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Active {
            return false;
        }
        self.lifecycle = Lifecycle::Destroyed;
        true
    }

    /// Back to a blank Uninitialized object (pool reuse)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the regeneration threshold has been passed
    #[inline]
    pub fn past_regen(&self) -> bool {
        self.lifecycle == Lifecycle::Active && self.position.y > self.movement.regen_y
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn movement(&self) -> &MovementProps {
        &self.movement
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(y: f32, destroy_y: f32) -> WorldObject {
        let mut obj = WorldObject::default();
        assert!(obj.initialize(
            ObjectProps {
                id: EntityId(1),
                position: Vec2::new(0.0, y),
            },
            MovementProps {
                direction: Vec2::Y,
                destroy_y,
                regen_y: 0.0,
            },
        ));
        obj
    }

    #[test]
    fn test_destroy_fires_once() {
        let mut obj = active(0.0, 10.0);
        let mut fired = 0;
        if obj.trigger_destroy() {
            fired += 1;
        }
        if obj.trigger_destroy() {
            fired += 1;
        }
        assert_eq!(fired, 1);
        assert_eq!(obj.lifecycle(), Lifecycle::Destroyed);
    }

    #[test]
    fn test_initialize_only_once() {
        let mut obj = active(3.0, 10.0);
        let again = obj.initialize(
            ObjectProps {
                id: EntityId(9),
                position: Vec2::ZERO,
            },
            MovementProps::default(),
        );
        assert!(!again);
        assert_eq!(obj.id(), EntityId(1));
        assert_eq!(obj.position().y, 3.0);
    }

    #[test]
    fn test_moves_then_crosses_threshold() {
        let mut obj = active(0.0, 1.0);
        obj.set_speed(0.25);

        for _ in 0..4 {
            obj.fixed_update(1.0);
            assert!(!obj.update());
        }
        assert!((obj.position().y - 1.0).abs() < 1e-6);

        obj.fixed_update(1.0);
        assert!(obj.update());
        // Already destroyed: no second notification and no more movement
        assert!(!obj.update());
        let y = obj.position().y;
        obj.fixed_update(1.0);
        assert_eq!(obj.position().y, y);
    }

    #[test]
    fn test_time_scale_zero_freezes() {
        let mut obj = active(0.0, 10.0);
        obj.set_speed(1.0);
        obj.fixed_update(0.0);
        assert_eq!(obj.position().y, 0.0);
    }

    #[test]
    fn test_uninitialized_is_inert() {
        let mut obj = WorldObject::default();
        obj.set_speed(5.0);
        obj.fixed_update(1.0);
        assert!(!obj.update());
        assert!(!obj.trigger_destroy());
        assert_eq!(obj.position(), Vec2::ZERO);
    }

    #[test]
    fn test_reset_allows_reinitialize() {
        let mut obj = active(0.0, 10.0);
        obj.trigger_destroy();
        obj.reset();
        assert_eq!(obj.lifecycle(), Lifecycle::Uninitialized);
        assert!(obj.initialize(
            ObjectProps {
                id: EntityId(2),
                position: Vec2::ONE,
            },
            MovementProps::default(),
        ));
    }
}
