//! Pooled world sprite
//!
//! The one renderable entity type the world streams: obstacles, snow
//! variations, player trails and effect anchors are all `WorldSprite`s pulled
//! from the sprite pool. Logical identity (obstacle data, position, sorting)
//! is wiped on every release.

use std::sync::Arc;

use glam::Vec2;

use super::object::{EntityId, WorldObject};
use super::obstacle::{ColliderData, ObstacleDefinition};
use super::pool::Poolable;
use crate::consts::EMPTY_SPRITE;
use crate::effects::Effects;

/// What a sprite is standing in for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpriteRole {
    #[default]
    Pooled,
    Obstacle,
    SnowVariation,
    Trail,
    Effect,
}

/// Which part of an obstacle the player touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Edge,
    Center,
}

#[derive(Debug, Clone)]
pub struct WorldSprite {
    pub object: WorldObject,
    role: SpriteRole,
    sprite: String,
    sort_order: i32,
    sorting_layer: String,
    obstacle: Option<Arc<ObstacleDefinition>>,
    collider: Option<ColliderData>,
    animator: Option<u32>,
}

impl Default for WorldSprite {
    fn default() -> Self {
        Self {
            object: WorldObject::default(),
            role: SpriteRole::Pooled,
            sprite: EMPTY_SPRITE.to_string(),
            sort_order: 0,
            sorting_layer: String::new(),
            obstacle: None,
            collider: None,
            animator: None,
        }
    }
}

impl Poolable for WorldSprite {
    fn reset(&mut self) {
        self.object.reset();
        self.role = SpriteRole::Pooled;
        self.sprite.clear();
        self.sprite.push_str(EMPTY_SPRITE);
        self.sort_order = 0;
        self.sorting_layer.clear();
        self.obstacle = None;
        self.collider = None;
        self.animator = None;
    }
}

impl WorldSprite {
    pub fn set_role(&mut self, role: SpriteRole) {
        self.role = role;
    }

    pub fn set_sprite(&mut self, sprite: &str) {
        self.sprite.clear();
        self.sprite.push_str(sprite);
    }

    pub fn set_sorting_order(&mut self, order: i32) {
        self.sort_order = order;
    }

    /// Attach obstacle data: sorting layer, collider and animator follow it
    pub fn set_obstacle(&mut self, obstacle: Arc<ObstacleDefinition>) {
        self.role = SpriteRole::Obstacle;
        self.sorting_layer.clone_from(&obstacle.sorting_layer);
        self.collider = Some(obstacle.collider);
        self.animator = obstacle.has_animator().then_some(obstacle.animator_id);
        self.obstacle = Some(obstacle);
    }

    /// Player touched this sprite. Requests the obstacle's sound/particle
    /// effects and hands back its definition. `None` for plain sprites.
    pub fn collide(&self, contact: Contact, effects: &mut dyn Effects) -> Option<Arc<ObstacleDefinition>> {
        let obstacle = self.obstacle.as_ref()?;
        let pos = self.object.position();

        if contact == Contact::Center {
            if let Some(center) = &obstacle.center {
                if let Some(sfx) = &center.sfx {
                    effects.play_sfx(sfx);
                }
                if let Some(pfx) = &center.pfx {
                    effects.create_pfx(pfx, pos);
                }
            }
        }

        if let Some(sfx) = &obstacle.collision_sfx {
            effects.play_sfx(sfx);
        }
        if let Some(pfx) = &obstacle.collision_pfx {
            effects.create_pfx(pfx, pos);
        }

        Some(Arc::clone(obstacle))
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.object.id()
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.object.position()
    }

    #[inline]
    pub fn role(&self) -> SpriteRole {
        self.role
    }

    #[inline]
    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    #[inline]
    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    #[inline]
    pub fn sorting_layer(&self) -> &str {
        &self.sorting_layer
    }

    #[inline]
    pub fn obstacle(&self) -> Option<&ObstacleDefinition> {
        self.obstacle.as_deref()
    }

    #[inline]
    pub fn collider(&self) -> Option<ColliderData> {
        self.collider
    }

    #[inline]
    pub fn animator(&self) -> Option<u32> {
        self.animator
    }

    #[inline]
    pub fn air_collidable(&self) -> bool {
        self.obstacle.as_ref().is_some_and(|o| o.air_collidable)
    }

    /// Debug name, e.g. `Obstacle[Shrub][#12]`
    pub fn label(&self) -> String {
        match (&self.role, &self.obstacle) {
            (SpriteRole::Obstacle, Some(o)) => format!("Obstacle[{}][{}]", o.name, self.id()),
            (SpriteRole::Trail, _) => format!("TrailFX[{}][{}]", self.sprite, self.id()),
            (SpriteRole::Effect, _) => format!("FX[{}]", self.id()),
            (SpriteRole::SnowVariation, _) => format!("Snow[{}][{}]", self.sprite, self.id()),
            _ => format!("PooledSprite[{}]", self.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectLog;
    use crate::sim::obstacle::CenterCollision;

    fn stump() -> Arc<ObstacleDefinition> {
        Arc::new(ObstacleDefinition {
            name: "Stump".into(),
            sprite_id: "stump".into(),
            sorting_layer: "Obstacles".into(),
            animator_id: 3,
            collision_sfx: Some("thud".into()),
            center: Some(CenterCollision {
                sfx: Some("crack".into()),
                pfx: Some("splinters".into()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_reset_wipes_logical_identity() {
        let mut sprite = WorldSprite::default();
        sprite.set_sprite("stump");
        sprite.set_sorting_order(4);
        sprite.set_obstacle(stump());
        assert_eq!(sprite.animator(), Some(3));
        assert_eq!(sprite.sorting_layer(), "Obstacles");

        sprite.reset();
        assert_eq!(sprite.sprite(), EMPTY_SPRITE);
        assert_eq!(sprite.sort_order(), 0);
        assert!(sprite.obstacle().is_none());
        assert!(sprite.collider().is_none());
        assert!(sprite.animator().is_none());
        assert_eq!(sprite.role(), SpriteRole::Pooled);
    }

    #[test]
    fn test_center_collision_requests_both_effect_sets() {
        let mut sprite = WorldSprite::default();
        sprite.set_obstacle(stump());
        let mut effects = EffectLog::default();

        let hit = sprite.collide(Contact::Center, &mut effects);
        assert_eq!(hit.unwrap().name, "Stump");
        assert_eq!(effects.sfx, vec!["crack".to_string(), "thud".to_string()]);
        assert_eq!(effects.pfx.len(), 1);

        let mut effects = EffectLog::default();
        sprite.collide(Contact::Edge, &mut effects);
        assert_eq!(effects.sfx, vec!["thud".to_string()]);
        assert!(effects.pfx.is_empty());
    }

    #[test]
    fn test_plain_sprite_has_no_collision() {
        let sprite = WorldSprite::default();
        let mut effects = EffectLog::default();
        assert!(sprite.collide(Contact::Edge, &mut effects).is_none());
        assert!(effects.sfx.is_empty());
    }
}
