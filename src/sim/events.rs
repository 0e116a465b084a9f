//! Signals the world exposes to its host (UI, audio, player controller)

use super::object::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Scroll speed broadcast to every active entity
    SpeedChanged(f32),
    /// Distance travelled after a fixed step
    DistanceChanged(f32),
    /// Derived speed after a fixed step
    KmhChanged(f32),
    /// Every chunk and sprite was torn down
    WorldCleared,
    /// Player touched an obstacle sprite
    ObstacleCollided(EntityId),
    /// A generation step failed to move the frontier off this chunk
    FrontierStalled(EntityId),
    /// Free sprites destroyed by pool maintenance
    PoolTrimmed(usize),
}
