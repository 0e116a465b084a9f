//! Deterministic world streaming
//!
//! All world logic lives here. This module must stay deterministic for a
//! given seed:
//! - Fixed timestep for movement and distance
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod chunk;
pub mod events;
pub mod generator;
pub mod object;
pub mod obstacle;
pub mod pool;
pub mod sampler;
pub mod signal;
pub mod sprite;
pub mod tick;

pub use chunk::{ChunkPrototype, ChunkTick, RegenListener, WorldChunk};
pub use events::WorldEvent;
pub use generator::{GenerationReport, IcePathOutcome, WORLD_ORIGIN, WorldGenerator};
pub use object::{EntityId, Lifecycle, MovementProps, ObjectProps, WorldObject};
pub use obstacle::{CenterCollision, ColliderData, CollisionKind, ObstacleDefinition, RampParams};
pub use pool::{ObjectPool, PoolHandle, Poolable, SlotState};
pub use sampler::{WeightEntry, WeightTable, WeightedSampler, seeded_rng};
pub use signal::OneShot;
pub use sprite::{Contact, SpriteRole, WorldSprite};
pub use tick::{FixedStepper, Odometer, TickContext};
