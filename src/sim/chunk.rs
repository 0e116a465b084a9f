//! Ice path chunks
//!
//! A chunk is one row of terrain: an authored `ChunkPrototype` (shape, edges,
//! obstacle anchors, successor pools) placed in the world with its own
//! `WorldObject`. On top of the destroy threshold it carries an earlier
//! regeneration threshold with a one-shot listener, which is how the generator
//! learns it is time to extend the stream.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::{EntityId, WorldObject};
use super::signal::OneShot;
use crate::cell_x;

/// Authored chunk shape. All x values are cells relative to the chunk origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkPrototype {
    pub name: String,
    pub thickness: i32,
    /// Horizontal placement offset applied on instantiation
    pub x_offset: i32,
    pub left_edge: i32,
    pub right_edge: i32,
    /// Center obstacle anchor cells
    pub center: Vec<i32>,
    /// Successors that keep the current width
    pub stay: Vec<String>,
    pub expand: Vec<String>,
    pub contract: Vec<String>,
    pub turn: Vec<String>,
}

/// Who gets told when a chunk passes its regeneration threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenListener {
    /// Generate another batch of `distance` rows
    AutoExtend { distance: u32 },
}

/// Notifications produced by one per-frame chunk check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkTick {
    pub regen: Option<RegenListener>,
    pub destroyed: bool,
}

#[derive(Debug, Clone)]
pub struct WorldChunk {
    pub object: WorldObject,
    prototype: Arc<ChunkPrototype>,
    regen: OneShot<RegenListener>,
}

impl WorldChunk {
    pub fn new(prototype: Arc<ChunkPrototype>) -> Self {
        Self {
            object: WorldObject::default(),
            prototype,
            regen: OneShot::new(),
        }
    }

    /// Arm the regeneration threshold
    pub fn subscribe_regen(&mut self, listener: RegenListener) {
        self.regen.subscribe(listener);
    }

    #[inline]
    pub fn regen_armed(&self) -> bool {
        self.regen.is_armed()
    }

    /// Per-frame threshold checks
    pub fn update(&mut self) -> ChunkTick {
        let regen = if self.object.past_regen() {
            self.regen.fire()
        } else {
            None
        };
        ChunkTick {
            regen,
            destroyed: self.object.update(),
        }
    }

    /// Forced destroy (world clear). True only on the first call.
    pub fn trigger_destroy(&mut self) -> bool {
        self.regen.unsubscribe();
        self.object.trigger_destroy()
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
    pub fn prototype(&self) -> &ChunkPrototype {
        &self.prototype
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.prototype.name
    }

    #[inline]
    pub fn thickness(&self) -> i32 {
        self.prototype.thickness
    }

    /// World column of the left edge marker
    #[inline]
    pub fn left_edge_x(&self) -> i32 {
        cell_x(self.position().x) + self.prototype.left_edge
    }

    /// World column of the right edge marker
    #[inline]
    pub fn right_edge_x(&self) -> i32 {
        cell_x(self.position().x) + self.prototype.right_edge
    }

    /// World columns of the center obstacle anchors
    pub fn center_cells(&self) -> impl Iterator<Item = i32> + '_ {
        let origin = cell_x(self.position().x);
        self.prototype.center.iter().map(move |dx| origin + dx)
    }
}
