//! World generator
//!
//! Owns every chunk and sprite in the world, the frontier pointer and the
//! per-row occupancy set. Forward generation appends rows below the frontier;
//! the first chunk of each batch arms its regeneration threshold so the stream
//! extends itself as the player descends.
//!
//! Notifications raised while the world maps are being walked (destroys,
//! regeneration) are queued and applied after the pass completes.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::chunk::{RegenListener, WorldChunk};
use super::events::WorldEvent;
use super::object::{EntityId, MovementProps, ObjectProps};
use super::obstacle::ObstacleDefinition;
use super::pool::{ObjectPool, PoolHandle};
use super::sampler::{WeightTable, WeightedSampler, seeded_rng};
use super::sprite::{Contact, SpriteRole, WorldSprite};
use super::tick::{Odometer, TickContext};
use crate::assets::{AssetPack, WeightedMapData};
use crate::consts::{EMPTY_SPRITE, MAP_RIGHT_EDGE_OFFSET};
use crate::effects::Effects;
use crate::error::WorldError;
use crate::settings::WorldSettings;
use crate::{CHUNK_STEP, WORLD_DIRECTION};

/// Where the first chunk after a fresh start is anchored
pub const WORLD_ORIGIN: Vec2 = Vec2::ZERO;

/// Sort order for trail sprites
const TRAIL_SORT_ORDER: i32 = 1;

/// Ice path outcome drawn from the ice path table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcePathOutcome {
    Stay,
    Expand,
    Contract,
    Turn,
}

impl IcePathOutcome {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "stay" | "flat" => Some(Self::Stay),
            "expand" => Some(Self::Expand),
            "contract" => Some(Self::Contract),
            "turn" => Some(Self::Turn),
            _ => None,
        }
    }
}

/// What one `generate_forward` call did
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// New chunks, in creation order
    pub created: Vec<EntityId>,
    /// Center and outer obstacle sprites placed (chained cells included)
    pub obstacles: usize,
    /// Mandatory edge obstacles placed
    pub boundary_obstacles: usize,
    /// Snow variation sprites placed
    pub decorations: usize,
    /// Non-fatal problems, each recorded once
    pub issues: Vec<WorldError>,
}

impl GenerationReport {
    /// Record an issue unless an identical one is already recorded
    fn note(&mut self, err: WorldError) {
        let msg = err.to_string();
        if self.issues.iter().any(|e| e.to_string() == msg) {
            return;
        }
        log::warn!("World generation: {msg}");
        self.issues.push(err);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether a step failed to advance the frontier
    pub fn stalled(&self) -> bool {
        self.issues
            .iter()
            .any(|e| matches!(e, WorldError::StuckFrontier { .. }))
    }
}

/// Work raised during a pass over the world maps, applied afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    DestroyChunk(EntityId),
    ReleaseSprite(EntityId),
    Regen(RegenListener),
}

/// Which row table an obstacle draw uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTable {
    Center,
    Outer,
}

pub struct WorldGenerator<E: Effects> {
    settings: WorldSettings,
    assets: Arc<AssetPack>,
    effects: E,

    center_sampler: WeightedSampler,
    outer_sampler: WeightedSampler,
    ice_path_sampler: WeightedSampler,
    snow_sampler: WeightedSampler,
    shape_rng: Pcg32,

    chunks: BTreeMap<EntityId, WorldChunk>,
    objects: BTreeMap<EntityId, PoolHandle>,
    pool: ObjectPool<WorldSprite>,
    frontier: Option<EntityId>,
    row_occupancy: HashSet<i32>,

    world_speed: f32,
    odometer: Odometer,
    next_id: u64,

    events: Vec<WorldEvent>,
    deferred: Vec<Deferred>,
    last_auto_extend: Option<GenerationReport>,
}

impl<E: Effects> WorldGenerator<E> {
    /// Build a generator using the asset pack's default weight tables
    pub fn new(settings: WorldSettings, assets: Arc<AssetPack>, effects: E) -> Self {
        let seed = settings.obstacle_seed;
        let defaults = &assets.defaults;

        let mut pool = ObjectPool::new(settings.pool_high_water, settings.pool_trim_step);
        pool.prewarm(settings.pool_prewarm);

        Self {
            center_sampler: WeightedSampler::new("obstacle", defaults.obstacle_weights.clone(), seed),
            outer_sampler: WeightedSampler::new("outer_obstacle", defaults.outer_obstacle_weights.clone(), seed),
            ice_path_sampler: WeightedSampler::new("ice_path", defaults.ice_path_weights.clone(), seed),
            snow_sampler: WeightedSampler::new("snow_variation", defaults.snow_variation_weights.clone(), seed),
            shape_rng: shape_rng(seed),

            chunks: BTreeMap::new(),
            objects: BTreeMap::new(),
            pool,
            frontier: None,
            row_occupancy: HashSet::new(),

            world_speed: 0.0,
            odometer: Odometer::new(settings.fixed_hz),
            next_id: 1,

            events: Vec::new(),
            deferred: Vec::new(),
            last_auto_extend: None,

            settings,
            assets,
            effects,
        }
    }

    // === Configuration ===

    /// Apply a map's limits and weight tables (fresh samplers, configured seed)
    pub fn apply_map(&mut self, map: &WeightedMapData) {
        let seed = self.settings.obstacle_seed;
        self.set_world_edge_size(map.world_edge_size, MAP_RIGHT_EDGE_OFFSET);
        self.set_world_weights(
            map.obstacle_weights.clone(),
            map.outer_obstacle_weights.clone(),
            map.ice_path_weights.clone(),
            seed,
        );
        self.set_snow_variation_weights(map.snow_variation_weights.clone(), seed);
        self.set_max_chunk_width(map.max_ice_path_width);
        log::info!(
            "Applied map {}: edge {}, max width {}",
            map.name,
            map.world_edge_size,
            map.max_ice_path_width
        );
    }

    /// Replace the center, outer and ice path tables. `seed == 0` is system random.
    pub fn set_world_weights(
        &mut self,
        obstacle: WeightTable,
        outer_obstacle: WeightTable,
        ice_path: WeightTable,
        seed: u64,
    ) {
        self.center_sampler = WeightedSampler::new("obstacle", obstacle, seed);
        self.outer_sampler = WeightedSampler::new("outer_obstacle", outer_obstacle, seed);
        self.ice_path_sampler = WeightedSampler::new("ice_path", ice_path, seed);
        self.shape_rng = shape_rng(seed);
    }

    pub fn set_snow_variation_weights(&mut self, table: WeightTable, seed: u64) {
        self.snow_sampler = WeightedSampler::new("snow_variation", table, seed);
    }

    pub fn set_max_chunk_width(&mut self, width: i32) {
        self.settings.max_chunk_width = width;
    }

    pub fn set_world_edge_size(&mut self, size: i32, right_offset: i32) {
        self.settings.world_edge_size = size;
        self.settings.right_edge_offset = right_offset;
    }

    pub fn set_first_ice_path(&mut self, name: &str) {
        self.settings.first_ice_path = name.to_string();
    }

    pub fn set_forward_distance(&mut self, distance: u32) {
        self.settings.forward_distance = distance;
    }

    // === Generation ===

    /// Generate one batch of the configured forward distance
    pub fn generate_batch(&mut self) -> GenerationReport {
        self.generate_forward(self.settings.forward_distance)
    }

    /// Append `count` rows below the frontier
    pub fn generate_forward(&mut self, count: u32) -> GenerationReport {
        let mut report = GenerationReport::default();

        for _ in 0..count {
            let (anchor, shape) = match self.frontier {
                None => (WORLD_ORIGIN, self.settings.first_ice_path.clone()),
                Some(id) => {
                    let Some(frontier) = self.chunks.get(&id) else {
                        log::error!("Frontier chunk {id} is gone, generation aborted");
                        report.note(WorldError::StuckFrontier { chunk: id });
                        self.events.push(WorldEvent::FrontierStalled(id));
                        break;
                    };
                    let anchor = frontier.position();
                    (anchor, self.next_ice_path(id, &mut report))
                }
            };

            let before = self.frontier;
            let pos = Vec2::new(anchor.x, anchor.y + CHUNK_STEP);
            let chunk_id = match self.create_chunk(pos, &shape) {
                Ok(id) => id,
                Err(err) => {
                    report.note(err);
                    match before {
                        Some(stuck) => {
                            log::warn!("Stuck on chunk {stuck}");
                            report.note(WorldError::StuckFrontier { chunk: stuck });
                            self.events.push(WorldEvent::FrontierStalled(stuck));
                            continue;
                        }
                        // Nothing to anchor to and the first shape is missing
                        None => break,
                    }
                }
            };

            report.created.push(chunk_id);
            self.row_occupancy.clear();

            self.generate_row_obstacles(chunk_id, &mut report);
            self.generate_row_outer(chunk_id, &mut report);
            self.generate_row_edges(chunk_id, &mut report);

            if report.created.len() == 1 {
                if let Some(chunk) = self.chunks.get_mut(&chunk_id) {
                    chunk.subscribe_regen(RegenListener::AutoExtend { distance: count });
                }
            }
        }

        log::debug!(
            "Generated {} chunks, {} obstacles, {} edges, {} decorations",
            report.created.len(),
            report.obstacles,
            report.boundary_obstacles,
            report.decorations
        );
        if count > 0 && report.created.is_empty() {
            log::error!("Forward generation created no chunks; the stream will not extend");
        }
        report
    }

    /// Draw an ice path outcome and pick the next shape from the frontier's pools
    fn next_ice_path(&mut self, frontier: EntityId, report: &mut GenerationReport) -> String {
        let outcome = match self.ice_path_sampler.next_name() {
            Ok(name) => IcePathOutcome::parse(name).unwrap_or_else(|| {
                log::debug!("Ice path outcome {name} has no behaviour, staying");
                IcePathOutcome::Stay
            }),
            Err(err) => {
                report.note(err);
                IcePathOutcome::Stay
            }
        };

        let Some(chunk) = self.chunks.get(&frontier) else {
            return self.settings.first_ice_path.clone();
        };
        let pool = resolve_pool(chunk, outcome, &self.settings);
        if pool.is_empty() {
            return chunk.name().to_string();
        }
        pool[self.shape_rng.random_range(0..pool.len())].clone()
    }

    fn create_chunk(&mut self, pos: Vec2, shape: &str) -> Result<EntityId, WorldError> {
        let prototype = self.assets.chunk(shape)?;
        let pos = pos + Vec2::new(prototype.x_offset as f32, 0.0);

        let id = self.next_entity_id();
        let mut chunk = WorldChunk::new(prototype);
        chunk.object.initialize(ObjectProps { id, position: pos }, self.movement());
        chunk.object.set_speed(self.world_speed);

        self.chunks.insert(id, chunk);
        self.frontier = Some(id);
        Ok(id)
    }

    fn generate_row_obstacles(&mut self, chunk_id: EntityId, report: &mut GenerationReport) {
        let Some(chunk) = self.chunks.get(&chunk_id) else { return };
        let y = chunk.position().y;
        let right_edge = chunk.right_edge_x();
        let cells: Vec<i32> = chunk.center_cells().collect();

        for x in cells {
            self.check_generate_obstacle(RowTable::Center, x, y, right_edge, report);
        }
    }

    fn generate_row_outer(&mut self, chunk_id: EntityId, report: &mut GenerationReport) {
        let Some(chunk) = self.chunks.get(&chunk_id) else { return };
        let y = chunk.position().y;
        let left_start = chunk.left_edge_x() - chunk.thickness();
        let right_start = chunk.right_edge_x() + 1;
        let left_world = self.settings.left_world_edge();
        let right_world = self.settings.right_world_edge();

        let mut x = left_start;
        while x > left_world {
            self.check_generate_obstacle(RowTable::Outer, x, y, left_start + 1, report);
            self.check_generate_snow(x, y, report);
            x -= 1;
        }

        for x in right_start..right_world {
            self.check_generate_obstacle(RowTable::Outer, x, y, right_world, report);
            self.check_generate_snow(x, y, report);
        }
    }

    fn generate_row_edges(&mut self, chunk_id: EntityId, report: &mut GenerationReport) {
        let Some(y) = self.chunks.get(&chunk_id).map(|c| c.position().y) else {
            return;
        };
        let obstacle = match self.assets.obstacle(&self.settings.boundary_obstacle) {
            Ok(obstacle) => obstacle,
            Err(err) => {
                report.note(err);
                return;
            }
        };

        for x in [self.settings.left_world_edge(), self.settings.right_world_edge()] {
            self.create_obstacle(Arc::clone(&obstacle), x, y, report);
            report.boundary_obstacles += 1;
        }
    }

    /// Draw from a row table and place the result at `x` if the row allows it.
    /// Extended obstacles also need `x + 1` free and left of `limit_x`.
    fn check_generate_obstacle(
        &mut self,
        table: RowTable,
        x: i32,
        y: f32,
        limit_x: i32,
        report: &mut GenerationReport,
    ) {
        let sampler = match table {
            RowTable::Center => &mut self.center_sampler,
            RowTable::Outer => &mut self.outer_sampler,
        };
        let index = match sampler.next() {
            Ok(index) => index,
            Err(err) => {
                report.note(err);
                return;
            }
        };

        // 0 is no obstacle
        if index == 0 {
            return;
        }
        let Some(name) = sampler.table().name(index) else { return };

        let obstacle = match self.assets.obstacle(name) {
            Ok(obstacle) => obstacle,
            Err(err) => {
                report.note(err);
                return;
            }
        };

        if obstacle.is_extended() && (x + 1 >= limit_x || self.row_occupancy.contains(&(x + 1))) {
            return;
        }
        if self.row_occupancy.contains(&x) {
            return;
        }
        let placed = self.create_obstacle(obstacle, x, y, report);
        report.obstacles += placed;
    }

    fn check_generate_snow(&mut self, x: i32, y: f32, report: &mut GenerationReport) {
        let index = match self.snow_sampler.next() {
            Ok(index) => index,
            Err(err) => {
                report.note(err);
                return;
            }
        };

        // 0 is no variation
        if index == 0 {
            return;
        }
        let Some(name) = self.snow_sampler.table().name(index) else { return };
        let name = name.to_string();
        self.create_snow_variation(&name, Vec2::new(x as f32, y));
        report.decorations += 1;
    }

    /// Place an obstacle (and its chained cell) and mark the row cells taken.
    /// Returns the number of sprites placed.
    fn create_obstacle(
        &mut self,
        obstacle: Arc<ObstacleDefinition>,
        x: i32,
        y: f32,
        report: &mut GenerationReport,
    ) -> usize {
        self.place_obstacle_sprite(&obstacle, x, y);
        let mut placed = 1;

        if let Some(chained) = &obstacle.extended {
            match self.assets.obstacle(chained) {
                Ok(chained) => {
                    self.place_obstacle_sprite(&chained, x + 1, y);
                    placed += 1;
                }
                Err(err) => report.note(err),
            }
            self.row_occupancy.insert(x + 1);
        }

        self.row_occupancy.insert(x);
        placed
    }

    fn place_obstacle_sprite(&mut self, obstacle: &Arc<ObstacleDefinition>, x: i32, y: f32) -> EntityId {
        let pos = Vec2::new(x as f32, y) + obstacle.offset;
        let sprite = self.assets.sprite(&obstacle.sprite_id).to_string();
        let id = self.spawn_sprite(pos, &sprite, obstacle.sort_id, SpriteRole::Obstacle);
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.set_obstacle(Arc::clone(obstacle));
        }
        id
    }

    // === Pooled sprites ===

    /// Pull a sprite from the pool and start it moving with the world
    fn spawn_sprite(&mut self, pos: Vec2, sprite: &str, order: i32, role: SpriteRole) -> EntityId {
        let id = self.next_entity_id();
        let movement = self.movement();
        let speed = self.world_speed;

        let handle = self.pool.acquire();
        if let Some(s) = self.pool.get_mut(handle) {
            s.set_role(role);
            s.set_sprite(sprite);
            s.set_sorting_order(order);
            s.object.initialize(ObjectProps { id, position: pos }, movement);
            s.object.set_speed(speed);
        }
        self.objects.insert(id, handle);
        id
    }

    /// Decorative snow sprite
    pub fn create_snow_variation(&mut self, id: &str, pos: Vec2) -> EntityId {
        let sprite = self.assets.sprite(id).to_string();
        self.spawn_sprite(pos, &sprite, 0, SpriteRole::SnowVariation)
    }

    /// Trail mark left by the player. `None` if the trail index is unknown.
    pub fn create_player_trail(&mut self, pos: Vec2, index: usize) -> Option<EntityId> {
        let Some(sprite) = self.assets.trail_sprite(index).map(str::to_string) else {
            log::error!("Trail sprite {index} does not exist, trail skipped");
            return None;
        };
        Some(self.spawn_sprite(pos, &sprite, TRAIL_SORT_ORDER, SpriteRole::Trail))
    }

    /// Empty sprite anchoring a particle effect that scrolls with the world
    pub fn create_pfx_sprite(&mut self, id: &str, pos: Vec2) -> EntityId {
        let anchor = self.spawn_sprite(pos, EMPTY_SPRITE, 0, SpriteRole::Effect);
        self.effects.create_pfx(id, pos);
        anchor
    }

    /// Player touched an obstacle sprite. Requests its effects, emits
    /// `ObstacleCollided` and removes it if it breaks on contact.
    pub fn collide_obstacle(&mut self, id: EntityId, contact: Contact) -> Option<Arc<ObstacleDefinition>> {
        let handle = *self.objects.get(&id)?;
        let sprite = self.pool.get(handle)?;
        if !sprite.object.is_active() {
            return None;
        }

        log::debug!("{} hit ({contact:?})", sprite.label());
        let obstacle = sprite.collide(contact, &mut self.effects)?;
        self.events.push(WorldEvent::ObstacleCollided(id));

        if obstacle.destroy_on_collision {
            self.destroy_object(id);
        }
        Some(obstacle)
    }

    /// Force one sprite out of the world now. False if it was not live.
    pub fn destroy_object(&mut self, id: EntityId) -> bool {
        let Some(&handle) = self.objects.get(&id) else {
            return false;
        };
        let fired = self
            .pool
            .get_mut(handle)
            .is_some_and(|s| s.object.trigger_destroy());
        if fired {
            self.release_sprite(id);
        }
        fired
    }

    fn release_sprite(&mut self, id: EntityId) {
        let Some(handle) = self.objects.remove(&id) else { return };
        if let Err(err) = self.pool.release(handle) {
            log::error!("Releasing sprite {id}: {err}");
        }
    }

    fn remove_chunk(&mut self, id: EntityId) {
        if self.chunks.remove(&id).is_some() && self.frontier == Some(id) {
            log::warn!("Frontier chunk {id} destroyed before the next batch");
        }
    }

    // === Ticks ===

    /// Variable-rate tick: pool maintenance and threshold checks
    pub fn update(&mut self) {
        let trimmed = self.pool.maintain();
        if trimmed > 0 {
            self.events.push(WorldEvent::PoolTrimmed(trimmed));
        }

        for (&id, chunk) in self.chunks.iter_mut() {
            let tick = chunk.update();
            if let Some(listener) = tick.regen {
                self.deferred.push(Deferred::Regen(listener));
            }
            if tick.destroyed {
                self.deferred.push(Deferred::DestroyChunk(id));
            }
        }

        for (&id, &handle) in self.objects.iter() {
            let destroyed = self
                .pool
                .get_mut(handle)
                .is_some_and(|s| s.object.update());
            if destroyed && self.pool.mark_pending(handle).is_ok() {
                self.deferred.push(Deferred::ReleaseSprite(id));
            }
        }

        self.flush_deferred();
    }

    /// Fixed-rate tick: movement and distance
    pub fn fixed_update(&mut self, ctx: &TickContext) {
        let scale = ctx.effective_scale();

        for chunk in self.chunks.values_mut() {
            chunk.object.fixed_update(scale);
        }
        for &handle in self.objects.values() {
            if let Some(sprite) = self.pool.get_mut(handle) {
                sprite.object.fixed_update(scale);
            }
        }

        self.odometer.advance(self.world_speed * scale);
        self.events
            .push(WorldEvent::DistanceChanged(self.odometer.distance()));
        self.events.push(WorldEvent::KmhChanged(self.odometer.kmh()));
    }

    fn flush_deferred(&mut self) {
        while !self.deferred.is_empty() {
            for work in std::mem::take(&mut self.deferred) {
                match work {
                    Deferred::DestroyChunk(id) => self.remove_chunk(id),
                    Deferred::ReleaseSprite(id) => self.release_sprite(id),
                    Deferred::Regen(RegenListener::AutoExtend { distance }) => {
                        let report = self.generate_forward(distance);
                        self.last_auto_extend = Some(report);
                    }
                }
            }
        }
    }

    /// Broadcast a new scroll speed to every live entity
    pub fn set_world_speed(&mut self, speed: f32) {
        self.world_speed = speed;
        for chunk in self.chunks.values_mut() {
            chunk.object.set_speed(speed);
        }
        for &handle in self.objects.values() {
            if let Some(sprite) = self.pool.get_mut(handle) {
                sprite.object.set_speed(speed);
            }
        }
        self.events.push(WorldEvent::SpeedChanged(speed));
    }

    /// Destroy everything and return to a fresh start
    pub fn clear_world(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.trigger_destroy();
        }
        self.chunks.clear();

        let ids: Vec<EntityId> = self.objects.keys().copied().collect();
        for id in ids {
            if let Some(&handle) = self.objects.get(&id) {
                if let Some(sprite) = self.pool.get_mut(handle) {
                    sprite.object.trigger_destroy();
                }
            }
            self.release_sprite(id);
        }

        self.deferred.clear();
        self.last_auto_extend = None;
        self.row_occupancy.clear();
        self.frontier = None;
        self.odometer.reset();
        self.events.push(WorldEvent::WorldCleared);
        log::info!("World cleared ({} pooled sprites free)", self.pool.free_count());
    }

    // === Read signals ===

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Report of the most recent self-triggered batch
    pub fn last_auto_extend(&self) -> Option<&GenerationReport> {
        self.last_auto_extend.as_ref()
    }

    pub fn frontier(&self) -> Option<EntityId> {
        self.frontier
    }

    pub fn frontier_chunk(&self) -> Option<&WorldChunk> {
        self.chunks.get(&self.frontier?)
    }

    pub fn chunk(&self, id: EntityId) -> Option<&WorldChunk> {
        self.chunks.get(&id)
    }

    /// Live chunks in creation order
    pub fn chunks(&self) -> impl Iterator<Item = &WorldChunk> {
        self.chunks.values()
    }

    pub fn sprite(&self, id: EntityId) -> Option<&WorldSprite> {
        self.pool.get(*self.objects.get(&id)?)
    }

    /// Live sprites in creation order
    pub fn sprites(&self) -> impl Iterator<Item = &WorldSprite> {
        self.objects.values().filter_map(|&h| self.pool.get(h))
    }

    fn sprite_mut(&mut self, id: EntityId) -> Option<&mut WorldSprite> {
        self.pool.get_mut(*self.objects.get(&id)?)
    }

    pub fn is_cell_occupied(&self, x: i32) -> bool {
        self.row_occupancy.contains(&x)
    }

    pub fn active_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn active_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn pool_free_count(&self) -> usize {
        self.pool.free_count()
    }

    pub fn pool_instance_count(&self) -> usize {
        self.pool.instance_count()
    }

    /// Whole metres travelled
    pub fn distance_travelled(&self) -> i32 {
        self.odometer.distance() as i32
    }

    pub fn meters_per_second(&self) -> f32 {
        self.odometer.meters_per_second()
    }

    pub fn kmh(&self) -> f32 {
        self.odometer.kmh()
    }

    pub fn world_speed(&self) -> f32 {
        self.world_speed
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    // === Internals ===

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn movement(&self) -> MovementProps {
        MovementProps {
            direction: WORLD_DIRECTION,
            destroy_y: self.settings.destroy_y,
            regen_y: self.settings.regen_y,
        }
    }
}

/// Successor pool for an outcome, falling back to the stay pool when the
/// outcome does not apply or its pool is empty
fn resolve_pool<'c>(chunk: &'c WorldChunk, outcome: IcePathOutcome, settings: &WorldSettings) -> &'c [String] {
    let proto = chunk.prototype();
    let pool: &[String] = match outcome {
        IcePathOutcome::Stay => &proto.stay,
        IcePathOutcome::Expand if chunk.thickness() + 1 < settings.max_chunk_width => &proto.expand,
        IcePathOutcome::Contract => &proto.contract,
        IcePathOutcome::Turn if chunk.left_edge_x() - 1 > settings.left_world_edge() => &proto.turn,
        _ => &proto.stay,
    };
    if pool.is_empty() { proto.stay.as_slice() } else { pool }
}

/// Shape picks get their own stream so they do not shift the table draws
fn shape_rng(seed: u64) -> Pcg32 {
    if seed == 0 {
        seeded_rng(0)
    } else {
        seeded_rng(seed.rotate_left(17) ^ 0x9E37_79B9_7F4A_7C15)
    }
}
