//! Asset pack: the externally authored lookup tables the world reads from
//!
//! Chunks, obstacles, sprites, effect ids and per-map weight tables arrive as
//! already-parsed data. Everything is looked up by string key; misses are
//! reported, never panicked on.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::EMPTY_SPRITE;
use crate::error::WorldError;
use crate::sim::chunk::ChunkPrototype;
use crate::sim::obstacle::ObstacleDefinition;
use crate::sim::sampler::WeightTable;

/// Weight tables and limits for one playable map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedMapData {
    pub name: String,
    pub max_ice_path_width: i32,
    pub world_edge_size: i32,
    pub obstacle_weights: WeightTable,
    pub outer_obstacle_weights: WeightTable,
    pub snow_variation_weights: WeightTable,
    pub ice_path_weights: WeightTable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPack {
    pub chunks: Vec<ChunkPrototype>,
    pub obstacles: Vec<ObstacleDefinition>,
    pub sprites: Vec<String>,
    pub trail_sprites: Vec<String>,
    pub sfx: Vec<String>,
    pub pfx: Vec<String>,
    /// Tables used before any map is chosen
    pub defaults: WeightedMapData,
    pub maps: Vec<WeightedMapData>,

    #[serde(skip)]
    chunk_index: HashMap<String, Arc<ChunkPrototype>>,
    #[serde(skip)]
    obstacle_index: HashMap<String, Arc<ObstacleDefinition>>,
    #[serde(skip)]
    sprite_index: HashSet<String>,
}

impl AssetPack {
    /// Parse and index a pack from JSON
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let pack: AssetPack = serde_json::from_str(json)?;
        Ok(pack.indexed())
    }

    /// Load and index a pack from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let pack = Self::from_json_str(&json)?;
        log::info!(
            "Loaded asset pack {}: {} chunks, {} obstacles, {} maps",
            path.display(),
            pack.chunks.len(),
            pack.obstacles.len(),
            pack.maps.len()
        );
        Ok(pack)
    }

    /// Build the lookup indices. Later duplicates win.
    pub fn indexed(mut self) -> Self {
        self.chunk_index = self
            .chunks
            .iter()
            .map(|c| (c.name.clone(), Arc::new(c.clone())))
            .collect();
        self.obstacle_index = self
            .obstacles
            .iter()
            .map(|o| (o.name.clone(), Arc::new(o.clone())))
            .collect();
        self.sprite_index = self.sprites.iter().cloned().collect();

        if !self.sprite_index.contains(EMPTY_SPRITE) {
            log::warn!("Asset pack has no \"{EMPTY_SPRITE}\" sprite; sprite lookups will fall back to a missing name");
        }
        self
    }

    pub fn chunk(&self, id: &str) -> Result<Arc<ChunkPrototype>, WorldError> {
        self.chunk_index
            .get(id)
            .cloned()
            .ok_or_else(|| WorldError::UnknownChunk(id.to_string()))
    }

    pub fn obstacle(&self, id: &str) -> Result<Arc<ObstacleDefinition>, WorldError> {
        self.obstacle_index
            .get(id)
            .cloned()
            .ok_or_else(|| WorldError::UnknownObstacle(id.to_string()))
    }

    pub fn has_obstacle(&self, id: &str) -> bool {
        self.obstacle_index.contains_key(id)
    }

    /// Sprite name, or `"empty"` when the id is unknown
    pub fn sprite<'a>(&'a self, id: &'a str) -> &'a str {
        if self.sprite_index.contains(id) {
            id
        } else {
            log::warn!("Sprite {id} does not exist, using {EMPTY_SPRITE}");
            EMPTY_SPRITE
        }
    }

    pub fn trail_sprite(&self, index: usize) -> Option<&str> {
        self.trail_sprites.get(index).map(String::as_str)
    }

    pub fn map(&self, name: &str) -> Result<&WeightedMapData, WorldError> {
        self.maps
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| WorldError::UnknownMap(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"{
        "chunks": [ { "name": "PathEmpty", "stay": ["PathEmpty"] } ],
        "obstacles": [ { "name": "LargeTree", "sprite_id": "tree_large" } ],
        "sprites": ["empty", "tree_large"],
        "maps": [ { "name": "Beginner", "max_ice_path_width": 6, "world_edge_size": 12,
                    "ice_path_weights": [ { "name": "stay", "weight": 1 } ] } ]
    }"#;

    #[test]
    fn test_lookups() {
        let pack = AssetPack::from_json_str(PACK).unwrap();
        assert_eq!(pack.chunk("PathEmpty").unwrap().stay, vec!["PathEmpty".to_string()]);
        assert_eq!(pack.obstacle("LargeTree").unwrap().sprite_id, "tree_large");
        assert_eq!(pack.map("Beginner").unwrap().max_ice_path_width, 6);
    }

    #[test]
    fn test_lookup_misses() {
        let pack = AssetPack::from_json_str(PACK).unwrap();
        assert!(matches!(pack.chunk("Nope"), Err(WorldError::UnknownChunk(_))));
        assert!(matches!(pack.obstacle("Nope"), Err(WorldError::UnknownObstacle(_))));
        assert!(matches!(pack.map("Nope"), Err(WorldError::UnknownMap(_))));
    }

    #[test]
    fn test_demo_pack_references_resolve() {
        let pack = AssetPack::from_json_str(include_str!("../assets/demo_pack.json")).unwrap();
        assert!(!pack.maps.is_empty());

        for chunk in &pack.chunks {
            for next in chunk.stay.iter().chain(&chunk.expand).chain(&chunk.contract).chain(&chunk.turn) {
                assert!(pack.chunk(next).is_ok(), "{} -> {next}", chunk.name);
            }
        }
        for obstacle in &pack.obstacles {
            assert_eq!(pack.sprite(&obstacle.sprite_id), obstacle.sprite_id);
            if let Some(chained) = &obstacle.extended {
                assert!(pack.has_obstacle(chained));
            }
        }
        for map in pack.maps.iter().chain(std::iter::once(&pack.defaults)) {
            for table in [&map.obstacle_weights, &map.outer_obstacle_weights] {
                for i in 1..table.len() {
                    assert!(pack.has_obstacle(table.name(i).unwrap()), "{}", map.name);
                }
            }
        }
    }

    #[test]
    fn test_sprite_falls_back_to_empty() {
        let pack = AssetPack::from_json_str(PACK).unwrap();
        assert_eq!(pack.sprite("tree_large"), "tree_large");
        assert_eq!(pack.sprite("nope"), EMPTY_SPRITE);
    }
}
