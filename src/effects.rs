//! Sound and particle requests
//!
//! The world never plays audio or spawns particles itself. It calls out
//! through `Effects`; the host drains the queued requests and plays them.

use std::collections::HashSet;

use glam::Vec2;

use crate::assets::AssetPack;

/// Outward effect calls made by the world
pub trait Effects {
    /// Request a sound by id. False if it cannot be played.
    fn play_sfx(&mut self, id: &str) -> bool;
    /// Request a particle effect by id at a world position (fire and forget)
    fn create_pfx(&mut self, id: &str, pos: Vec2);
}

/// A validated request waiting for the host
#[derive(Debug, Clone, PartialEq)]
pub enum EffectRequest {
    Sound(String),
    Particles { id: String, pos: Vec2 },
}

/// Routes requests against the asset pack's known sfx/pfx ids
#[derive(Debug, Default)]
pub struct EffectRouter {
    sfx: HashSet<String>,
    pfx: HashSet<String>,
    muted: bool,
    queue: Vec<EffectRequest>,
}

impl EffectRouter {
    pub fn from_assets(assets: &AssetPack) -> Self {
        Self {
            sfx: assets.sfx.iter().cloned().collect(),
            pfx: assets.pfx.iter().cloned().collect(),
            muted: false,
            queue: Vec::new(),
        }
    }

    /// Mute/unmute sounds (particles are unaffected)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Take all queued requests
    pub fn drain(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[EffectRequest] {
        &self.queue
    }
}

impl Effects for EffectRouter {
    fn play_sfx(&mut self, id: &str) -> bool {
        if self.muted {
            return false;
        }
        if !self.sfx.contains(id) {
            log::warn!("Sound {id} does not exist, request ignored");
            return false;
        }
        self.queue.push(EffectRequest::Sound(id.to_string()));
        true
    }

    fn create_pfx(&mut self, id: &str, pos: Vec2) {
        if !self.pfx.contains(id) {
            log::warn!("Particle effect {id} does not exist, request ignored");
            return;
        }
        self.queue.push(EffectRequest::Particles {
            id: id.to_string(),
            pos,
        });
    }
}

/// Accepts and records every request
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    pub sfx: Vec<String>,
    pub pfx: Vec<(String, Vec2)>,
}

impl Effects for EffectLog {
    fn play_sfx(&mut self, id: &str) -> bool {
        self.sfx.push(id.to_string());
        true
    }

    fn create_pfx(&mut self, id: &str, pos: Vec2) {
        self.pfx.push((id.to_string(), pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> EffectRouter {
        let mut assets = AssetPack::default();
        assets.sfx = vec!["thud".into()];
        assets.pfx = vec!["powder".into()];
        EffectRouter::from_assets(&assets)
    }

    #[test]
    fn test_known_ids_are_queued() {
        let mut fx = router();
        assert!(fx.play_sfx("thud"));
        fx.create_pfx("powder", Vec2::ONE);
        assert_eq!(
            fx.drain(),
            vec![
                EffectRequest::Sound("thud".into()),
                EffectRequest::Particles {
                    id: "powder".into(),
                    pos: Vec2::ONE
                },
            ]
        );
        assert!(fx.pending().is_empty());
    }

    #[test]
    fn test_unknown_ids_fail_quietly() {
        let mut fx = router();
        assert!(!fx.play_sfx("missing"));
        fx.create_pfx("missing", Vec2::ZERO);
        assert!(fx.pending().is_empty());
    }

    #[test]
    fn test_muted_rejects_sound() {
        let mut fx = router();
        fx.set_muted(true);
        assert!(!fx.play_sfx("thud"));
        fx.create_pfx("powder", Vec2::ZERO);
        assert_eq!(fx.pending().len(), 1);
    }
}
