//! Downslope entry point
//!
//! Headless runner: loads an asset pack and world settings, streams a run at a
//! steady frame rate and logs what the world reports.
//!
//! Usage: `downslope [asset_pack.json] [settings.json] [map name]`

use std::sync::Arc;

use downslope::effects::EffectRequest;
use downslope::sim::{FixedStepper, TickContext, WorldEvent, WorldGenerator};
use downslope::{AssetPack, EffectRouter, WorldError, WorldSettings};

const DEFAULT_PACK: &str = "assets/demo_pack.json";
const DEFAULT_SETTINGS: &str = "assets/settings.json";

/// Simulated frame rate of the headless loop
const FRAME_HZ: f32 = 60.0;
/// Simulated run length in seconds
const RUN_SECONDS: u32 = 30;
/// Scroll speed used for the run (units per fixed step)
const RUN_SPEED: f32 = 0.12;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Downslope (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), WorldError> {
    let mut args = std::env::args().skip(1);
    let pack_path = args.next().unwrap_or_else(|| DEFAULT_PACK.to_string());
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS.to_string());
    let map_name = args.next();

    let assets = Arc::new(AssetPack::load(&pack_path)?);
    let settings = WorldSettings::load(&settings_path)?;
    let effects = EffectRouter::from_assets(&assets);
    let mut world = WorldGenerator::new(settings, Arc::clone(&assets), effects);

    let map = match map_name.as_deref() {
        Some(name) => Some(assets.map(name)?),
        None => assets.maps.first(),
    };
    if let Some(map) = map {
        world.apply_map(map);
    }

    world.clear_world();
    let report = world.generate_batch();
    if !report.is_clean() {
        log::warn!("First batch finished with {} issue(s)", report.issues.len());
    }
    world.set_world_speed(RUN_SPEED);

    let ctx = TickContext::default();
    let mut stepper = FixedStepper::new(world.settings().fixed_hz);
    log::info!("Fixed tick every {:.4}s", stepper.dt());
    let frame_dt = 1.0 / FRAME_HZ;
    let frames = RUN_SECONDS * FRAME_HZ as u32;

    let mut stalls = 0;
    let mut effects_played = 0;

    for frame in 0..frames {
        for _ in 0..stepper.advance(frame_dt) {
            world.fixed_update(&ctx);
        }
        world.update();

        for event in world.drain_events() {
            match event {
                WorldEvent::FrontierStalled(id) => {
                    stalls += 1;
                    log::warn!("Frontier stalled on {id}");
                }
                WorldEvent::PoolTrimmed(n) => log::debug!("Pool trimmed {n}"),
                WorldEvent::WorldCleared => log::info!("World cleared"),
                _ => {}
            }
        }
        for request in world.effects_mut().drain() {
            effects_played += 1;
            match request {
                EffectRequest::Sound(id) => log::debug!("sfx {id}"),
                EffectRequest::Particles { id, pos } => log::debug!("pfx {id} at {pos}"),
            }
        }

        if frame % (FRAME_HZ as u32 * 5) == 0 {
            log::info!(
                "t={:>4.1}s distance={}m speed={:.1}km/h chunks={} sprites={} pooled={}",
                frame as f32 / FRAME_HZ,
                world.distance_travelled(),
                world.kmh(),
                world.active_chunk_count(),
                world.active_object_count(),
                world.pool_instance_count()
            );
        }
    }

    log::info!(
        "Run finished: {}m travelled, {} stalls, {} effect requests",
        world.distance_travelled(),
        stalls,
        effects_played
    );
    Ok(())
}
