//! Sector Shooter - simulation core of a top-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Per-frame simulation (pools, enemy AI, collisions, wave director)
//! - `cards`: Card definitions and the keyed card catalog
//! - `settings`: Debug toggles and display preferences

pub mod cards;
pub mod settings;
pub mod sim;

pub use cards::{Card, CardCatalog};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player ship bounds inset
    pub const PLAYER_EDGE_MARGIN: f32 = 16.0;
    /// Enemies are culled this far outside the playfield
    pub const ENEMY_CULL_MARGIN: f32 = 50.0;
    /// Projectiles are culled this far outside the playfield
    pub const PROJECTILE_CULL_MARGIN: f32 = 20.0;
    /// Pickups are culled this far below the playfield
    pub const PICKUP_CULL_MARGIN: f32 = 50.0;

    /// Snipers stop descending at this fraction of the playfield height
    pub const SNIPER_STOP_FRACTION: f32 = 0.3;

    /// Initial pool sizes
    pub const PROJECTILE_POOL_SIZE: usize = 100;
    pub const RUSH_POOL_SIZE: usize = 60;
    pub const SNIPER_POOL_SIZE: usize = 30;
    pub const SPAWNER_POOL_SIZE: usize = 10;
    pub const COLLECTIBLE_POOL_SIZE: usize = 50;
    pub const CARD_DROP_POOL_SIZE: usize = 8;
}

/// Returns true when `pos` lies outside the playfield grown by `margin`
#[inline]
pub fn outside_playfield(pos: Vec2, margin: f32) -> bool {
    pos.x < -margin
        || pos.x > consts::SCREEN_WIDTH + margin
        || pos.y < -margin
        || pos.y > consts::SCREEN_HEIGHT + margin
}

/// Sign of the horizontal step toward `target_x`, or 0 inside the dead zone
#[inline]
pub fn steer_toward(x: f32, target_x: f32, dead_zone: f32) -> f32 {
    if (x - target_x).abs() > dead_zone {
        if x < target_x { 1.0 } else { -1.0 }
    } else {
        0.0
    }
}
