//! Projectiles fired by the player and by enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::Poolable;
use crate::consts::PROJECTILE_CULL_MARGIN;
use crate::outside_playfield;

/// Seconds a projectile lives before expiring
pub const PROJECTILE_LIFETIME: f32 = 2.0;
/// Player shots travel straight up
pub const PLAYER_PROJECTILE_SPEED: f32 = 600.0;
/// Collision radius of player shots (6x12 sprite)
pub const PLAYER_PROJECTILE_RADIUS: f32 = 6.0;
/// Collision radius of enemy shots (8x8 sprite)
pub const ENEMY_PROJECTILE_RADIUS: f32 = 4.0;

/// Who fired a projectile; selects the collision rules that apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

/// A pooled projectile
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: Owner,
    pub radius: f32,
    pub active: bool,
    /// Seconds since spawn
    pub age: f32,
}

impl Projectile {
    /// Activate as a player shot heading up
    pub fn spawn_player(&mut self, pos: Vec2, damage: f32) {
        self.spawn(
            pos,
            Vec2::new(0.0, -PLAYER_PROJECTILE_SPEED),
            damage,
            Owner::Player,
        );
    }

    /// Activate as an enemy shot with the given velocity
    pub fn spawn_enemy(&mut self, pos: Vec2, vel: Vec2, damage: f32) {
        self.spawn(pos, vel, damage, Owner::Enemy);
    }

    fn spawn(&mut self, pos: Vec2, vel: Vec2, damage: f32, owner: Owner) {
        self.pos = pos;
        self.vel = vel;
        self.damage = damage;
        self.owner = owner;
        self.radius = match owner {
            Owner::Player => PLAYER_PROJECTILE_RADIUS,
            Owner::Enemy => ENEMY_PROJECTILE_RADIUS,
        };
        self.age = 0.0;
        self.active = true;
    }

    /// Advance one step; expires by age or by leaving the playfield
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;
        self.age += dt;

        if self.age >= PROJECTILE_LIFETIME || outside_playfield(self.pos, PROJECTILE_CULL_MARGIN) {
            self.active = false;
        }
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}
