//! The player ship: acceleration-based movement, auto-fire, invincibility
//! frames, regeneration and card-modified stats

use std::sync::Arc;

use glam::Vec2;

use super::pool::Pool;
use super::projectile::Projectile;
use crate::cards::{Card, Operation, Stat};
use crate::consts::{PLAYER_EDGE_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Pixels per second squared while input is held
pub const ACCELERATION: f32 = 1200.0;
/// Pixels per second squared once input is released
pub const DECELERATION: f32 = 800.0;
pub const HITBOX_RADIUS: f32 = 12.0;
/// Seconds of invulnerability after a non-lethal hit
pub const INVINCIBILITY_DURATION: f32 = 1.5;
/// Seconds between regeneration ticks
pub const REGEN_INTERVAL: f32 = 1.0;
pub const MAX_CARD_SLOTS: usize = 3;
/// Shots leave from the nose of the ship
const MUZZLE_OFFSET: f32 = 16.0;
/// Horizontal gap between shots of a multi-shot volley
const VOLLEY_SPACING: f32 = 10.0;
/// Fastest allowed firing interval
const MIN_FIRE_RATE: f32 = 0.05;

/// Card-modifiable player stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    /// Top speed (px/s)
    pub speed: f32,
    pub damage: f32,
    /// Seconds between shots
    pub fire_rate: f32,
    pub max_hp: f32,
    /// HP restored per regeneration tick
    pub regen_rate: f32,
    /// Extra enemies a shot may pass through
    pub pierce: u32,
    pub projectile_count: u32,
    /// Fraction of damage dealt returned as HP
    pub lifesteal: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            speed: 220.0,
            damage: 10.0,
            fire_rate: 0.25,
            max_hp: 100.0,
            regen_rate: 0.5,
            pierce: 0,
            projectile_count: 1,
            lifesteal: 0.0,
        }
    }
}

impl PlayerStats {
    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Pierce => self.pierce as f32,
            Stat::Damage => self.damage,
            Stat::FireRate => self.fire_rate,
            Stat::Speed => self.speed,
            Stat::MaxHp => self.max_hp,
            Stat::RegenRate => self.regen_rate,
            Stat::ProjectileCount => self.projectile_count as f32,
            Stat::Lifesteal => self.lifesteal,
        }
    }

    pub fn set(&mut self, stat: Stat, value: f32) {
        match stat {
            Stat::Pierce => self.pierce = value.max(0.0).round() as u32,
            Stat::Damage => self.damage = value.max(0.0),
            Stat::FireRate => self.fire_rate = value.max(MIN_FIRE_RATE),
            Stat::Speed => self.speed = value.max(0.0),
            Stat::MaxHp => self.max_hp = value.max(1.0),
            Stat::RegenRate => self.regen_rate = value.max(0.0),
            Stat::ProjectileCount => self.projectile_count = value.max(1.0).round() as u32,
            Stat::Lifesteal => self.lifesteal = value.clamp(0.0, 1.0),
        }
    }
}

/// A card in one of the player's slots
#[derive(Debug, Clone)]
pub struct EquippedCard {
    pub card: Arc<Card>,
    /// Stat value before the card was applied
    previous: f32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: f32,
    pub alive: bool,
    pub hitbox_radius: f32,
    pub stats: PlayerStats,
    /// Seconds until the next shot
    pub fire_timer: f32,
    /// Seconds of invulnerability left
    pub invincible_timer: f32,
    regen_timer: f32,
    cards: Vec<EquippedCard>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Self::start_position())
    }
}

/// Move one velocity axis toward the input direction
fn step_axis(v: f32, input: f32, speed: f32, dt: f32) -> f32 {
    if input != 0.0 {
        let v = v + input * ACCELERATION * dt;
        if v.abs() > speed {
            input.signum() * speed
        } else {
            v
        }
    } else if v > 0.0 {
        (v - DECELERATION * dt).max(0.0)
    } else {
        (v + DECELERATION * dt).min(0.0)
    }
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let stats = PlayerStats::default();
        Self {
            pos,
            vel: Vec2::ZERO,
            hp: stats.max_hp,
            alive: true,
            hitbox_radius: HITBOX_RADIUS,
            stats,
            fire_timer: 0.0,
            invincible_timer: 0.0,
            regen_timer: 0.0,
            cards: Vec::with_capacity(MAX_CARD_SLOTS),
        }
    }

    /// Bottom-center starting point
    pub fn start_position() -> Vec2 {
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 150.0)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Blink while invincible (10 Hz)
    pub fn is_visible(&self) -> bool {
        !self.is_invincible() || (self.invincible_timer * 10.0) as i32 % 2 != 0
    }

    /// Movement, bounds, regeneration and timers. `movement` is the
    /// normalized input direction.
    pub fn update(&mut self, dt: f32, movement: Vec2) {
        if !self.alive {
            return;
        }

        let speed = self.stats.speed;
        self.vel.x = step_axis(self.vel.x, movement.x, speed, dt);
        self.vel.y = step_axis(self.vel.y, movement.y, speed, dt);
        if movement.x != 0.0 && movement.y != 0.0 {
            self.vel = self.vel.clamp_length_max(speed);
        }

        self.pos += self.vel * dt;
        self.pos = self.pos.clamp(
            Vec2::splat(PLAYER_EDGE_MARGIN),
            Vec2::new(
                SCREEN_WIDTH - PLAYER_EDGE_MARGIN,
                SCREEN_HEIGHT - PLAYER_EDGE_MARGIN,
            ),
        );

        if self.hp < self.stats.max_hp {
            self.regen_timer += dt;
            if self.regen_timer >= REGEN_INTERVAL {
                self.regen_timer = 0.0;
                self.heal(self.stats.regen_rate);
            }
        }

        if self.invincible_timer > 0.0 {
            self.invincible_timer = (self.invincible_timer - dt).max(0.0);
        }

        if self.fire_timer > 0.0 {
            self.fire_timer -= dt;
        } else {
            self.fire_timer = 0.0;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.alive && self.fire_timer <= 0.0
    }

    /// Auto-fire a volley if the fire timer allows. Returns the number of
    /// shots spawned.
    pub fn fire(&mut self, projectiles: &mut Pool<Projectile>) -> u32 {
        if !self.can_shoot() {
            return 0;
        }
        let count = self.stats.projectile_count.max(1);
        let muzzle = self.pos - Vec2::new(0.0, MUZZLE_OFFSET);
        let first = -(count as f32 - 1.0) * VOLLEY_SPACING / 2.0;
        for i in 0..count {
            let (_, projectile) = projectiles.acquire();
            let offset = Vec2::new(first + i as f32 * VOLLEY_SPACING, 0.0);
            projectile.spawn_player(muzzle + offset, self.stats.damage);
        }
        self.fire_timer = self.stats.fire_rate;
        count
    }

    /// Apply damage unless invincible. Returns true when damage was taken.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_invincible() || !self.alive {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
            log::info!("Player destroyed");
        } else {
            self.invincible_timer = INVINCIBILITY_DURATION;
        }
        true
    }

    pub fn heal(&mut self, amount: f32) {
        if self.alive {
            self.hp = (self.hp + amount).min(self.stats.max_hp);
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        (self.hp / self.stats.max_hp).clamp(0.0, 1.0)
    }

    pub fn equipped(&self) -> impl Iterator<Item = &Arc<Card>> + '_ {
        self.cards.iter().map(|e| &e.card)
    }

    pub fn free_slots(&self) -> usize {
        MAX_CARD_SLOTS - self.cards.len()
    }

    /// Put a card in a free slot and apply its effect. Returns false when all
    /// slots are taken.
    pub fn equip(&mut self, card: Arc<Card>) -> bool {
        if self.cards.len() >= MAX_CARD_SLOTS {
            log::debug!("Card slots full, {} not equipped", card.id);
            return false;
        }
        let effect = card.effect;
        let previous = self.stats.get(effect.stat);
        self.stats.set(effect.stat, effect.apply(previous));
        self.hp = self.hp.min(self.stats.max_hp);
        log::info!(
            "Equipped {} ({:?} {:.2} -> {:.2})",
            card.name,
            effect.stat,
            previous,
            self.stats.get(effect.stat)
        );
        self.cards.push(EquippedCard { card, previous });
        true
    }

    /// Remove an equipped card by id and undo its effect
    pub fn unequip(&mut self, card_id: &str) -> bool {
        let Some(index) = self.cards.iter().position(|e| e.card.id == card_id) else {
            return false;
        };
        let EquippedCard { card, previous } = self.cards.remove(index);
        let effect = card.effect;
        let current = self.stats.get(effect.stat);
        let restored = match effect.operation {
            Operation::Set => previous,
            _ => effect.revert(current).unwrap_or(previous),
        };
        self.stats.set(effect.stat, restored);
        self.hp = self.hp.min(self.stats.max_hp);
        log::info!("Unequipped {}", card.name);
        true
    }
}
