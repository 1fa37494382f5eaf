//! Enemies: shared lifecycle plus per-archetype behavior
//!
//! Every enemy is one `Enemy` struct; what differs between archetypes lives
//! in the [`Behavior`] payload. The lifecycle is explicit:
//!
//! ```text
//! Pooled --spawn--> Alive --die--> Dead --deactivate--> Inactive --pool--> Pooled
//!                     \--------------leaves playfield------^
//! ```
//!
//! `Dead` lasts for the rest of the frame the enemy died in, until the step
//! coordinator has emitted its loot and deactivates it.

pub mod roster;
pub mod rush;
pub mod sniper;
pub mod spawner;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Handle, Poolable};
use crate::consts::{ENEMY_CULL_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};

pub use roster::EnemyRoster;
pub use rush::RushState;
pub use sniper::{SniperPhase, SniperState};
pub use spawner::{OrbitChild, SpawnerState};

/// Enemy behavior kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Kamikaze that dives at the player
    Rush,
    /// Ranged shooter that parks and fires
    Sniper,
    /// Slow mother ship that spawns orbiting children
    Spawner,
}

impl Archetype {
    /// Enumeration order used everywhere enemies are walked
    pub const ALL: [Archetype; 3] = [Archetype::Rush, Archetype::Sniper, Archetype::Spawner];

    /// Sector-1 baseline stats
    pub fn base_stats(self) -> BaseStats {
        match self {
            Archetype::Rush => BaseStats {
                max_hp: 30.0,
                speed: 150.0,
                damage: 20.0,
                value: 10,
                radius: 12.0,
            },
            Archetype::Sniper => BaseStats {
                max_hp: 45.0,
                speed: 60.0,
                damage: 10.0,
                value: 20,
                radius: 16.0,
            },
            Archetype::Spawner => BaseStats {
                max_hp: 100.0,
                speed: 40.0,
                damage: 25.0,
                value: 50,
                radius: 24.0,
            },
        }
    }
}

/// Baseline stats for an archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub max_hp: f32,
    pub speed: f32,
    pub damage: f32,
    /// Ore carried as loot
    pub value: u32,
    pub radius: f32,
}

/// Lifecycle of a pooled enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Sitting in the pool's available set
    #[default]
    Pooled,
    /// Simulated, collidable, rendered
    Alive,
    /// Killed this frame; waiting for its loot to be emitted
    Dead,
    /// Switched off; the pool takes it back on its next pass
    Inactive,
}

/// Reference from one enemy to another across the archetype pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnemyHandle {
    pub archetype: Archetype,
    pub handle: Handle,
}

/// Per-archetype state
#[derive(Debug, Clone)]
pub enum Behavior {
    Rush(RushState),
    Sniper(SniperState),
    Spawner(SpawnerState),
}

/// Projectile an enemy wants to fire this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
}

/// Multiplicative per-sector stat boosts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatScaling {
    pub hp: f32,
    pub speed: f32,
    pub damage: f32,
}

impl StatScaling {
    pub const IDENTITY: StatScaling = StatScaling {
        hp: 1.0,
        speed: 1.0,
        damage: 1.0,
    };
}

/// Children are shrunk to about a third of their parent-independent stats
const CHILD_STAT_DIVISOR: f32 = 3.0;
const CHILD_MIN_HP: f32 = 10.0;
const CHILD_MIN_SPEED: f32 = 50.0;
const CHILD_MIN_DAMAGE: f32 = 5.0;
const CHILD_MIN_VALUE: u32 = 3;
const CHILD_RADIUS: f32 = 8.0;

/// A pooled enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: EnemyState,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: f32,
    pub speed: f32,
    /// Ore dropped on death
    pub value: u32,
    pub ai_level: u32,
    /// Loot already emitted for the current life
    pub has_dropped: bool,
    /// Spawned by a spawner rather than the wave director
    pub is_child: bool,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(archetype: Archetype) -> Self {
        let stats = archetype.base_stats();
        let behavior = match archetype {
            Archetype::Rush => Behavior::Rush(RushState::default()),
            Archetype::Sniper => Behavior::Sniper(SniperState::default()),
            Archetype::Spawner => Behavior::Spawner(SpawnerState::default()),
        };
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: stats.radius,
            state: EnemyState::Pooled,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            damage: stats.damage,
            speed: stats.speed,
            value: stats.value,
            ai_level: 0,
            has_dropped: false,
            is_child: false,
            behavior,
        }
    }

    /// Pool factories
    pub fn new_rush() -> Self {
        Self::new(Archetype::Rush)
    }

    pub fn new_sniper() -> Self {
        Self::new(Archetype::Sniper)
    }

    pub fn new_spawner() -> Self {
        Self::new(Archetype::Spawner)
    }

    pub fn archetype(&self) -> Archetype {
        match self.behavior {
            Behavior::Rush(_) => Archetype::Rush,
            Behavior::Sniper(_) => Archetype::Sniper,
            Behavior::Spawner(_) => Archetype::Spawner,
        }
    }

    /// Alive or dead-pending-drop: still counted by the pool
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, EnemyState::Alive | EnemyState::Dead)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    /// Bring the enemy to life at `pos` with baseline stats for its archetype
    pub fn spawn(&mut self, pos: Vec2, ai_level: u32) {
        let stats = self.archetype().base_stats();
        self.pos = pos;
        self.vel = Vec2::new(0.0, stats.speed);
        self.radius = stats.radius;
        self.max_hp = stats.max_hp;
        self.hp = stats.max_hp;
        self.speed = stats.speed;
        self.damage = stats.damage;
        self.value = stats.value;
        self.ai_level = ai_level;
        self.has_dropped = false;
        self.is_child = false;
        self.state = EnemyState::Alive;

        match &mut self.behavior {
            Behavior::Rush(rush) => rush.reset(),
            Behavior::Sniper(sniper) => sniper.reset(ai_level),
            Behavior::Spawner(spawner) => spawner.reset(ai_level),
        }
    }

    /// Apply sector scaling on top of the baseline stats (floored)
    pub fn apply_scaling(&mut self, scaling: StatScaling) {
        self.max_hp = (self.max_hp * scaling.hp).floor();
        self.hp = self.max_hp;
        self.speed = (self.speed * scaling.speed).floor();
        self.damage = (self.damage * scaling.damage).floor();
    }

    /// Turn a freshly spawned enemy into a spawner's smaller child
    pub fn shrink_to_child(&mut self) {
        self.max_hp = (self.max_hp / CHILD_STAT_DIVISOR).floor().max(CHILD_MIN_HP);
        self.hp = self.max_hp;
        self.speed = (self.speed / CHILD_STAT_DIVISOR).floor().max(CHILD_MIN_SPEED);
        self.damage = (self.damage / CHILD_STAT_DIVISOR).floor().max(CHILD_MIN_DAMAGE);
        self.value = (self.value / CHILD_STAT_DIVISOR as u32).max(CHILD_MIN_VALUE);
        self.radius = CHILD_RADIUS;
        self.is_child = true;
    }

    /// Advance movement and archetype timers. Does nothing unless alive.
    pub fn update(&mut self, dt: f32, player_pos: Option<Vec2>) {
        if !self.is_alive() {
            return;
        }

        match &mut self.behavior {
            Behavior::Rush(_) => {
                self.vel = rush::velocity(self.pos, self.speed, self.ai_level, player_pos);
            }
            Behavior::Sniper(sniper) => {
                self.vel = sniper.update(dt, self.pos, self.speed, self.ai_level);
            }
            Behavior::Spawner(spawner) => {
                self.vel = spawner.update(dt, self.speed);
            }
        }

        self.pos += self.vel * dt;

        if self.pos.y > SCREEN_HEIGHT + ENEMY_CULL_MARGIN
            || self.pos.x < -ENEMY_CULL_MARGIN
            || self.pos.x > SCREEN_WIDTH + ENEMY_CULL_MARGIN
        {
            self.deactivate();
        }
    }

    /// Reduce hp; returns true when this hit killed the enemy
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.die();
            return true;
        }
        false
    }

    /// Alive -> Dead. Spawner children are cascaded by the roster.
    pub fn die(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.hp = 0.0;
        self.state = EnemyState::Dead;
        log::debug!(
            "{:?} died at ({:.0}, {:.0})",
            self.archetype(),
            self.pos.x,
            self.pos.y
        );
    }

    /// Switch off; the pool reclaims it
    pub fn deactivate(&mut self) {
        if self.state != EnemyState::Pooled {
            self.state = EnemyState::Inactive;
        }
        if let Behavior::Spawner(spawner) = &mut self.behavior {
            spawner.release_children();
        }
    }

    /// Sniper firing gate (false for other archetypes)
    pub fn can_fire(&self) -> bool {
        match &self.behavior {
            Behavior::Sniper(sniper) => self.is_alive() && sniper.can_fire(),
            _ => false,
        }
    }

    /// Fire if the archetype wants to this frame, resetting its shot timer
    pub fn try_fire(&mut self, player_pos: Option<Vec2>) -> Option<Shot> {
        if !self.is_alive() {
            return None;
        }
        match &mut self.behavior {
            Behavior::Sniper(sniper) => {
                sniper.try_fire(self.pos, self.radius, self.damage, self.ai_level, player_pos)
            }
            _ => None,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new(Archetype::Rush)
    }
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        Enemy::is_active(self)
    }

    fn deactivate(&mut self) {
        Enemy::deactivate(self);
        self.state = EnemyState::Pooled;
    }
}
