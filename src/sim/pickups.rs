//! Things the player picks up: ore collectibles and card drops

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use super::collision::circle_collision;
use super::player::Player;
use super::pool::Poolable;
use crate::cards::Card;
use crate::consts::{PICKUP_CULL_MARGIN, SCREEN_HEIGHT};

/// Ore falls at this speed (px/s)
pub const COLLECTIBLE_FALL_SPEED: f32 = 50.0;
pub const COLLECTIBLE_RADIUS: f32 = 6.0;
pub const COLLECTIBLE_LIFETIME: f32 = 15.0;
const COLLECTIBLE_BLINK_START: f32 = 10.0;
const COLLECTIBLE_BLINK_PERIOD: f32 = 0.2;
/// Random lateral impulse range (px/s)
const LATERAL_IMPULSE: i32 = 30;

pub const CARD_COLLECT_RADIUS: f32 = 40.0;
pub const CARD_LIFETIME: f32 = 30.0;
const CARD_BLINK_START: f32 = 20.0;
const CARD_BLINK_PERIOD: f32 = 0.3;
/// Seconds between collect attempts on the same drop
pub const CARD_COLLECT_COOLDOWN: f32 = 0.5;
/// Per-1/60 s damping of the initial toss
const CARD_DRIFT_DAMPING: f32 = 0.95;
const CARD_FALL_DAMPING: f32 = 0.90;
/// Falling stops below this speed (px/s)
const CARD_FALL_STOP: f32 = 5.0;
const CARD_FLOAT_SPEED: f32 = 2.0;
const CARD_FLOAT_AMPLITUDE: f32 = 4.0;

/// Visibility toggle for the expiry warning
#[derive(Debug, Clone, Copy, Default)]
struct Blink {
    timer: f32,
    hidden: bool,
}

impl Blink {
    fn update(&mut self, age: f32, start: f32, period: f32, dt: f32) {
        if age < start {
            return;
        }
        self.timer += dt;
        if self.timer >= period {
            self.timer = 0.0;
            self.hidden = !self.hidden;
        }
    }
}

/// Damping factor expressed per 1/60 s, applied over `dt`
fn damp(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * 60.0)
}

/// Falling ore dropped by dead enemies
#[derive(Debug, Clone, Default)]
pub struct Collectible {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ore carried
    pub value: u32,
    pub radius: f32,
    pub active: bool,
    /// Seconds since spawn
    pub age: f32,
    blink: Blink,
}

impl Collectible {
    pub fn spawn<R: Rng + ?Sized>(&mut self, pos: Vec2, value: u32, rng: &mut R) {
        let vx = rng.random_range(-LATERAL_IMPULSE..=LATERAL_IMPULSE) as f32;
        self.pos = pos;
        self.vel = Vec2::new(vx, COLLECTIBLE_FALL_SPEED);
        self.value = value;
        self.radius = COLLECTIBLE_RADIUS;
        self.age = 0.0;
        self.blink = Blink::default();
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;
        self.age += dt;
        self.blink.update(self.age, COLLECTIBLE_BLINK_START, COLLECTIBLE_BLINK_PERIOD, dt);

        if self.age >= COLLECTIBLE_LIFETIME || self.pos.y > SCREEN_HEIGHT + PICKUP_CULL_MARGIN {
            self.active = false;
        }
    }

    /// Player ship overlaps the ore
    pub fn touches(&self, player: &Player) -> bool {
        self.active
            && player.alive
            && circle_collision(self.pos, self.radius, player.pos, player.hitbox_radius)
    }

    /// Take the ore; returns its value
    pub fn collect(&mut self) -> u32 {
        self.active = false;
        self.value
    }

    pub fn is_visible(&self) -> bool {
        self.active && !(self.age >= COLLECTIBLE_BLINK_START && self.blink.hidden)
    }
}

impl Poolable for Collectible {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Outcome of pressing collect near a card drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Card equipped, drop consumed
    Equipped,
    /// Player has no free card slot
    SlotsFull,
    /// Too far, cooling down, or nothing to collect
    Ignored,
}

/// A card lying in the playfield waiting to be picked up
#[derive(Debug, Clone, Default)]
pub struct CardDrop {
    pub pos: Vec2,
    pub vel: Vec2,
    pub card: Option<Arc<Card>>,
    pub active: bool,
    pub age: f32,
    /// Seconds until another collect attempt is accepted
    pub collect_cooldown: f32,
    /// Vertical bob once the drop has settled
    pub float_offset: f32,
    float_clock: f32,
    blink: Blink,
}

impl CardDrop {
    pub fn spawn<R: Rng + ?Sized>(&mut self, pos: Vec2, card: Arc<Card>, rng: &mut R) {
        let vx = rng.random_range(-LATERAL_IMPULSE..=LATERAL_IMPULSE) as f32;
        log::debug!(
            "Card dropped: {} ({:?}) at ({:.0}, {:.0})",
            card.name,
            card.rarity,
            pos.x,
            pos.y
        );
        self.pos = pos;
        self.vel = Vec2::new(vx, COLLECTIBLE_FALL_SPEED);
        self.card = Some(card);
        self.age = 0.0;
        self.collect_cooldown = 0.0;
        self.float_offset = 0.0;
        self.float_clock = 0.0;
        self.blink = Blink::default();
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;
        self.vel.x *= damp(CARD_DRIFT_DAMPING, dt);
        if self.vel.y > 0.0 {
            self.vel.y *= damp(CARD_FALL_DAMPING, dt);
            if self.vel.y < CARD_FALL_STOP {
                self.vel.y = 0.0;
            }
        }
        if self.vel.y == 0.0 {
            self.float_clock += dt;
            self.float_offset = (self.float_clock * CARD_FLOAT_SPEED).sin() * CARD_FLOAT_AMPLITUDE;
        }

        self.age += dt;
        self.blink.update(self.age, CARD_BLINK_START, CARD_BLINK_PERIOD, dt);
        if self.collect_cooldown > 0.0 {
            self.collect_cooldown = (self.collect_cooldown - dt).max(0.0);
        }

        if self.age >= CARD_LIFETIME {
            if let Some(card) = &self.card {
                log::debug!("Card drop {} expired", card.name);
            }
            Poolable::deactivate(self);
        } else if self.pos.y > SCREEN_HEIGHT + PICKUP_CULL_MARGIN {
            Poolable::deactivate(self);
        }
    }

    pub fn in_range(&self, player_pos: Vec2) -> bool {
        self.pos.distance_squared(player_pos) <= CARD_COLLECT_RADIUS * CARD_COLLECT_RADIUS
    }

    pub fn can_collect(&self) -> bool {
        self.active && self.card.is_some() && self.collect_cooldown <= 0.0
    }

    /// Collect attempt from the player. Any attempt that reaches the player's
    /// card slots starts the cooldown.
    pub fn try_collect(&mut self, player: &mut Player) -> CollectOutcome {
        if !player.alive || !self.can_collect() || !self.in_range(player.pos) {
            return CollectOutcome::Ignored;
        }
        let Some(card) = self.card.clone() else {
            return CollectOutcome::Ignored;
        };
        self.collect_cooldown = CARD_COLLECT_COOLDOWN;
        if player.equip(card) {
            Poolable::deactivate(self);
            CollectOutcome::Equipped
        } else {
            CollectOutcome::SlotsFull
        }
    }

    pub fn is_visible(&self) -> bool {
        self.active && !(self.age >= CARD_BLINK_START && self.blink.hidden)
    }

    /// Where the renderer draws the card, bob included
    pub fn render_pos(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, self.float_offset)
    }
}

impl Poolable for CardDrop {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.card = None;
    }
}
