//! Sniper (ranged) archetype
//!
//! Three phases, always in this order:
//! - `Descending`: straight down until 30% of the playfield height
//! - `Stopped`: lateral patrol at constant height, fires at the player
//! - `Leaving`: straight down and off screen
//!
//! At AI level 2+ the sniper also takes opportunistic shots while moving,
//! at a reduced rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Shot;
use crate::consts::{SCREEN_HEIGHT, SNIPER_STOP_FRACTION};

/// Seconds between shots while stopped
pub const BASE_FIRE_RATE: f32 = 2.0;
/// Shot interval multiplier while descending (AI 2+)
const DESCENDING_FIRE_FACTOR: f32 = 2.0;
/// Shot interval multiplier while leaving (AI 2+)
const LEAVING_FIRE_FACTOR: f32 = 5.0;
/// Seconds spent stopped before leaving
pub const DWELL_TIME: f32 = 6.0;
/// Firing range at AI level 0; grows by `RANGE_PER_LEVEL`
pub const BASE_RANGE: f32 = 400.0;
pub const RANGE_PER_LEVEL: f32 = 100.0;
/// Straight-down shot speed at AI level 0
pub const STRAIGHT_SHOT_SPEED: f32 = 200.0;
/// Aimed shot speed at AI level 1+
pub const AIMED_SHOT_SPEED: f32 = 250.0;
/// Patrol lateral speed amplitude (px/s)
const PATROL_AMPLITUDE: f32 = 30.0;
/// Patrol angular frequency (rad/s)
const PATROL_FREQUENCY: f32 = 1.0;

/// Height at which a descending sniper stops
pub fn stop_height() -> f32 {
    SCREEN_HEIGHT * SNIPER_STOP_FRACTION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SniperPhase {
    #[default]
    Descending,
    Stopped,
    Leaving,
}

#[derive(Debug, Clone)]
pub struct SniperState {
    pub phase: SniperPhase,
    /// Baseline seconds between shots
    pub fire_rate: f32,
    /// Seconds until the next shot is allowed
    pub fire_timer: f32,
    /// Seconds spent in the current phase
    pub phase_time: f32,
}

impl Default for SniperState {
    fn default() -> Self {
        Self {
            phase: SniperPhase::Descending,
            fire_rate: BASE_FIRE_RATE,
            fire_timer: BASE_FIRE_RATE,
            phase_time: 0.0,
        }
    }
}

impl SniperState {
    pub fn reset(&mut self, _ai_level: u32) {
        *self = Self::default();
    }

    /// Advance phase timers; returns the velocity for this frame
    pub fn update(&mut self, dt: f32, pos: Vec2, speed: f32, _ai_level: u32) -> Vec2 {
        self.phase_time += dt;
        if self.fire_timer > 0.0 {
            self.fire_timer -= dt;
        }

        match self.phase {
            SniperPhase::Descending => {
                if pos.y >= stop_height() {
                    self.enter(SniperPhase::Stopped);
                    self.fire_timer = self.fire_timer.min(self.fire_rate);
                    Vec2::ZERO
                } else {
                    Vec2::new(0.0, speed)
                }
            }
            SniperPhase::Stopped => {
                if self.phase_time >= DWELL_TIME {
                    self.enter(SniperPhase::Leaving);
                    Vec2::new(0.0, speed)
                } else {
                    let patrol = (self.phase_time * PATROL_FREQUENCY).sin() * PATROL_AMPLITUDE;
                    Vec2::new(patrol, 0.0)
                }
            }
            SniperPhase::Leaving => Vec2::new(0.0, speed),
        }
    }

    fn enter(&mut self, phase: SniperPhase) {
        log::trace!("Sniper {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_time = 0.0;
    }

    /// Parked, shot timer elapsed
    pub fn can_fire(&self) -> bool {
        self.phase == SniperPhase::Stopped && self.fire_timer <= 0.0
    }

    /// Seconds between shots in the current phase
    pub fn fire_interval(&self) -> f32 {
        match self.phase {
            SniperPhase::Descending => self.fire_rate * DESCENDING_FIRE_FACTOR,
            SniperPhase::Stopped => self.fire_rate,
            SniperPhase::Leaving => self.fire_rate * LEAVING_FIRE_FACTOR,
        }
    }

    /// Range at which a parked sniper engages
    pub fn range(ai_level: u32) -> f32 {
        BASE_RANGE + ai_level as f32 * RANGE_PER_LEVEL
    }

    /// Fire if allowed this frame; resets the shot timer when it does
    pub fn try_fire(
        &mut self,
        pos: Vec2,
        radius: f32,
        damage: f32,
        ai_level: u32,
        player_pos: Option<Vec2>,
    ) -> Option<Shot> {
        let target = player_pos?;
        let allowed = match self.phase {
            SniperPhase::Stopped => {
                self.can_fire() && pos.distance(target) <= Self::range(ai_level)
            }
            SniperPhase::Descending | SniperPhase::Leaving => {
                ai_level >= 2 && self.fire_timer <= 0.0
            }
        };
        if !allowed {
            return None;
        }

        self.fire_timer = self.fire_interval();

        let straight = Vec2::new(0.0, STRAIGHT_SHOT_SPEED);
        let vel = if ai_level == 0 {
            straight
        } else {
            let dir = (target - pos).normalize_or_zero();
            if dir == Vec2::ZERO {
                straight
            } else {
                dir * AIMED_SHOT_SPEED
            }
        };

        Some(Shot {
            pos: pos + Vec2::new(0.0, radius),
            vel,
            damage,
        })
    }
}
