//! Input as the simulation sees it
//!
//! Device polling and key mapping live outside the crate. The simulation only
//! asks for a movement direction and a couple of logical buttons.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Pick up a nearby card drop
    Collect,
    /// Toggle pause (edge-triggered: true only on the press tick)
    Pause,
}

pub trait InputSource {
    /// Movement direction for a player, length at most 1
    fn movement(&self, player_index: usize) -> Vec2;

    fn is_pressed(&self, button: Button, player_index: usize) -> bool;
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Raw movement direction; longer vectors are normalized
    pub movement: Vec2,
    pub collect: bool,
    pub pause: bool,
}

impl TickInput {
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Default::default()
        }
    }
}

impl InputSource for TickInput {
    fn movement(&self, player_index: usize) -> Vec2 {
        if player_index != 0 {
            return Vec2::ZERO;
        }
        self.movement.clamp_length_max(1.0)
    }

    fn is_pressed(&self, button: Button, player_index: usize) -> bool {
        if player_index != 0 {
            return false;
        }
        match button {
            Button::Collect => self.collect,
            Button::Pause => self.pause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_is_normalized() {
        let input = TickInput::moving(Vec2::new(1.0, 1.0));
        assert!((input.movement(0).length() - 1.0).abs() < 1e-6);
        let slow = TickInput::moving(Vec2::new(0.5, 0.0));
        assert_eq!(slow.movement(0), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_single_player_only() {
        let input = TickInput {
            movement: Vec2::X,
            collect: true,
            pause: false,
        };
        assert_eq!(input.movement(1), Vec2::ZERO);
        assert!(input.is_pressed(Button::Collect, 0));
        assert!(!input.is_pressed(Button::Collect, 1));
        assert!(!input.is_pressed(Button::Pause, 0));
    }
}
