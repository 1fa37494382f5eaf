//! Rush (kamikaze) archetype: always descends, steering toward the player
//! harder as its AI level rises.

use glam::Vec2;

use crate::steer_toward;

/// Lateral correction as a fraction of speed at AI level 0
const LEVEL0_CORRECTION: f32 = 0.1;
const LEVEL0_DEAD_ZONE: f32 = 20.0;
/// Lateral correction at AI level 1
const LEVEL1_CORRECTION: f32 = 0.3;
const LEVEL1_DEAD_ZONE: f32 = 10.0;
/// Directional bias underneath the zig-zag at AI level 2+
const ZIGZAG_BIAS: f32 = 0.4;
const ZIGZAG_DEAD_ZONE: f32 = 10.0;
/// Zig-zag phase per pixel of descent
const ZIGZAG_FREQUENCY: f32 = 0.03;
/// Zig-zag lateral speed amplitude (px/s)
const ZIGZAG_AMPLITUDE: f32 = 50.0;

/// Rush enemies carry no state beyond the shared enemy fields
#[derive(Debug, Clone, Default)]
pub struct RushState;

impl RushState {
    pub fn reset(&mut self) {}
}

/// Velocity for this frame
pub fn velocity(pos: Vec2, speed: f32, ai_level: u32, player_pos: Option<Vec2>) -> Vec2 {
    let vx = match ai_level {
        0 => player_pos.map_or(0.0, |p| {
            steer_toward(pos.x, p.x, LEVEL0_DEAD_ZONE) * speed * LEVEL0_CORRECTION
        }),
        1 => player_pos.map_or(0.0, |p| {
            steer_toward(pos.x, p.x, LEVEL1_DEAD_ZONE) * speed * LEVEL1_CORRECTION
        }),
        _ => {
            let zigzag = (pos.y * ZIGZAG_FREQUENCY).sin() * ZIGZAG_AMPLITUDE;
            let bias = player_pos.map_or(0.0, |p| {
                steer_toward(pos.x, p.x, ZIGZAG_DEAD_ZONE) * speed * ZIGZAG_BIAS
            });
            bias + zigzag
        }
    };
    Vec2::new(vx, speed)
}
