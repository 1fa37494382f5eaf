//! Collision detection and damage resolution for one step
//!
//! Everything is a circle. Resolution runs in three passes:
//! 1. Player body vs enemies (contact destroys the enemy outright)
//! 2. Player projectiles vs enemies, with the pierce cap
//! 3. Enemy projectiles vs the player

use glam::Vec2;

use super::enemy::{EnemyHandle, EnemyRoster};
use super::player::Player;
use super::pool::Pool;
use super::projectile::{Owner, Projectile};

/// Circles overlap. Tangent circles (distance exactly r1 + r2) do not.
#[inline]
pub fn circle_collision(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Hits that actually damaged the player
    pub player_hits: u32,
    /// Enemy hits from contact and projectiles
    pub enemies_hit: u32,
    /// Enemies killed by this pass, spawner children excluded
    pub kills: u32,
    /// Projectiles consumed by hits
    pub projectiles_removed: u32,
}

/// Resolve every collision for the current step.
///
/// `scratch` is a reusable buffer for the enemy enumeration.
pub fn resolve_collisions(
    player: &mut Player,
    roster: &mut EnemyRoster,
    projectiles: &mut Pool<Projectile>,
    scratch: &mut Vec<EnemyHandle>,
) -> CollisionStats {
    let mut stats = CollisionStats::default();
    roster.collect_handles(scratch);

    resolve_body_contact(player, roster, scratch, &mut stats);
    resolve_player_shots(player, roster, projectiles, scratch, &mut stats);
    resolve_enemy_shots(player, projectiles, &mut stats);

    stats
}

fn resolve_body_contact(
    player: &mut Player,
    roster: &mut EnemyRoster,
    order: &[EnemyHandle],
    stats: &mut CollisionStats,
) {
    for &target in order {
        if !player.alive {
            return;
        }
        let Some(enemy) = roster.get(target) else {
            continue;
        };
        if !enemy.is_alive()
            || !circle_collision(player.pos, player.hitbox_radius, enemy.pos, enemy.radius)
        {
            continue;
        }
        let damage = enemy.damage;
        if player.take_damage(damage) {
            stats.player_hits += 1;
        }
        if roster.kill(target) {
            stats.enemies_hit += 1;
            stats.kills += 1;
        }
    }
}

fn resolve_player_shots(
    player: &mut Player,
    roster: &mut EnemyRoster,
    projectiles: &mut Pool<Projectile>,
    order: &[EnemyHandle],
    stats: &mut CollisionStats,
) {
    let max_hits = 1 + player.stats.pierce;

    for (_, shot) in projectiles.iter_mut() {
        if !shot.active || shot.owner != Owner::Player {
            continue;
        }

        let mut hits = 0;
        for &target in order {
            if hits >= max_hits {
                break;
            }
            let Some(enemy) = roster.get(target) else {
                continue;
            };
            if !enemy.is_alive() || !circle_collision(shot.pos, shot.radius, enemy.pos, enemy.radius)
            {
                continue;
            }

            let dealt = shot.damage.min(enemy.hp);
            if roster.damage(target, shot.damage) {
                stats.kills += 1;
            }
            stats.enemies_hit += 1;
            hits += 1;

            if player.stats.lifesteal > 0.0 {
                player.heal(dealt * player.stats.lifesteal);
            }
        }

        if hits > 0 {
            shot.active = false;
            stats.projectiles_removed += 1;
        }
    }
}

fn resolve_enemy_shots(
    player: &mut Player,
    projectiles: &mut Pool<Projectile>,
    stats: &mut CollisionStats,
) {
    for (_, shot) in projectiles.iter_mut() {
        if !player.alive {
            return;
        }
        if !shot.active
            || shot.owner != Owner::Enemy
            || !circle_collision(shot.pos, shot.radius, player.pos, player.hitbox_radius)
        {
            continue;
        }
        if player.take_damage(shot.damage) {
            stats.player_hits += 1;
        }
        shot.active = false;
        stats.projectiles_removed += 1;
    }
}
