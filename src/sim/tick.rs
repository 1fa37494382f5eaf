//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! frame, and the subsystems always run in the same order:
//!
//! 1. input sampling (pause toggle)
//! 2. player movement and auto-fire
//! 3. projectiles
//! 4. enemy AI, sniper shots, spawner children
//! 5. collision resolution
//! 6. death drops, then pool recycling
//! 7. wave director
//! 8. collectibles and card drops

use super::collision::resolve_collisions;
use super::director::DirectorEvent;
use super::input::{Button, InputSource};
use super::pickups::CollectOutcome;
use super::state::{GamePhase, GameState};

/// Only one ship is simulated
const PLAYER: usize = 0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &impl InputSource, dt: f32) {
    // Handle pause toggle
    if input.is_pressed(Button::Pause, PLAYER) {
        match state.phase {
            GamePhase::Playing => {
                log::debug!("Paused at tick {}", state.time_ticks);
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                log::debug!("Resumed at tick {}", state.time_ticks);
                state.phase = GamePhase::Playing;
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.events.clear();
    state.time_ticks += 1;

    state.player.update(dt, input.movement(PLAYER));
    state.stats.shots_fired += state.player.fire(&mut state.projectiles);

    state.projectiles.update_all(|p| p.update(dt));

    let target = state.player.alive.then_some(state.player.pos);
    state
        .enemies
        .update_all(dt, target, &mut state.projectiles, &mut state.rng);

    let hits = resolve_collisions(
        &mut state.player,
        &mut state.enemies,
        &mut state.projectiles,
        &mut state.scratch,
    );
    state.stats.kills += hits.kills;

    emit_death_drops(state);
    state.enemies.reclaim();
    state.projectiles.reclaim();

    state
        .director
        .update(dt, &mut state.enemies, &mut state.rng, &mut state.events);
    for event in &state.events {
        if let DirectorEvent::SectorComplete { .. } = event {
            state.stats.sectors_cleared += 1;
        }
    }

    update_pickups(state, input.is_pressed(Button::Collect, PLAYER), dt);

    if !state.player.alive {
        log::info!(
            "Game over in sector {} after {:.1}s: {} kills, {} ore",
            state.director.sector(),
            state.elapsed(),
            state.stats.kills,
            state.stats.ore
        );
        state.phase = GamePhase::GameOver;
    }
}

/// Loot for every enemy that died this step, emitted once per death
fn emit_death_drops(state: &mut GameState) {
    let GameState {
        enemies,
        loot,
        catalog,
        collectibles,
        card_drops,
        rng,
        ..
    } = state;

    enemies.drain_dead(|enemy| {
        loot.emit(enemy, collectibles, card_drops, catalog, rng);
    });
}

fn update_pickups(state: &mut GameState, collect_pressed: bool, dt: f32) {
    let GameState {
        player,
        collectibles,
        card_drops,
        stats,
        ..
    } = state;

    collectibles.update_all(|ore| {
        ore.update(dt);
        if ore.touches(player) {
            stats.ore += ore.collect();
        }
    });

    card_drops.update_all(|drop| drop.update(dt));

    if collect_pressed {
        // First drop in range answers the press
        for (_, drop) in card_drops.iter_mut() {
            match drop.try_collect(player) {
                CollectOutcome::Equipped => {
                    stats.cards_collected += 1;
                    log::info!("Card equipped ({} free slots)", player.free_slots());
                    break;
                }
                CollectOutcome::SlotsFull => {
                    log::debug!("Card slots full");
                    break;
                }
                CollectOutcome::Ignored => {}
            }
        }
        card_drops.reclaim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCatalog, CardKind, Effect, Operation, Rarity, Stat};
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::enemy::{Archetype, StatScaling};
    use crate::sim::input::TickInput;
    use crate::sim::snapshot::RenderSnapshot;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::sync::Arc;

    fn card() -> Arc<Card> {
        Arc::new(Card {
            id: "overclock".into(),
            name: "Overclock".into(),
            rarity: Rarity::Uncommon,
            kind: CardKind::Passive,
            description: String::new(),
            effect: Effect {
                stat: Stat::FireRate,
                operation: Operation::Multiply,
                value: 0.8,
            },
        })
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::with_seed(12345);
        let idle = TickInput::default();
        tick(&mut state, &idle, SIM_DT);
        assert_eq!(state.time_ticks, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 1);

        // Frozen while paused
        tick(&mut state, &idle, SIM_DT);
        assert_eq!(state.time_ticks, 1);

        // Unpause resumes in the same tick
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_rush_descends_toward_player() {
        let mut state = GameState::with_seed(7);
        let start = state.player.pos + Vec2::new(100.0, -470.0);
        let rush = state
            .enemies
            .spawn(Archetype::Rush, start, 0, StatScaling::IDENTITY);
        let speed = state.enemies.get(rush).unwrap().speed;

        tick(&mut state, &TickInput::default(), SIM_DT);

        let enemy = state.enemies.get(rush).unwrap();
        assert!((enemy.pos.y - (start.y + speed * SIM_DT)).abs() < 1e-3);
        assert!(enemy.vel.x < 0.0, "steers toward the player");
        assert!(enemy.vel.x.abs() <= speed * 0.1 + 1e-4);
    }

    #[test]
    fn test_rush_directly_above_holds_course() {
        let mut state = GameState::with_seed(7);
        // Hold fire so nothing shoots the rush down
        state.player.fire_timer = f32::MAX;
        let start = state.player.pos + Vec2::new(0.0, -470.0);
        let rush = state
            .enemies
            .spawn(Archetype::Rush, start, 0, StatScaling::IDENTITY);
        let speed = state.enemies.get(rush).unwrap().speed;

        // About a second, still short of the director's first spawn
        let mut prev_y = start.y;
        for step in 1..=60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let t = step as f32 * SIM_DT;
            let enemy = state.enemies.get(rush).expect("rush still on the field");
            assert!(
                (enemy.pos.y - prev_y - speed * SIM_DT).abs() < 1e-3,
                "step {step}: descent {} per tick",
                enemy.pos.y - prev_y
            );
            assert!(
                (enemy.pos.x - state.player.pos.x).abs() <= 0.1 * speed * t + 1e-3,
                "step {step}: drifted to x={}",
                enemy.pos.x
            );
            prev_y = enemy.pos.y;
        }
        assert_eq!(state.enemies.active_count(), 1);
    }

    #[test]
    fn test_kill_drops_loot_once() {
        let mut state = GameState::with_seed(21);
        let pos = Vec2::new(200.0, 200.0);
        state
            .enemies
            .spawn(Archetype::Rush, pos, 0, StatScaling::IDENTITY);
        let (_, shot) = state.projectiles.acquire();
        shot.spawn_player(pos, 1000.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.stats.kills, 1);
        assert_eq!(state.enemies.active_count(), 0);
        assert_eq!(state.collectibles.active_count(), 1);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.collectibles.active_count(), 1);
        assert_eq!(state.stats.kills, 1);
    }

    #[test]
    fn test_ore_collected_on_touch() {
        let mut state = GameState::with_seed(5);
        let player_pos = state.player.pos;
        let (_, ore) = state.collectibles.acquire();
        ore.spawn(player_pos, 10, &mut Pcg32::seed_from_u64(1));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.stats.ore, 10);
        assert_eq!(state.collectibles.active_count(), 0);
    }

    #[test]
    fn test_card_collected_on_press() {
        let mut state = GameState::with_seed(5);
        let player_pos = state.player.pos;
        let (_, drop) = state.card_drops.acquire();
        drop.spawn(player_pos, card(), &mut Pcg32::seed_from_u64(1));

        // Not collected without the button
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.card_drops.active_count(), 1);

        let collect = TickInput {
            collect: true,
            ..Default::default()
        };
        tick(&mut state, &collect, SIM_DT);
        assert_eq!(state.card_drops.active_count(), 0);
        assert_eq!(state.stats.cards_collected, 1);
        assert_eq!(state.player.equipped().count(), 1);
        assert!((state.player.stats.fire_rate - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_game_over() {
        let mut state = GameState::with_seed(9);
        state.player.hp = 5.0;
        let player_pos = state.player.pos;
        let (_, shot) = state.projectiles.acquire();
        shot.spawn_enemy(player_pos, Vec2::ZERO, 20.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.player.alive);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_director_runs_from_tick() {
        let mut state = GameState::with_seed(4);
        // Keep the player out of harm's way
        state.player.invincible_timer = f32::MAX;
        for _ in 0..80 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.director.spawned() > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let catalog = CardCatalog::from_cards(vec![(*card()).clone()]).unwrap();
        let mut state1 = GameState::new(99999, Settings::default(), catalog.clone());
        let mut state2 = GameState::new(99999, Settings::default(), catalog);

        for i in 0..1200 {
            let phase = i as f32 * 0.02;
            let input = TickInput {
                movement: Vec2::new(phase.sin(), (phase * 0.7).cos() * 0.3),
                collect: i % 30 == 0,
                pause: false,
            };
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        let mut snap1 = RenderSnapshot::new();
        let mut snap2 = RenderSnapshot::new();
        state1.snapshot_into(&mut snap1);
        state2.snapshot_into(&mut snap2);
        assert_eq!(
            serde_json::to_string(&snap1).unwrap(),
            serde_json::to_string(&snap2).unwrap()
        );
        assert_eq!(state1.stats, state2.stats);
    }
}
