//! Sector Shooter headless runner
//!
//! Loads settings and card data, then plays a run with a scripted autopilot
//! through the fixed-timestep loop a frontend would use. Useful for soak
//! testing the simulation and reproducing seeds.
//!
//! Usage: `sector-shooter [--seconds N] [--seed N] [--settings PATH]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
use glam::Vec2;

use sector_shooter::consts::*;
use sector_shooter::sim::{GameState, Player, RenderSnapshot, TickInput, tick};
use sector_shooter::{CardCatalog, Settings};

/// Frame time of the pretend display driving the loop
const FRAME_DT: f32 = 1.0 / 50.0;
/// Keep this far below enemies when lining up a shot
const ENGAGE_DISTANCE: f32 = 250.0;

/// Stands in for a human: lines up under the lowest enemy, backs off when
/// something gets close, grabs cards in reach.
#[derive(Debug, Default)]
struct Autopilot;

impl Autopilot {
    fn plan(&mut self, state: &GameState) -> TickInput {
        let player = state.player.pos;

        let target = state
            .enemies
            .iter()
            .filter(|(_, e)| e.is_alive() && e.pos.y < player.y)
            .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
            .map(|(_, e)| e.pos);

        let mut movement = Vec2::ZERO;
        if let Some(enemy) = target {
            movement.x = (enemy.x - player.x).clamp(-1.0, 1.0);
            if player.y - enemy.y < ENGAGE_DISTANCE {
                movement.y = 1.0;
            }
        } else {
            // Drift back to the start position between waves
            let home = Player::start_position() - player;
            movement = home.clamp_length_max(1.0);
        }

        let collect = state
            .card_drops
            .iter()
            .any(|(_, d)| d.can_collect() && d.in_range(player));

        TickInput {
            movement,
            collect,
            pause: false,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "sector-shooter")]
#[command(about = "Play a headless Sector Shooter run with a scripted pilot")]
struct Args {
    /// Simulated wall time in seconds
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Run seed; overrides the one in the settings file
    #[arg(long)]
    seed: Option<u64>,
    /// Settings file (JSON)
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
}

/// Command line first, then settings, then the clock
fn run_seed(cli_seed: Option<u64>, settings: &Settings) -> u64 {
    cli_seed.or(settings.seed).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sector Shooter (headless) starting...");

    let args = Args::parse();
    if args.seconds <= 0.0 {
        log::warn!("Nothing to simulate for {}s", args.seconds);
        return;
    }
    let run_seconds = args.seconds;

    let settings = Settings::load_or_default(&args.settings);
    let catalog = CardCatalog::load_or_empty(&settings.card_data_path);
    let seed = run_seed(args.seed, &settings);
    let mut state = GameState::new(seed, settings, catalog);

    let mut autopilot = Autopilot;
    let mut snapshot = RenderSnapshot::new();
    let mut accumulator = 0.0;
    let mut frames: u64 = 0;
    let mut wall = 0.0;

    while wall < run_seconds && !state.is_over() {
        let dt = FRAME_DT.min(MAX_FRAME_DT);
        wall += dt;
        accumulator += dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot.plan(&state);
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            for event in &state.events {
                log::debug!("{:?}", event);
            }
        }

        state.snapshot_into(&mut snapshot);
        frames += 1;
        if frames % 500 == 0 {
            log::info!(
                "t={:.0}s sector {} ({:?}): {} enemies, {} shots, hp {:.0}/{:.0}",
                state.elapsed(),
                snapshot.hud.sector,
                snapshot.hud.director_phase,
                snapshot.enemies.len(),
                snapshot.projectiles.len(),
                snapshot.hud.hp,
                snapshot.hud.max_hp
            );
        }
    }

    let stats = state.stats;
    log::info!(
        "Run over (seed {}): sector {}, {:.1}s, {} kills, {} ore, {} cards, {} shots fired",
        state.seed,
        state.director.sector(),
        state.elapsed(),
        stats.kills,
        stats.ore,
        stats.cards_collected,
        stats.shots_fired
    );
    if !snapshot.hud.cards.is_empty() {
        log::info!("Equipped: {}", snapshot.hud.cards.join(", "));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser frontends drive `tick` themselves
}
