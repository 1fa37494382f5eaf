//! Game state
//!
//! Everything the simulation owns for one run. All randomness goes through
//! the run's seeded RNG so a seed plus an input sequence reproduces a run.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::{DirectorEvent, WaveDirector};
use super::enemy::{EnemyHandle, EnemyRoster};
use super::loot::LootTable;
use super::pickups::{CardDrop, Collectible};
use super::player::Player;
use super::pool::Pool;
use super::projectile::Projectile;
use super::snapshot::RenderSnapshot;
use crate::cards::CardCatalog;
use crate::consts::{CARD_DROP_POOL_SIZE, COLLECTIBLE_POOL_SIZE, PROJECTILE_POOL_SIZE};
use crate::settings::Settings;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until pause is pressed again
    Paused,
    /// Player destroyed
    GameOver,
}

/// Running totals for the HUD and the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Ore picked up
    pub ore: u32,
    pub kills: u32,
    pub shots_fired: u32,
    pub cards_collected: u32,
    pub sectors_cleared: u32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub catalog: CardCatalog,
    pub loot: LootTable,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub projectiles: Pool<Projectile>,
    pub enemies: EnemyRoster,
    pub collectibles: Pool<Collectible>,
    pub card_drops: Pool<CardDrop>,
    pub director: WaveDirector,
    pub stats: RunStats,
    /// Director events raised during the last tick
    pub events: Vec<DirectorEvent>,
    /// Reusable enemy enumeration buffer for collision resolution
    pub(crate) scratch: Vec<EnemyHandle>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: Settings, catalog: CardCatalog) -> Self {
        log::info!(
            "New run with seed {} ({} cards available)",
            seed,
            catalog.len()
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            catalog,
            loot: LootTable::default(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::default(),
            projectiles: Pool::with_capacity(PROJECTILE_POOL_SIZE),
            enemies: EnemyRoster::new(),
            collectibles: Pool::with_capacity(COLLECTIBLE_POOL_SIZE),
            card_drops: Pool::with_capacity(CARD_DROP_POOL_SIZE),
            director: WaveDirector::new(),
            stats: RunStats::default(),
            events: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Default settings and no cards; convenient for tests and tools
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Settings::default(), CardCatalog::empty())
    }

    /// Elapsed simulated seconds
    pub fn elapsed(&self) -> f32 {
        self.time_ticks as f32 * crate::consts::SIM_DT
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Fill a renderer snapshot, reusing its buffers
    pub fn snapshot_into(&self, snapshot: &mut RenderSnapshot) {
        snapshot.capture(self);
    }
}
