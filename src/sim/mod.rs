//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (acquire order per pool, rush before sniper before spawner)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod director;
pub mod enemy;
pub mod input;
pub mod loot;
pub mod pickups;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionStats, circle_collision, resolve_collisions};
pub use director::{DirectorEvent, DirectorPhase, WaveDirector};
pub use enemy::{Archetype, Enemy, EnemyHandle, EnemyRoster, EnemyState, StatScaling};
pub use input::{Button, InputSource, TickInput};
pub use loot::{LootSummary, LootTable};
pub use pickups::{CardDrop, CollectOutcome, Collectible};
pub use player::{Player, PlayerStats};
pub use pool::{Handle, Pool, Poolable};
pub use projectile::{Owner, Projectile};
pub use snapshot::RenderSnapshot;
pub use state::{GamePhase, GameState, RunStats};
pub use tick::tick;
