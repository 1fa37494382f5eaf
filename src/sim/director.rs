//! Wave director: sector progression, spawn timing, composition and scaling
//!
//! ```text
//! Countdown --5 s--> Spawning --quota reached--> Draining --roster empty--> Countdown
//! ```
//!
//! Sector 1 starts directly in `Spawning`. Completion is instantaneous and
//! reported through [`DirectorEvent::SectorComplete`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Archetype, EnemyRoster, StatScaling};
use crate::consts::SCREEN_WIDTH;

/// Seconds between sectors
pub const SECTOR_COUNTDOWN: f32 = 5.0;
/// Seconds between spawn batches
pub const SPAWN_INTERVAL: f32 = 1.2;
const BASE_QUOTA: u32 = 15;
const QUOTA_PER_SECTOR: u32 = 5;
const MAX_QUOTA: u32 = 100;
/// Sectors per AI level step
const SECTORS_PER_AI_LEVEL: u32 = 7;
const MAX_AI_LEVEL: u32 = 6;
/// Every Nth sector is a boss sector
const BOSS_SECTOR_PERIOD: u32 = 7;
const MINIBOSS_CHANCE: f32 = 0.25;
/// Spawn x range is inset from both edges
const SPAWN_EDGE_INSET: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorPhase {
    /// Waiting before the next sector starts
    Countdown,
    /// Spawning batches until the quota is met
    Spawning,
    /// Quota met, waiting for the roster to empty
    Draining,
}

/// Things the rest of the game may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorEvent {
    SectorStarted { sector: u32, quota: u32 },
    SectorComplete { sector: u32 },
    /// The upcoming sector is a boss sector (hook only)
    BossSector { sector: u32 },
    /// A miniboss was rolled as `sector` was cleared (hook only)
    MinibossRolled { sector: u32 },
}

pub fn is_boss_sector(sector: u32) -> bool {
    sector % BOSS_SECTOR_PERIOD == 0
}

/// Enemies to spawn in a sector
pub fn quota_for(sector: u32) -> u32 {
    (BASE_QUOTA + sector.saturating_sub(1) * QUOTA_PER_SECTOR).min(MAX_QUOTA)
}

/// Enemies per batch for a quota
pub fn batch_size_for(quota: u32) -> u32 {
    match quota {
        0..=15 => 2,
        16..=30 => 3,
        _ => 4,
    }
}

pub fn ai_level_for(sector: u32) -> u32 {
    (sector.saturating_sub(1) / SECTORS_PER_AI_LEVEL).min(MAX_AI_LEVEL)
}

/// Stat multipliers for enemies spawned in a sector
pub fn scaling_for(sector: u32) -> StatScaling {
    let s = sector as f32;
    StatScaling {
        hp: (1.0 + 0.10 * s).min(3.0),
        speed: (1.0 + 0.05 * s).min(2.0),
        damage: (1.0 + 0.08 * s).min(2.5),
    }
}

/// Roll the archetype of the next spawn
pub fn choose_archetype<R: Rng + ?Sized>(sector: u32, rng: &mut R) -> Archetype {
    match sector {
        0..=1 => Archetype::Rush,
        2 => {
            if rng.random::<f32>() < 0.80 {
                Archetype::Rush
            } else {
                Archetype::Sniper
            }
        }
        _ => {
            let roll: f32 = rng.random();
            if roll < 0.65 {
                Archetype::Rush
            } else if roll < 0.97 {
                Archetype::Sniper
            } else {
                Archetype::Spawner
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    sector: u32,
    phase: DirectorPhase,
    /// Seconds until the next sector (Countdown only)
    countdown: f32,
    /// Seconds since the last batch
    spawn_timer: f32,
    quota: u32,
    spawned: u32,
    batch_size: u32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Director already spawning the given sector
    pub fn starting_at(sector: u32) -> Self {
        let mut director = Self {
            sector: sector.max(1),
            phase: DirectorPhase::Countdown,
            countdown: 0.0,
            spawn_timer: 0.0,
            quota: 0,
            spawned: 0,
            batch_size: 0,
        };
        director.start_sector();
        director
    }

    pub fn sector(&self) -> u32 {
        self.sector
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn ai_level(&self) -> u32 {
        ai_level_for(self.sector)
    }

    /// Whole seconds left on the countdown, rounded up
    pub fn countdown_seconds(&self) -> Option<u32> {
        (self.phase == DirectorPhase::Countdown).then(|| self.countdown.max(0.0).ceil() as u32)
    }

    fn start_sector(&mut self) {
        self.phase = DirectorPhase::Spawning;
        self.spawn_timer = 0.0;
        self.spawned = 0;
        self.quota = quota_for(self.sector);
        self.batch_size = batch_size_for(self.quota);
        log::info!(
            "Sector {} started: {} enemies in batches of {} (ai level {})",
            self.sector,
            self.quota,
            self.batch_size,
            self.ai_level()
        );
    }

    /// Advance one step. Events raised this step are appended to `events`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        roster: &mut EnemyRoster,
        rng: &mut R,
        events: &mut Vec<DirectorEvent>,
    ) {
        if self.phase == DirectorPhase::Countdown {
            self.countdown -= dt;
            if self.countdown <= 0.0 {
                self.start_sector();
                events.push(DirectorEvent::SectorStarted {
                    sector: self.sector,
                    quota: self.quota,
                });
            }
            return;
        }

        if self.phase == DirectorPhase::Spawning {
            self.spawn_timer += dt;
            if self.spawn_timer >= SPAWN_INTERVAL {
                self.spawn_timer = 0.0;
                self.spawn_batch(roster, rng);
            }
            if self.spawned >= self.quota {
                self.phase = DirectorPhase::Draining;
            }
        }

        if self.phase == DirectorPhase::Draining && roster.active_count() == 0 {
            self.complete_sector(rng, events);
        }
    }

    fn spawn_batch<R: Rng + ?Sized>(&mut self, roster: &mut EnemyRoster, rng: &mut R) {
        let batch = self.batch_size.min(self.quota - self.spawned);
        let ai_level = self.ai_level();
        let scaling = scaling_for(self.sector);

        for _ in 0..batch {
            let archetype = choose_archetype(self.sector, rng);
            let x = rng.random_range(SPAWN_EDGE_INSET..=SCREEN_WIDTH as i32 - SPAWN_EDGE_INSET);
            let y = -50 - rng.random_range(0..=100);
            roster.spawn(archetype, Vec2::new(x as f32, y as f32), ai_level, scaling);
            self.spawned += 1;
        }

        if self.spawned % 10 == 0 || self.spawned == self.quota {
            log::debug!("Sector {}: spawned {}/{}", self.sector, self.spawned, self.quota);
        }
    }

    fn complete_sector<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<DirectorEvent>) {
        log::info!("Sector {} complete", self.sector);
        events.push(DirectorEvent::SectorComplete {
            sector: self.sector,
        });

        // Boss sectors never roll a miniboss on the way out
        if !is_boss_sector(self.sector) && rng.random::<f32>() < MINIBOSS_CHANCE {
            log::info!("Miniboss rolled after sector {}", self.sector);
            events.push(DirectorEvent::MinibossRolled {
                sector: self.sector,
            });
        }

        self.sector += 1;
        if is_boss_sector(self.sector) {
            log::info!("Sector {} is a boss sector", self.sector);
            events.push(DirectorEvent::BossSector {
                sector: self.sector,
            });
        }

        self.phase = DirectorPhase::Countdown;
        self.countdown = SECTOR_COUNTDOWN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyState;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn run(
        director: &mut WaveDirector,
        roster: &mut EnemyRoster,
        rng: &mut Pcg32,
        seconds: f32,
    ) -> Vec<DirectorEvent> {
        let mut events = Vec::new();
        for _ in 0..(seconds / DT).round() as u32 {
            director.update(DT, roster, rng, &mut events);
        }
        events
    }

    fn wipe(roster: &mut EnemyRoster) {
        roster.clear_all();
    }

    #[test]
    fn test_quotas() {
        assert_eq!(quota_for(1), 15);
        assert_eq!(quota_for(5), 35);
        assert_eq!(quota_for(20), 100);
        assert_eq!(quota_for(40), 100);
    }

    #[test]
    fn test_batch_sizes() {
        assert_eq!(batch_size_for(15), 2);
        assert_eq!(batch_size_for(20), 3);
        assert_eq!(batch_size_for(30), 3);
        assert_eq!(batch_size_for(35), 4);
    }

    #[test]
    fn test_ai_levels() {
        assert_eq!(ai_level_for(1), 0);
        assert_eq!(ai_level_for(7), 0);
        assert_eq!(ai_level_for(8), 1);
        assert_eq!(ai_level_for(15), 2);
        assert_eq!(ai_level_for(100), 6);
    }

    #[test]
    fn test_scaling_caps() {
        let s1 = scaling_for(1);
        assert!((s1.hp - 1.1).abs() < 1e-6);
        let s50 = scaling_for(50);
        assert_eq!(s50.hp, 3.0);
        assert_eq!(s50.speed, 2.0);
        assert_eq!(s50.damage, 2.5);
    }

    #[test]
    fn test_composition_by_sector() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            assert_eq!(choose_archetype(1, &mut rng), Archetype::Rush);
            assert_ne!(choose_archetype(2, &mut rng), Archetype::Spawner);
        }
        let later: Vec<_> = (0..2000).map(|_| choose_archetype(3, &mut rng)).collect();
        assert!(later.contains(&Archetype::Spawner));
        assert!(later.contains(&Archetype::Sniper));
    }

    #[test]
    fn test_sector_one_spawns_immediately() {
        let director = WaveDirector::new();
        assert_eq!(director.phase(), DirectorPhase::Spawning);
        assert_eq!(director.quota(), 15);
    }

    #[test]
    fn test_batches_follow_interval() {
        let mut director = WaveDirector::new();
        let mut roster = EnemyRoster::new();
        let mut rng = Pcg32::seed_from_u64(1);

        run(&mut director, &mut roster, &mut rng, 1.1);
        assert_eq!(director.spawned(), 0);
        run(&mut director, &mut roster, &mut rng, 0.2);
        assert_eq!(director.spawned(), 2);
        assert_eq!(roster.active_count(), 2);

        for (_, enemy) in roster.iter() {
            assert_eq!(enemy.state, EnemyState::Alive);
            assert!(enemy.pos.x >= 100.0 && enemy.pos.x <= SCREEN_WIDTH - 100.0);
            assert!(enemy.pos.y >= -150.0 && enemy.pos.y <= -50.0);
            // Sector 1 scaling: 30 * 1.1 floored
            assert_eq!(enemy.max_hp, 33.0);
        }
    }

    #[test]
    fn test_last_batch_clamped_to_quota() {
        let mut director = WaveDirector::new();
        let mut roster = EnemyRoster::new();
        let mut rng = Pcg32::seed_from_u64(1);
        // 15 enemies in batches of 2: eight batches
        run(&mut director, &mut roster, &mut rng, 1.25 * 8.0);
        assert_eq!(director.spawned(), 15);
        assert_eq!(director.phase(), DirectorPhase::Draining);
    }

    #[test]
    fn test_no_completion_while_enemies_remain() {
        let mut director = WaveDirector::new();
        let mut roster = EnemyRoster::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let events = run(&mut director, &mut roster, &mut rng, 12.0);
        assert_eq!(director.phase(), DirectorPhase::Draining);
        assert!(events.is_empty());

        wipe(&mut roster);
        let events = run(&mut director, &mut roster, &mut rng, DT);
        assert_eq!(events[0], DirectorEvent::SectorComplete { sector: 1 });
        assert_eq!(director.sector(), 2);
        assert_eq!(director.phase(), DirectorPhase::Countdown);
        assert_eq!(director.countdown_seconds(), Some(5));
    }

    #[test]
    fn test_countdown_starts_next_sector() {
        let mut director = WaveDirector::new();
        let mut roster = EnemyRoster::new();
        let mut rng = Pcg32::seed_from_u64(1);
        run(&mut director, &mut roster, &mut rng, 12.0);
        wipe(&mut roster);
        run(&mut director, &mut roster, &mut rng, DT);

        let events = run(&mut director, &mut roster, &mut rng, 4.9);
        assert!(events.is_empty());
        assert_eq!(director.phase(), DirectorPhase::Countdown);

        let events = run(&mut director, &mut roster, &mut rng, 0.2);
        assert_eq!(
            events,
            vec![DirectorEvent::SectorStarted {
                sector: 2,
                quota: 20
            }]
        );
        assert_eq!(director.phase(), DirectorPhase::Spawning);
    }

    #[test]
    fn test_boss_sector_event() {
        let mut director = WaveDirector::starting_at(6);
        let mut roster = EnemyRoster::new();
        let mut rng = Pcg32::seed_from_u64(1);
        // Quota 40 in batches of 4: ten batches
        run(&mut director, &mut roster, &mut rng, 1.25 * 10.0);
        assert_eq!(director.phase(), DirectorPhase::Draining);
        wipe(&mut roster);

        let events = run(&mut director, &mut roster, &mut rng, DT);
        assert_eq!(events.first(), Some(&DirectorEvent::SectorComplete { sector: 6 }));
        assert_eq!(events.last(), Some(&DirectorEvent::BossSector { sector: 7 }));
        // Clearing sector 6 may still roll a miniboss, reported for sector 6
        for event in &events[1..events.len() - 1] {
            assert_eq!(*event, DirectorEvent::MinibossRolled { sector: 6 });
        }
    }

    #[test]
    fn test_miniboss_rolls_against_cleared_sector() {
        let mut rolled = 0;
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);

            // Clearing a boss sector skips the roll entirely
            let mut director = WaveDirector::starting_at(7);
            let mut events = Vec::new();
            director.complete_sector(&mut rng, &mut events);
            assert_eq!(events, vec![DirectorEvent::SectorComplete { sector: 7 }]);
            assert_eq!(director.sector(), 8);

            let mut director = WaveDirector::starting_at(3);
            let mut events = Vec::new();
            director.complete_sector(&mut rng, &mut events);
            match events.as_slice() {
                [DirectorEvent::SectorComplete { sector: 3 }] => {}
                [
                    DirectorEvent::SectorComplete { sector: 3 },
                    DirectorEvent::MinibossRolled { sector: 3 },
                ] => rolled += 1,
                other => panic!("unexpected events {other:?}"),
            }
        }
        assert!(rolled > 20 && rolled < 90, "rolled {rolled} of 200");
    }
}
