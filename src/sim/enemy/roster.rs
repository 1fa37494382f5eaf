//! The three enemy pools and everything that crosses between them
//!
//! Enumeration order is fixed: rush pool, then sniper pool, then spawner
//! pool, acquire order inside each. Collision tie-breaks depend on it.

use glam::Vec2;
use rand::Rng;

use super::spawner::CHILD_RUSH_WEIGHT;
use super::{Archetype, Behavior, Enemy, EnemyHandle, EnemyState, StatScaling};
use crate::consts::{RUSH_POOL_SIZE, SNIPER_POOL_SIZE, SPAWNER_POOL_SIZE};
use crate::sim::pool::Pool;
use crate::sim::projectile::Projectile;

#[derive(Debug, Clone)]
pub struct EnemyRoster {
    rush: Pool<Enemy>,
    sniper: Pool<Enemy>,
    spawner: Pool<Enemy>,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self::new()
    }
}

/// Children only ever come from the rush and sniper pools
fn child_pool<'a>(
    rush: &'a mut Pool<Enemy>,
    sniper: &'a mut Pool<Enemy>,
    archetype: Archetype,
) -> &'a mut Pool<Enemy> {
    match archetype {
        Archetype::Sniper => sniper,
        _ => rush,
    }
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::with_sizes(RUSH_POOL_SIZE, SNIPER_POOL_SIZE, SPAWNER_POOL_SIZE)
    }

    pub fn with_sizes(rush: usize, sniper: usize, spawner: usize) -> Self {
        Self {
            rush: Pool::with_factory(rush, Enemy::new_rush),
            sniper: Pool::with_factory(sniper, Enemy::new_sniper),
            spawner: Pool::with_factory(spawner, Enemy::new_spawner),
        }
    }

    pub fn pool(&self, archetype: Archetype) -> &Pool<Enemy> {
        match archetype {
            Archetype::Rush => &self.rush,
            Archetype::Sniper => &self.sniper,
            Archetype::Spawner => &self.spawner,
        }
    }

    fn pool_mut(&mut self, archetype: Archetype) -> &mut Pool<Enemy> {
        match archetype {
            Archetype::Rush => &mut self.rush,
            Archetype::Sniper => &mut self.sniper,
            Archetype::Spawner => &mut self.spawner,
        }
    }

    /// Bring a new enemy to life with sector scaling applied
    pub fn spawn(
        &mut self,
        archetype: Archetype,
        pos: Vec2,
        ai_level: u32,
        scaling: StatScaling,
    ) -> EnemyHandle {
        let (handle, enemy) = self.pool_mut(archetype).acquire();
        enemy.spawn(pos, ai_level);
        enemy.apply_scaling(scaling);
        log::debug!(
            "Spawned {:?} at ({:.0}, {:.0}) ai={} hp={}",
            archetype,
            pos.x,
            pos.y,
            ai_level,
            enemy.max_hp
        );
        EnemyHandle { archetype, handle }
    }

    pub fn get(&self, target: EnemyHandle) -> Option<&Enemy> {
        self.pool(target.archetype).get(target.handle)
    }

    pub fn get_mut(&mut self, target: EnemyHandle) -> Option<&mut Enemy> {
        self.pool_mut(target.archetype).get_mut(target.handle)
    }

    /// Handle still resolves and the enemy has not died
    pub fn is_alive(&self, target: EnemyHandle) -> bool {
        self.get(target).is_some_and(Enemy::is_alive)
    }

    /// In-use enemies in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (EnemyHandle, &Enemy)> + '_ {
        Archetype::ALL.into_iter().flat_map(move |archetype| {
            self.pool(archetype)
                .iter()
                .map(move |(handle, enemy)| (EnemyHandle { archetype, handle }, enemy))
        })
    }

    /// Refill `out` with every in-use handle in enumeration order
    pub fn collect_handles(&self, out: &mut Vec<EnemyHandle>) {
        out.clear();
        out.extend(self.iter().map(|(handle, _)| handle));
    }

    /// Enemies handed out across all three pools (alive or pending drop)
    pub fn active_count(&self) -> usize {
        self.rush.active_count() + self.sniper.active_count() + self.spawner.active_count()
    }

    pub fn alive_count(&self) -> usize {
        self.iter().filter(|(_, e)| e.is_alive()).count()
    }

    /// Per-frame AI pass: movement, sniper shots, spawner children
    pub fn update_all<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player_pos: Option<Vec2>,
        projectiles: &mut Pool<Projectile>,
        rng: &mut R,
    ) {
        for archetype in Archetype::ALL {
            self.pool_mut(archetype).update_all(|enemy| {
                enemy.update(dt, player_pos);
                if let Some(shot) = enemy.try_fire(player_pos) {
                    let (_, projectile) = projectiles.acquire();
                    projectile.spawn_enemy(shot.pos, shot.vel, shot.damage);
                }
            });
        }
        self.update_children(rng);
    }

    /// Prune, spawn and place the orbiting children of every live spawner
    fn update_children<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Self {
            rush,
            sniper,
            spawner,
        } = self;

        // Children come from the other pools, so the spawner pool keeps its shape
        for n in 0..spawner.active_count() {
            let Some(handle) = spawner.nth_handle(n) else {
                continue;
            };
            let Some(mother) = spawner.get_mut(handle) else {
                continue;
            };
            if !mother.is_alive() {
                continue;
            }
            let center = mother.pos;
            let ai_level = mother.ai_level;
            let Behavior::Spawner(state) = &mut mother.behavior else {
                continue;
            };

            state.prune(|child| {
                child_pool(rush, sniper, child.archetype)
                    .get(child.handle)
                    .is_some_and(Enemy::is_alive)
            });

            if state.can_spawn_child() {
                let archetype = if rng.random::<f32>() < CHILD_RUSH_WEIGHT {
                    Archetype::Rush
                } else {
                    Archetype::Sniper
                };
                let (child_handle, child) = child_pool(rush, sniper, archetype).acquire();
                child.spawn(center, ai_level);
                child.shrink_to_child();
                let angle = rng.random_range(0.0..360.0);
                state.adopt(
                    EnemyHandle {
                        archetype,
                        handle: child_handle,
                    },
                    angle,
                );
                log::debug!(
                    "Spawner launched {:?} child ({}/{})",
                    archetype,
                    state.child_count(),
                    state.max_children
                );
            }

            for child in state.children() {
                if let Some(enemy) =
                    child_pool(rush, sniper, child.handle.archetype).get_mut(child.handle.handle)
                {
                    enemy.pos = child.position(center);
                }
            }
        }
    }

    /// Damage one enemy. Returns true when this call killed it; a spawner's
    /// children die in the same call.
    pub fn damage(&mut self, target: EnemyHandle, amount: f32) -> bool {
        let Some(enemy) = self.get_mut(target) else {
            return false;
        };
        let died = enemy.take_damage(amount);
        if died {
            self.kill_children(target);
        }
        died
    }

    /// Kill regardless of hp (body contact). Returns true if it was alive.
    pub fn kill(&mut self, target: EnemyHandle) -> bool {
        let Some(enemy) = self.get_mut(target) else {
            return false;
        };
        if !enemy.is_alive() {
            return false;
        }
        enemy.die();
        self.kill_children(target);
        true
    }

    fn kill_children(&mut self, target: EnemyHandle) -> usize {
        let Some(Enemy {
            behavior: Behavior::Spawner(state),
            ..
        }) = self.get_mut(target)
        else {
            return 0;
        };
        let children = state.take_children();

        let mut killed = 0;
        for child in children.into_iter().flatten() {
            if let Some(enemy) = self.get_mut(child.handle) {
                if enemy.is_alive() {
                    enemy.die();
                    killed += 1;
                }
            }
        }
        if killed > 0 {
            log::debug!("Spawner death took {} children with it", killed);
        }
        killed
    }

    /// Hand every dead enemy to `on_death` exactly once, then deactivate it.
    ///
    /// Returns the number of deaths reported.
    pub fn drain_dead<F>(&mut self, mut on_death: F) -> usize
    where
        F: FnMut(&Enemy),
    {
        let mut reported = 0;
        for archetype in Archetype::ALL {
            for (_, enemy) in self.pool_mut(archetype).iter_mut() {
                if enemy.state != EnemyState::Dead {
                    continue;
                }
                if !enemy.has_dropped {
                    enemy.has_dropped = true;
                    on_death(&*enemy);
                    reported += 1;
                }
                enemy.deactivate();
            }
        }
        reported
    }

    /// Return deactivated enemies to their pools
    pub fn reclaim(&mut self) -> usize {
        self.rush.reclaim() + self.sniper.reclaim() + self.spawner.reclaim()
    }

    pub fn clear_all(&mut self) {
        self.rush.clear_all();
        self.sniper.clear_all();
        self.spawner.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn spawner_state(roster: &mut EnemyRoster, h: EnemyHandle) -> &mut super::super::SpawnerState {
        match &mut roster.get_mut(h).unwrap().behavior {
            Behavior::Spawner(state) => state,
            _ => panic!("not a spawner"),
        }
    }

    fn roster_with_children(n: usize) -> (EnemyRoster, EnemyHandle) {
        let mut roster = EnemyRoster::with_sizes(2, 2, 1);
        let mut projectiles: Pool<Projectile> = Pool::with_capacity(4);
        let mut rng = Pcg32::seed_from_u64(7);
        let mother = roster.spawn(
            Archetype::Spawner,
            Vec2::new(640.0, 100.0),
            4,
            StatScaling::IDENTITY,
        );
        for _ in 0..n {
            spawner_state(&mut roster, mother).spawn_timer = 0.0;
            roster.update_all(DT, None, &mut projectiles, &mut rng);
        }
        (roster, mother)
    }

    #[test]
    fn test_spawn_applies_scaling() {
        let mut roster = EnemyRoster::new();
        let scaling = StatScaling {
            hp: 1.5,
            speed: 1.1,
            damage: 1.2,
        };
        let h = roster.spawn(Archetype::Rush, Vec2::new(300.0, -60.0), 0, scaling);
        let enemy = roster.get(h).unwrap();
        assert_eq!(enemy.max_hp, 45.0);
        assert_eq!(enemy.speed, 165.0);
        assert_eq!(enemy.damage, 24.0);
        assert_eq!(enemy.value, 10);
    }

    #[test]
    fn test_enumeration_order() {
        let mut roster = EnemyRoster::new();
        let s = StatScaling::IDENTITY;
        roster.spawn(Archetype::Spawner, Vec2::ZERO, 0, s);
        roster.spawn(Archetype::Sniper, Vec2::ZERO, 0, s);
        roster.spawn(Archetype::Rush, Vec2::ZERO, 0, s);
        roster.spawn(Archetype::Rush, Vec2::ZERO, 0, s);

        let order: Vec<Archetype> = roster.iter().map(|(h, _)| h.archetype).collect();
        assert_eq!(
            order,
            vec![
                Archetype::Rush,
                Archetype::Rush,
                Archetype::Sniper,
                Archetype::Spawner
            ]
        );
    }

    #[test]
    fn test_children_orbit_their_spawner() {
        let (mut roster, mother) = roster_with_children(3);
        let center = roster.get(mother).unwrap().pos;
        let children: Vec<_> = spawner_state(&mut roster, mother).children().copied().collect();
        assert_eq!(children.len(), 3);
        for child in children {
            let enemy = roster.get(child.handle).unwrap();
            assert!(enemy.is_child);
            assert_eq!(enemy.radius, 8.0);
            assert_eq!(enemy.ai_level, 4);
            assert!((enemy.pos.distance(center) - 60.0).abs() < 1e-2);
        }
        // Pools grew past their initial sizes without complaint
        assert_eq!(roster.active_count(), 4);
    }

    #[test]
    fn test_spawner_death_kills_children_same_call() {
        let (mut roster, mother) = roster_with_children(6);
        let children: Vec<_> = spawner_state(&mut roster, mother).children().copied().collect();
        assert_eq!(children.len(), 6);
        assert!(children.iter().all(|c| roster.is_alive(c.handle)));

        assert!(roster.damage(mother, 1000.0));
        for child in &children {
            assert!(!roster.is_alive(child.handle));
            assert_eq!(roster.get(child.handle).unwrap().state, EnemyState::Dead);
        }
    }

    #[test]
    fn test_kill_ignores_hp_and_cascades() {
        let (mut roster, mother) = roster_with_children(2);
        assert!(roster.kill(mother));
        assert!(!roster.kill(mother));
        assert_eq!(roster.alive_count(), 0);
    }

    #[test]
    fn test_dead_children_are_pruned() {
        let (mut roster, mother) = roster_with_children(2);
        let first = spawner_state(&mut roster, mother).children().next().unwrap().handle;
        roster.kill(first);

        let mut projectiles: Pool<Projectile> = Pool::with_capacity(4);
        let mut rng = Pcg32::seed_from_u64(1);
        roster.update_all(DT, None, &mut projectiles, &mut rng);
        assert_eq!(spawner_state(&mut roster, mother).child_count(), 1);
    }

    #[test]
    fn test_spawner_leaving_frees_children() {
        let (mut roster, mother) = roster_with_children(2);
        let children: Vec<_> = spawner_state(&mut roster, mother).children().copied().collect();
        roster.get_mut(mother).unwrap().pos.y = 10_000.0;

        let mut projectiles: Pool<Projectile> = Pool::with_capacity(4);
        let mut rng = Pcg32::seed_from_u64(1);
        roster.update_all(DT, None, &mut projectiles, &mut rng);

        assert!(roster.get(mother).is_none());
        assert!(children.iter().all(|c| roster.is_alive(c.handle)));
    }

    #[test]
    fn test_drain_dead_reports_once() {
        let mut roster = EnemyRoster::new();
        let h = roster.spawn(Archetype::Sniper, Vec2::ZERO, 0, StatScaling::IDENTITY);
        roster.damage(h, 100.0);

        let mut values = Vec::new();
        assert_eq!(roster.drain_dead(|e| values.push(e.value)), 1);
        assert_eq!(roster.drain_dead(|e| values.push(e.value)), 0);
        assert_eq!(values, vec![20]);

        assert_eq!(roster.reclaim(), 1);
        assert_eq!(roster.active_count(), 0);
        assert!(roster.get(h).is_none());
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut roster = EnemyRoster::new();
        let h = roster.spawn(Archetype::Rush, Vec2::ZERO, 0, StatScaling::IDENTITY);
        roster.kill(h);
        roster.drain_dead(|_| {});
        roster.reclaim();
        assert!(!roster.damage(h, 10.0));
        assert!(!roster.kill(h));
    }
}
