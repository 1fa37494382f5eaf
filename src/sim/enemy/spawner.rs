//! Spawner (mother) archetype: slow patrol, periodically launches children
//! that orbit it until either side dies.
//!
//! Children live in the shared rush/sniper pools. The spawner only keeps
//! generational handles to them plus their orbit angles; the roster resolves
//! the handles when it needs to move or kill a child.

use glam::Vec2;

use super::EnemyHandle;

/// Hard upper bound on children across all AI levels
pub const MAX_CHILDREN_CAP: usize = 6;
/// Orbit radius around the spawner (px)
pub const ORBIT_RADIUS: f32 = 60.0;
/// Orbit angular speed (degrees per second)
pub const ORBIT_SPEED: f32 = 60.0;
/// Chance a new child is a rush enemy (otherwise a sniper)
pub const CHILD_RUSH_WEIGHT: f32 = 0.7;
/// Lateral patrol speed amplitude (px/s)
const PATROL_AMPLITUDE: f32 = 25.0;

/// Seconds between children and the child cap for an AI level
pub fn spawn_profile(ai_level: u32) -> (f32, usize) {
    match ai_level {
        0..=1 => (5.0, 4),
        2..=3 => (4.0, 5),
        _ => (3.0, MAX_CHILDREN_CAP),
    }
}

/// One orbiting child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitChild {
    pub handle: EnemyHandle,
    /// Degrees, in [0, 360)
    pub angle: f32,
}

impl OrbitChild {
    /// Where the child sits around a spawner at `center`
    pub fn position(&self, center: Vec2) -> Vec2 {
        let rad = self.angle.to_radians();
        center + Vec2::new(rad.cos(), rad.sin()) * ORBIT_RADIUS
    }
}

#[derive(Debug, Clone)]
pub struct SpawnerState {
    /// Seconds between children
    pub spawn_rate: f32,
    /// Seconds until the next child may spawn
    pub spawn_timer: f32,
    pub max_children: usize,
    children: [Option<OrbitChild>; MAX_CHILDREN_CAP],
    /// Drives the lateral patrol
    patrol_clock: f32,
}

impl Default for SpawnerState {
    fn default() -> Self {
        let (spawn_rate, max_children) = spawn_profile(0);
        Self {
            spawn_rate,
            spawn_timer: spawn_rate,
            max_children,
            children: [None; MAX_CHILDREN_CAP],
            patrol_clock: 0.0,
        }
    }
}

impl SpawnerState {
    pub fn reset(&mut self, ai_level: u32) {
        let (spawn_rate, max_children) = spawn_profile(ai_level);
        self.spawn_rate = spawn_rate;
        self.spawn_timer = spawn_rate;
        self.max_children = max_children;
        self.children = [None; MAX_CHILDREN_CAP];
        self.patrol_clock = 0.0;
    }

    /// Advance timers and orbit angles; returns the velocity for this frame
    pub fn update(&mut self, dt: f32, speed: f32) -> Vec2 {
        self.patrol_clock += dt;
        if self.spawn_timer > 0.0 {
            self.spawn_timer -= dt;
        }
        for child in self.children.iter_mut().flatten() {
            child.angle = (child.angle + ORBIT_SPEED * dt).rem_euclid(360.0);
        }
        Vec2::new(self.patrol_clock.sin() * PATROL_AMPLITUDE, speed)
    }

    pub fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }

    pub fn children(&self) -> impl Iterator<Item = &OrbitChild> + '_ {
        self.children.iter().flatten()
    }

    /// Timer elapsed and room for another child
    pub fn can_spawn_child(&self) -> bool {
        self.spawn_timer <= 0.0 && self.child_count() < self.max_children
    }

    /// Start tracking a freshly spawned child and restart the spawn timer
    pub fn adopt(&mut self, handle: EnemyHandle, angle: f32) -> bool {
        if self.child_count() >= self.max_children {
            return false;
        }
        let Some(slot) = self.children.iter_mut().find(|c| c.is_none()) else {
            return false;
        };
        *slot = Some(OrbitChild {
            handle,
            angle: angle.rem_euclid(360.0),
        });
        self.spawn_timer = self.spawn_rate;
        true
    }

    /// Forget children for which `is_live` returns false
    pub fn prune<F>(&mut self, mut is_live: F)
    where
        F: FnMut(EnemyHandle) -> bool,
    {
        for slot in self.children.iter_mut() {
            if slot.is_some_and(|child| !is_live(child.handle)) {
                *slot = None;
            }
        }
    }

    /// Hand over every tracked child, leaving the list empty
    pub fn take_children(&mut self) -> [Option<OrbitChild>; MAX_CHILDREN_CAP] {
        std::mem::replace(&mut self.children, [None; MAX_CHILDREN_CAP])
    }

    /// Stop tracking children without touching them
    pub fn release_children(&mut self) {
        self.children = [None; MAX_CHILDREN_CAP];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Archetype;
    use crate::sim::pool::{Pool, Poolable};

    #[derive(Default)]
    struct Token(bool);

    impl Poolable for Token {
        fn is_active(&self) -> bool {
            self.0
        }
        fn deactivate(&mut self) {
            self.0 = false;
        }
    }

    fn handles(n: usize) -> Vec<EnemyHandle> {
        let mut pool: Pool<Token> = Pool::with_capacity(n);
        (0..n)
            .map(|_| EnemyHandle {
                archetype: Archetype::Rush,
                handle: pool.acquire().0,
            })
            .collect()
    }

    #[test]
    fn test_profile_by_level() {
        assert_eq!(spawn_profile(0), (5.0, 4));
        assert_eq!(spawn_profile(2), (4.0, 5));
        assert_eq!(spawn_profile(4), (3.0, 6));
        assert_eq!(spawn_profile(6), (3.0, 6));
    }

    #[test]
    fn test_spawn_cadence_and_cap() {
        let mut state = SpawnerState::default();
        assert!(!state.can_spawn_child());
        state.update(5.0, 40.0);
        assert!(state.can_spawn_child());

        let hs = handles(5);
        assert!(state.adopt(hs[0], 10.0));
        assert!(!state.can_spawn_child());

        for h in &hs[1..4] {
            state.update(5.0, 40.0);
            assert!(state.adopt(*h, 0.0));
        }
        state.update(5.0, 40.0);
        assert_eq!(state.child_count(), 4);
        assert!(!state.can_spawn_child());
        assert!(!state.adopt(hs[4], 0.0));
    }

    #[test]
    fn test_orbit_angles_advance_and_wrap() {
        let mut state = SpawnerState::default();
        let hs = handles(1);
        state.adopt(hs[0], 350.0);
        state.update(0.5, 40.0);
        let child = state.children().next().unwrap();
        assert!((child.angle - 20.0).abs() < 1e-3);

        let pos = OrbitChild { handle: hs[0], angle: 90.0 }.position(Vec2::new(100.0, 100.0));
        assert!((pos - Vec2::new(100.0, 160.0)).length() < 1e-3);
    }

    #[test]
    fn test_prune_and_take() {
        let mut state = SpawnerState::default();
        let hs = handles(3);
        for h in &hs {
            state.adopt(*h, 0.0);
        }
        let dead = hs[1];
        state.prune(|h| h != dead);
        assert_eq!(state.child_count(), 2);

        let taken = state.take_children();
        assert_eq!(taken.iter().flatten().count(), 2);
        assert_eq!(state.child_count(), 0);
    }
}
