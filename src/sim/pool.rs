//! Reusable object pool for short-lived actors
//!
//! Entities are allocated once and recycled. Storage is split in two: the
//! in-use block at the front, kept in acquire order, and the available block
//! behind it. Acquiring moves the first available entity to the end of the
//! in-use block; releasing rotates an entity out of the in-use block without
//! disturbing the order of the rest. Iteration always walks the in-use block,
//! so enumeration follows insertion order.

/// Entities that can live in a [`Pool`]
pub trait Poolable {
    /// Whether the entity still participates in simulation/rendering
    fn is_active(&self) -> bool;
    /// Clear the active flag (called when the pool takes the entity back)
    fn deactivate(&mut self);
}

/// Generational reference to a pool slot
///
/// The generation changes every time the slot is acquired, so a handle kept
/// across a recycle no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Fixed-type object pool
#[derive(Debug, Clone)]
pub struct Pool<T> {
    /// `items[..live]` are in use (acquire order), the rest are available
    items: Vec<T>,
    /// Slot id of the entity stored at each position
    ids: Vec<u32>,
    /// Position of each slot id inside `items`
    positions: Vec<u32>,
    generations: Vec<u32>,
    live: usize,
    /// Builds a fresh entity when the pool grows
    factory: fn() -> T,
}

impl<T: Poolable + Default> Pool<T> {
    /// Create a pool with `initial_size` default-built inactive entities
    pub fn with_capacity(initial_size: usize) -> Self {
        Self::with_factory(initial_size, T::default)
    }
}

impl<T: Poolable> Pool<T> {
    /// Create a pool with `initial_size` pre-built inactive entities
    pub fn with_factory(initial_size: usize, factory: fn() -> T) -> Self {
        let mut pool = Self {
            items: Vec::with_capacity(initial_size),
            ids: Vec::with_capacity(initial_size),
            positions: Vec::with_capacity(initial_size),
            generations: Vec::with_capacity(initial_size),
            live: 0,
            factory,
        };
        for _ in 0..initial_size {
            pool.grow();
        }
        pool
    }

    /// Append one fresh inactive entity to the available block
    fn grow(&mut self) {
        let id = self.items.len() as u32;
        let mut value = (self.factory)();
        value.deactivate();
        self.items.push(value);
        self.ids.push(id);
        self.positions.push(id);
        self.generations.push(0);
    }

    /// Take an entity out of the pool, growing it if every slot is in use.
    ///
    /// The returned entity still carries its previous state; callers
    /// initialise it through the entity's own `spawn`.
    pub fn acquire(&mut self) -> (Handle, &mut T) {
        if self.live == self.items.len() {
            self.grow();
            log::debug!("Pool exhausted, grew to {} slots", self.items.len());
        }

        let position = self.live;
        self.live += 1;
        let id = self.ids[position];
        let generation = &mut self.generations[id as usize];
        *generation = generation.wrapping_add(1);

        let handle = Handle {
            index: id,
            generation: *generation,
        };
        (handle, &mut self.items[position])
    }

    /// Return an entity to the pool.
    ///
    /// Releasing a handle that is not currently in use (stale or already
    /// released) does nothing and returns false.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(position) = self.live_position(handle) else {
            log::warn!(
                "Ignoring release of slot {} (generation {}) that is not in use",
                handle.index,
                handle.generation
            );
            return false;
        };
        self.release_position(position);
        true
    }

    /// Move the entity at `position` just behind the in-use block, keeping
    /// the order of everything else. It becomes the next one acquired.
    fn release_position(&mut self, position: usize) {
        debug_assert!(position < self.live);
        self.items[position].deactivate();
        self.items[position..self.live].rotate_left(1);
        self.ids[position..self.live].rotate_left(1);
        for moved in position..self.live {
            self.positions[self.ids[moved] as usize] = moved as u32;
        }
        self.live -= 1;
    }

    /// Run `update` on every in-use entity in acquire order, returning any
    /// that went inactive during their update to the pool in the same pass.
    pub fn update_all<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut T),
    {
        let mut position = 0;
        while position < self.live {
            update(&mut self.items[position]);
            if self.items[position].is_active() {
                position += 1;
            } else {
                self.release_position(position);
            }
        }
    }

    /// Return every in-use entity whose active flag is cleared.
    ///
    /// Returns the number of entities recycled.
    pub fn reclaim(&mut self) -> usize {
        let mut recycled = 0;
        let mut position = 0;
        while position < self.live {
            if self.items[position].is_active() {
                position += 1;
            } else {
                self.release_position(position);
                recycled += 1;
            }
        }
        recycled
    }

    /// Deactivate and return every in-use entity
    pub fn clear_all(&mut self) {
        while self.live > 0 {
            self.release_position(self.live - 1);
        }
    }

    /// Number of entities currently handed out
    #[inline]
    pub fn active_count(&self) -> usize {
        self.live
    }

    /// Number of entities ready to be acquired without growing
    #[inline]
    pub fn available_count(&self) -> usize {
        self.items.len() - self.live
    }

    /// Total slots ever allocated
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Handle of the `n`th in-use entity in acquire order
    pub fn nth_handle(&self, n: usize) -> Option<Handle> {
        if n >= self.live {
            return None;
        }
        let id = self.ids[n];
        Some(Handle {
            index: id,
            generation: self.generations[id as usize],
        })
    }

    fn live_position(&self, handle: Handle) -> Option<usize> {
        let id = handle.index();
        let position = *self.positions.get(id)? as usize;
        (self.generations[id] == handle.generation && position < self.live).then_some(position)
    }

    /// Whether `handle` still refers to an in-use entity
    pub fn is_live(&self, handle: Handle) -> bool {
        self.live_position(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.live_position(handle).map(|p| &self.items[p])
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.live_position(handle).map(|p| &mut self.items[p])
    }

    /// In-use entities in acquire order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        let generations = &self.generations;
        self.ids[..self.live]
            .iter()
            .zip(&self.items[..self.live])
            .map(move |(&id, value)| {
                let handle = Handle {
                    index: id,
                    generation: generations[id as usize],
                };
                (handle, value)
            })
    }

    /// Mutable in-use entities in acquire order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> + '_ {
        let generations = &self.generations;
        self.ids[..self.live]
            .iter()
            .zip(&mut self.items[..self.live])
            .map(move |(&id, value)| {
                let handle = Handle {
                    index: id,
                    generation: generations[id as usize],
                };
                (handle, value)
            })
    }

    #[cfg(test)]
    fn check_membership(&self) {
        assert!(self.live <= self.items.len());
        assert_eq!(self.ids.len(), self.items.len());
        assert_eq!(self.positions.len(), self.items.len());
        for (position, &id) in self.ids.iter().enumerate() {
            assert_eq!(self.positions[id as usize] as usize, position, "id/position mismatch");
        }
        for value in &self.items[self.live..] {
            assert!(!value.is_active(), "available entity still active");
        }
    }
}
