//! What dead enemies leave behind

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;

use super::enemy::{Archetype, Enemy};
use super::pickups::{CardDrop, Collectible};
use super::pool::Pool;
use crate::cards::{CardCatalog, Rarity};

/// Drop count for archetypes missing from the table
const DEFAULT_DROP_COUNT: u32 = 1;
/// Card chance for archetypes missing from the table
const DEFAULT_CARD_CHANCE: f32 = 0.05;
/// Ore pieces scatter this far around the death point (px)
const SCATTER: f32 = 10.0;

/// Per-archetype drop counts and card chances
#[derive(Debug, Clone)]
pub struct LootTable {
    drop_counts: HashMap<Archetype, u32>,
    card_chances: HashMap<Archetype, f32>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            drop_counts: HashMap::from([
                (Archetype::Rush, 1),
                (Archetype::Sniper, 2),
                (Archetype::Spawner, 5),
            ]),
            card_chances: HashMap::from([
                (Archetype::Rush, 0.05),
                (Archetype::Sniper, 0.05),
                (Archetype::Spawner, 0.5),
            ]),
        }
    }
}

/// What one death produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LootSummary {
    pub collectibles: u32,
    /// Total ore value dropped
    pub ore: u32,
    pub card_dropped: bool,
}

impl LootTable {
    /// Table with no entries; every archetype falls back to the defaults
    pub fn empty() -> Self {
        Self {
            drop_counts: HashMap::new(),
            card_chances: HashMap::new(),
        }
    }

    pub fn set_drop_count(&mut self, archetype: Archetype, count: u32) {
        self.drop_counts.insert(archetype, count);
    }

    pub fn set_card_chance(&mut self, archetype: Archetype, chance: f32) {
        self.card_chances.insert(archetype, chance.clamp(0.0, 1.0));
    }

    pub fn drop_count(&self, archetype: Archetype) -> u32 {
        self.drop_counts
            .get(&archetype)
            .copied()
            .unwrap_or(DEFAULT_DROP_COUNT)
    }

    pub fn card_chance(&self, archetype: Archetype) -> f32 {
        self.card_chances
            .get(&archetype)
            .copied()
            .unwrap_or(DEFAULT_CARD_CHANCE)
    }

    /// Emit ore and maybe a card for a dead enemy.
    ///
    /// Spawner children leave a single piece of ore and never a card.
    pub fn emit<R: Rng + ?Sized>(
        &self,
        enemy: &Enemy,
        collectibles: &mut Pool<Collectible>,
        card_drops: &mut Pool<CardDrop>,
        catalog: &CardCatalog,
        rng: &mut R,
    ) -> LootSummary {
        let archetype = enemy.archetype();
        let count = if enemy.is_child {
            1
        } else {
            self.drop_count(archetype).max(1)
        };
        let each = (enemy.value / count).max(1);

        let mut summary = LootSummary::default();
        for _ in 0..count {
            let offset = Vec2::new(
                rng.random_range(-SCATTER..=SCATTER),
                rng.random_range(-SCATTER..=SCATTER),
            );
            let (_, ore) = collectibles.acquire();
            ore.spawn(enemy.pos + offset, each, rng);
            summary.collectibles += 1;
            summary.ore += each;
        }

        if !enemy.is_child
            && !catalog.is_empty()
            && rng.random::<f32>() < self.card_chance(archetype)
        {
            let rarity = Rarity::roll(rng);
            if let Some(card) = catalog.random_card(rng, rarity) {
                let (_, drop) = card_drops.acquire();
                drop.spawn(enemy.pos, card, rng);
                summary.card_dropped = true;
            }
        }

        log::debug!(
            "{:?} dropped {} ore in {} pieces{}",
            archetype,
            summary.ore,
            summary.collectibles,
            if summary.card_dropped { " and a card" } else { "" }
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardKind, Effect, Operation, Stat};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn dead(archetype: Archetype) -> Enemy {
        let mut enemy = Enemy::new(archetype);
        enemy.spawn(Vec2::new(500.0, 300.0), 0);
        enemy.die();
        enemy
    }

    fn catalog() -> CardCatalog {
        CardCatalog::from_cards(vec![Card {
            id: "sharp".into(),
            name: "Sharp Rounds".into(),
            rarity: Rarity::Common,
            kind: CardKind::Passive,
            description: String::new(),
            effect: Effect {
                stat: Stat::Damage,
                operation: Operation::Add,
                value: 2.0,
            },
        }])
        .unwrap()
    }

    #[test]
    fn test_missing_key_defaults_to_one_drop() {
        let table = LootTable::empty();
        assert_eq!(table.drop_count(Archetype::Spawner), 1);
        assert_eq!(LootTable::default().drop_count(Archetype::Spawner), 5);
    }

    #[test]
    fn test_value_split_across_drops() {
        let table = LootTable::default();
        let mut ores: Pool<Collectible> = Pool::with_capacity(8);
        let mut cards: Pool<CardDrop> = Pool::with_capacity(1);
        let mut rng = Pcg32::seed_from_u64(11);

        let summary = table.emit(
            &dead(Archetype::Sniper),
            &mut ores,
            &mut cards,
            &CardCatalog::empty(),
            &mut rng,
        );
        assert_eq!(summary.collectibles, 2);
        assert_eq!(summary.ore, 20);
        assert!(ores.iter().all(|(_, o)| o.value == 10 && o.active));
    }

    #[test]
    fn test_child_drops_single_piece() {
        let table = LootTable::default();
        let mut ores: Pool<Collectible> = Pool::with_capacity(8);
        let mut cards: Pool<CardDrop> = Pool::with_capacity(1);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut child = dead(Archetype::Rush);
        child.is_child = true;
        child.value = 3;

        let summary = table.emit(&child, &mut ores, &mut cards, &catalog(), &mut rng);
        assert_eq!(summary.collectibles, 1);
        assert_eq!(summary.ore, 3);
        assert!(!summary.card_dropped);
    }

    #[test]
    fn test_card_drop_needs_catalog() {
        let mut table = LootTable::default();
        table.set_card_chance(Archetype::Rush, 1.0);
        let mut ores: Pool<Collectible> = Pool::with_capacity(8);
        let mut cards: Pool<CardDrop> = Pool::with_capacity(1);
        let mut rng = Pcg32::seed_from_u64(11);

        let none = table.emit(
            &dead(Archetype::Rush),
            &mut ores,
            &mut cards,
            &CardCatalog::empty(),
            &mut rng,
        );
        assert!(!none.card_dropped);
        assert_eq!(cards.active_count(), 0);

        let some = table.emit(&dead(Archetype::Rush), &mut ores, &mut cards, &catalog(), &mut rng);
        assert!(some.card_dropped);
        let (_, drop) = cards.iter().next().unwrap();
        assert_eq!(drop.card.as_ref().unwrap().id, "sharp");
    }
}
