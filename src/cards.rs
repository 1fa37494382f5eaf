//! Card definitions and the keyed card catalog
//!
//! Cards are immutable, loaded once from a JSON table at startup and shared
//! by reference with card drops and the player's equipped slots.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Card rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Epic,
}

impl Rarity {
    /// Roll a rarity: 80% common, 19% uncommon, 1% epic
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.80 {
            Rarity::Common
        } else if roll < 0.99 {
            Rarity::Uncommon
        } else {
            Rarity::Epic
        }
    }

    /// Display color (RGB) used by the renderer
    pub fn color(&self) -> [u8; 3] {
        match self {
            Rarity::Common => [200, 200, 200],
            Rarity::Uncommon => [100, 150, 255],
            Rarity::Epic => [200, 0, 255],
        }
    }
}

/// Whether a card works on its own or needs to be triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Passive,
    Active,
}

/// Player stats a card can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Pierce,
    Damage,
    FireRate,
    Speed,
    MaxHp,
    RegenRate,
    ProjectileCount,
    Lifesteal,
}

/// How an effect combines with the current stat value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Multiply,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub stat: Stat,
    pub operation: Operation,
    pub value: f32,
}

impl Effect {
    /// New stat value after applying this effect to `current`
    pub fn apply(&self, current: f32) -> f32 {
        match self.operation {
            Operation::Add => current + self.value,
            Operation::Multiply => current * self.value,
            Operation::Set => self.value,
        }
    }

    /// Stat value after undoing this effect, or `None` when it cannot be undone
    pub fn revert(&self, current: f32) -> Option<f32> {
        match self.operation {
            Operation::Add => Some(current - self.value),
            Operation::Multiply if self.value != 0.0 => Some(current / self.value),
            Operation::Multiply | Operation::Set => None,
        }
    }
}

/// Immutable card definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(default)]
    pub description: String,
    pub effect: Effect,
}

#[derive(Debug, Deserialize)]
struct CardFile {
    cards: Vec<Card>,
}

/// Card data failed to load
#[derive(Debug, Error)]
pub enum CardError {
    #[error("failed to read card data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed card data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate card id `{0}`")]
    DuplicateId(String),
}

/// Keyed table of all card definitions
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: Vec<Arc<Card>>,
    by_id: HashMap<String, usize>,
}

impl CardCatalog {
    /// Empty catalog; card drops never spawn
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, CardError> {
        let file: CardFile = serde_json::from_str(json)?;
        Self::from_cards(file.cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CardError> {
        let mut catalog = Self::default();
        for card in cards {
            if catalog.by_id.contains_key(&card.id) {
                return Err(CardError::DuplicateId(card.id));
            }
            catalog.by_id.insert(card.id.clone(), catalog.cards.len());
            catalog.cards.push(Arc::new(card));
        }
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a catalog file, degrading to an empty catalog on any failure
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => {
                log::info!("Loaded {} cards from {}", catalog.len(), path.display());
                catalog
            }
            Err(err) => {
                log::warn!(
                    "Card catalog unavailable ({}): {}; card drops disabled",
                    path.display(),
                    err
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Card>> {
        self.by_id.get(id).map(|&i| &self.cards[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> + '_ {
        self.cards.iter()
    }

    /// Random card of the given rarity, falling back to any card when no card
    /// of that rarity exists
    pub fn random_card<R: Rng + ?Sized>(&self, rng: &mut R, rarity: Rarity) -> Option<Arc<Card>> {
        if self.cards.is_empty() {
            return None;
        }
        let matching = self.cards.iter().filter(|c| c.rarity == rarity).count();
        if matching > 0 {
            let pick = rng.random_range(0..matching);
            self.cards
                .iter()
                .filter(|c| c.rarity == rarity)
                .nth(pick)
                .cloned()
        } else {
            let pick = rng.random_range(0..self.cards.len());
            self.cards.get(pick).cloned()
        }
    }
}
