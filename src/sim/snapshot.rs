//! Read-only view of the state for a renderer
//!
//! Buffers are reused between frames; `capture` clears and refills them.

use glam::Vec2;
use serde::Serialize;

use super::director::DirectorPhase;
use super::enemy::{Archetype, Behavior, SniperPhase};
use super::projectile::Owner;
use super::state::{GamePhase, GameState};
use crate::cards::{CardKind, Rarity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub hp_ratio: f32,
    /// False while blinking during invulnerability
    pub visible: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub radius: f32,
    pub archetype: Archetype,
    pub is_child: bool,
    pub hp_ratio: f32,
    /// Only set for snipers
    pub sniper_phase: Option<SniperPhase>,
    /// Snipers flash just before firing
    pub ready_to_fire: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub owner: Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectibleView {
    pub pos: Vec2,
    pub radius: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardDropView {
    pub pos: Vec2,
    pub rarity: Rarity,
    /// Border color for the rarity (RGB)
    pub color: [u8; 3],
    pub kind: CardKind,
    pub visible: bool,
    /// Player is close enough to collect
    pub in_range: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub sector: u32,
    pub director_phase: DirectorPhase,
    /// Whole seconds left before the next sector
    pub countdown: Option<u32>,
    pub ore: u32,
    pub kills: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub cards: Vec<String>,
    pub game_phase: GamePhase,
}

impl Default for HudView {
    fn default() -> Self {
        Self {
            sector: 1,
            director_phase: DirectorPhase::Spawning,
            countdown: None,
            ore: 0,
            kills: 0,
            hp: 0.0,
            max_hp: 0.0,
            cards: Vec::new(),
            game_phase: GamePhase::Playing,
        }
    }
}

/// Overlay toggles resolved from settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DebugView {
    pub hitboxes: bool,
    pub hp_bars: bool,
    pub fps: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub collectibles: Vec<CollectibleView>,
    pub card_drops: Vec<CardDropView>,
    pub hud: HudView,
    pub debug: DebugView,
}

impl RenderSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from the current state
    pub fn capture(&mut self, state: &GameState) {
        self.tick = state.time_ticks;

        let player = &state.player;
        self.player = PlayerView {
            pos: player.pos,
            radius: player.hitbox_radius,
            hp_ratio: player.hp_ratio(),
            visible: player.is_visible(),
            alive: player.alive,
        };

        self.enemies.clear();
        self.enemies.extend(
            state
                .enemies
                .iter()
                .filter(|(_, e)| e.is_alive())
                .map(|(_, e)| {
                    let (sniper_phase, ready_to_fire) = match &e.behavior {
                        Behavior::Sniper(s) => (Some(s.phase), s.can_fire()),
                        _ => (None, false),
                    };
                    EnemyView {
                        pos: e.pos,
                        radius: e.radius,
                        archetype: e.archetype(),
                        is_child: e.is_child,
                        hp_ratio: e.hp_ratio(),
                        sniper_phase,
                        ready_to_fire,
                    }
                }),
        );

        self.projectiles.clear();
        self.projectiles
            .extend(state.projectiles.iter().map(|(_, p)| ProjectileView {
                pos: p.pos,
                radius: p.radius,
                owner: p.owner,
            }));

        self.collectibles.clear();
        self.collectibles
            .extend(state.collectibles.iter().map(|(_, c)| CollectibleView {
                pos: c.pos,
                radius: c.radius,
                visible: c.is_visible(),
            }));

        self.card_drops.clear();
        self.card_drops.extend(state.card_drops.iter().filter_map(|(_, d)| {
            let card = d.card.as_ref()?;
            Some(CardDropView {
                pos: d.render_pos(),
                rarity: card.rarity,
                color: card.rarity.color(),
                kind: card.kind,
                visible: d.is_visible(),
                in_range: player.alive && d.in_range(player.pos),
            })
        }));

        let hud = &mut self.hud;
        hud.sector = state.director.sector();
        hud.director_phase = state.director.phase();
        hud.countdown = state.director.countdown_seconds();
        hud.ore = state.stats.ore;
        hud.kills = state.stats.kills;
        hud.hp = player.hp;
        hud.max_hp = player.stats.max_hp;
        hud.cards.clear();
        hud.cards.extend(player.equipped().map(|c| c.name.clone()));
        hud.game_phase = state.phase;

        self.debug = DebugView {
            hitboxes: state.settings.effective_hitboxes(),
            hp_bars: state.settings.effective_hp_bars(),
            fps: state.settings.show_fps,
        };
    }
}
