//! Round state and core entity types
//!
//! Everything the rules engine mutates during a round lives in `RoundState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for any key
    MainMenu,
    /// Instruction screen `page` (0-based)
    Instructions { page: u8 },
    /// Active gameplay
    Playing,
    /// Gameplay frozen until pause is toggled again
    Paused,
    /// Round ended with the winning score reached
    Won,
    /// Round ended out of stars or out of time
    Lost,
}

impl GamePhase {
    /// Round is over and waiting for restart
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Good,
    Bad,
    Bonus,
    Slowdown,
    Speedup,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Good,
        ItemKind::Bad,
        ItemKind::Bonus,
        ItemKind::Slowdown,
        ItemKind::Speedup,
    ];

    /// Items the player wants to catch
    pub fn is_desirable(&self) -> bool {
        matches!(self, ItemKind::Good | ItemKind::Bonus | ItemKind::Speedup)
    }
}

/// Shared geometry for anything on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second along the body's axis of motion
    pub speed: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self { pos, size, speed }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// The catcher walking along the bottom of the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Speed with no modifier active
    pub base_speed: f32,
}

impl Player {
    /// Player centred on the player line
    pub fn new(settings: &Settings) -> Self {
        let x = (settings.screen_width - settings.player_width) / 2.0;
        Self {
            body: Body::new(
                Vec2::new(x, settings.player_y),
                Vec2::new(settings.player_width, settings.player_height),
                settings.player_speed,
            ),
            base_speed: settings.player_speed,
        }
    }

    /// Move horizontally by `dir` (-1..=1) for `dt` seconds, staying on screen
    pub fn steer(&mut self, dir: f32, dt: f32, screen_width: f32) {
        let dir = dir.clamp(-1.0, 1.0);
        let max_x = (screen_width - self.body.size.x).max(0.0);
        self.body.pos.x = (self.body.pos.x + dir * self.body.speed * dt).clamp(0.0, max_x);
    }

    /// Rectangle that catches items (sprite minus the top offset)
    pub fn catch_rect(&self, top_offset: f32) -> Rect {
        let mut rect = self.body.rect();
        rect.min.y += top_offset;
        rect
    }
}

/// A falling item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    pub body: Body,
}

impl FallingItem {
    /// Fall for `dt` seconds
    pub fn fall(&mut self, dt: f32) {
        self.body.pos.y += self.body.speed * dt;
    }
}

/// Timed player-speed modifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKind {
    Slowdown,
    Speedup,
}

/// A running modifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedModifier {
    /// Round clock value at activation
    pub started_at: f32,
    /// Speed change actually applied (0 when the slowdown guard blocked it)
    pub delta: f32,
}

/// Active power-up effects, at most one of each kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveModifiers {
    pub slowdown: Option<TimedModifier>,
    pub speedup: Option<TimedModifier>,
}

impl ActiveModifiers {
    pub fn get(&self, kind: ModifierKind) -> Option<&TimedModifier> {
        match kind {
            ModifierKind::Slowdown => self.slowdown.as_ref(),
            ModifierKind::Speedup => self.speedup.as_ref(),
        }
    }

    pub fn slot(&mut self, kind: ModifierKind) -> &mut Option<TimedModifier> {
        match kind {
            ModifierKind::Slowdown => &mut self.slowdown,
            ModifierKind::Speedup => &mut self.speedup,
        }
    }

    /// Net change to the player's base speed
    pub fn speed_delta(&self) -> f32 {
        let up = self.speedup.map_or(0.0, |m| m.delta);
        let down = self.slowdown.map_or(0.0, |m| m.delta);
        up - down
    }

    pub fn is_empty(&self) -> bool {
        self.slowdown.is_none() && self.speedup.is_none()
    }
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    OutOfStars,
    TimeUp,
}

/// Things that happened during a tick, for the audio/render layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ItemSpawned { id: u32, kind: ItemKind },
    ItemCaught { id: u32, kind: ItemKind, score_delta: i64, stars_delta: f32 },
    ItemMissed { id: u32, kind: ItemKind, stars_delta: f32 },
    ModifierStarted(ModifierKind),
    ModifierExpired(ModifierKind),
    WaveGrew { items_per_wave: u32 },
    CountdownTick(u32),
    RoundWon { score: i64 },
    RoundLost { score: i64, reason: LossReason },
}

/// Complete state of the game between rounds and within one
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Rules in effect
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: i64,
    pub stars: f32,
    /// Seconds left (None for untimed rules)
    pub time_remaining: Option<f32>,
    /// Seconds of unpaused play this round; modifier timestamps use it
    pub clock: f32,
    /// Seconds accumulated toward the next interval spawn
    pub spawn_timer: f32,
    pub items_per_wave: u32,
    /// Score at which the wave grows next
    pub next_wave_score: i64,
    /// Current base fall speed (escalates during the round)
    pub item_speed: f32,
    pub player: Player,
    /// Falling items (sorted by id)
    pub items: Vec<FallingItem>,
    pub modifiers: ActiveModifiers,
    /// Last countdown value announced
    pub countdown: Option<u32>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl RoundState {
    /// Fresh game at the main menu
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut state = Self {
            seed,
            player: Player::new(&settings),
            phase: GamePhase::MainMenu,
            score: 0,
            stars: settings.initial_stars,
            time_remaining: settings.round_duration,
            clock: 0.0,
            spawn_timer: 0.0,
            items_per_wave: 1,
            next_wave_score: settings.wave_score_step,
            item_speed: settings.item_speed,
            items: Vec::new(),
            modifiers: ActiveModifiers::default(),
            countdown: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            settings,
        };
        state.reset_round();
        state
    }

    /// Put score, stars, timer, modifiers, items and player back to their
    /// configured starting values. Does not touch the phase.
    pub fn reset_round(&mut self) {
        let s = &self.settings;
        self.score = 0;
        self.stars = s.initial_stars;
        self.time_remaining = s.round_duration;
        self.clock = 0.0;
        self.spawn_timer = 0.0;
        self.items_per_wave = 1;
        self.next_wave_score = s.wave_score_step;
        self.item_speed = s.item_speed;
        self.player = Player::new(s);
        self.items.clear();
        self.modifiers = ActiveModifiers::default();
        self.countdown = None;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// RNG together with the rules, for draws that read settings
    pub fn rng_and_settings(&mut self) -> (&mut Pcg32, &Settings) {
        (&mut self.rng, &self.settings)
    }

    /// Change phase, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recompute player speed from base speed and running modifiers.
    /// Never drops below `slowdown_min_speed` (or base speed, if lower).
    pub fn refresh_player_speed(&mut self) {
        let base = self.player.base_speed;
        let floor = base.min(self.settings.slowdown_min_speed).max(0.0);
        self.player.body.speed = (base + self.modifiers.speed_delta()).max(floor);
    }

    /// Whole seconds shown on the clock
    pub fn time_display(&self) -> Option<u32> {
        self.time_remaining.map(|t| t.max(0.0).ceil() as u32)
    }

    /// Render-facing view of the state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            phase: self.phase,
            player: self.player.body,
            items: self
                .items
                .iter()
                .map(|i| ItemView {
                    id: i.id,
                    kind: i.kind,
                    x: i.body.pos.x,
                    y: i.body.pos.y,
                })
                .collect(),
            score: self.score,
            stars: self.stars,
            time_remaining: self.time_display(),
            countdown: self.countdown,
            items_per_wave: self.items_per_wave,
        }
    }

    /// Ensure items are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.items.sort_by_key(|i| i.id);
    }
}

/// An item as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: u32,
    pub kind: ItemKind,
    pub x: f32,
    pub y: f32,
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Seed that reproduces this run
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Body,
    pub items: Vec<ItemView>,
    pub score: i64,
    pub stars: f32,
    /// Clock value in whole seconds (None for untimed rules)
    pub time_remaining: Option<u32>,
    /// Final-seconds countdown, when active
    pub countdown: Option<u32>,
    pub items_per_wave: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RulesPreset;

    #[test]
    fn test_new_state_at_main_menu() {
        let state = RoundState::new(Settings::default(), 7);
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert_eq!(state.score, 0);
        assert_eq!(state.stars, 5.0);
        assert_eq!(state.time_remaining, Some(60.0));
        assert!(state.items.is_empty());
        assert_eq!(state.player.body.speed, state.player.base_speed);
    }

    #[test]
    fn test_player_starts_centred() {
        let settings = Settings::default();
        let player = Player::new(&settings);
        assert!((player.body.center_x() - settings.screen_width / 2.0).abs() < 0.001);
        assert_eq!(player.body.pos.y, settings.player_y);
    }

    #[test]
    fn test_steer_clamps_to_screen() {
        let settings = Settings::default();
        let mut player = Player::new(&settings);
        player.steer(-1.0, 100.0, settings.screen_width);
        assert_eq!(player.body.pos.x, 0.0);
        player.steer(1.0, 100.0, settings.screen_width);
        assert_eq!(player.body.pos.x, settings.screen_width - settings.player_width);
    }

    #[test]
    fn test_modifier_speed_delta() {
        let mut mods = ActiveModifiers::default();
        assert_eq!(mods.speed_delta(), 0.0);
        mods.speedup = Some(TimedModifier { started_at: 0.0, delta: 50.0 });
        mods.slowdown = Some(TimedModifier { started_at: 0.0, delta: 20.0 });
        assert_eq!(mods.speed_delta(), 30.0);
        *mods.slot(ModifierKind::Speedup) = None;
        assert_eq!(mods.speed_delta(), -20.0);
        assert!(mods.get(ModifierKind::Slowdown).is_some());
    }

    #[test]
    fn test_untimed_display() {
        let state = RoundState::new(Settings::from_preset(RulesPreset::Classic), 1);
        assert_eq!(state.time_display(), None);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.time_remaining, None);
        assert_eq!(snapshot.seed, state.seed);
    }

    #[test]
    fn test_time_display_rounds_up() {
        let mut state = RoundState::new(Settings::default(), 1);
        state.time_remaining = Some(9.2);
        assert_eq!(state.time_display(), Some(10));
        state.time_remaining = Some(-0.5);
        assert_eq!(state.time_display(), Some(0));
    }

    #[test]
    fn test_set_phase_records_event_once() {
        let mut state = RoundState::new(Settings::default(), 1);
        state.set_phase(GamePhase::Playing);
        state.set_phase(GamePhase::Playing);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::MainMenu,
                to: GamePhase::Playing
            }]
        );
        assert!(state.events.is_empty());
    }
}
