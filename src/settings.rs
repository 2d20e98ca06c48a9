//! Rule presets and tunables
//!
//! Every number the rules engine uses lives here so a variant can be
//! described as data. Loaded from JSON; missing fields fall back to the
//! default (Timed) preset.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ItemKind;

/// Rule variants shipped with the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesPreset {
    /// Hearts, one object at a time, a missed object costs a heart
    Classic,
    /// Sixty second countdown with a score to reach
    #[default]
    Timed,
    /// Timed rules with score-gated waves of up to four items
    Scaling,
}

impl RulesPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesPreset::Classic => "Classic",
            RulesPreset::Timed => "Timed",
            RulesPreset::Scaling => "Scaling",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(RulesPreset::Classic),
            "timed" => Some(RulesPreset::Timed),
            "scaling" | "waves" => Some(RulesPreset::Scaling),
            _ => None,
        }
    }
}

/// When a removed item gets replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RespawnPolicy {
    /// Refill the wave as soon as no item is falling
    Immediate,
    /// Spawn a wave every `spawn_interval` seconds
    #[default]
    OnInterval,
}

/// One row of the weighted spawn table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: ItemKind,
    /// Relative multiplicity in the draw
    pub weight: u32,
    /// Entry is only eligible once score reaches this value
    #[serde(default)]
    pub unlock_score: i64,
}

impl SpawnEntry {
    pub const fn new(kind: ItemKind, weight: u32) -> Self {
        Self {
            kind,
            weight,
            unlock_score: 0,
        }
    }

    pub const fn unlocked_at(mut self, score: i64) -> Self {
        self.unlock_score = score;
        self
    }
}

/// Gameplay rules and audio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset these values started from (informational)
    pub preset: RulesPreset,

    // === Arena ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Items whose top reaches this y are missed
    pub ground_line: f32,

    // === Player ===
    pub player_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Catch zone starts this far below the sprite top
    pub player_top_offset: f32,
    /// Base horizontal speed (pixels/s)
    pub player_speed: f32,

    // === Spawning ===
    pub item_size: f32,
    pub spawn_table: Vec<SpawnEntry>,
    /// Base fall speed (pixels/s)
    pub item_speed: f32,
    /// Bad items fall this much slower
    pub bad_speed_offset: f32,
    /// Base fall speed gained on every catch
    pub catch_speed_step: f32,
    pub respawn: RespawnPolicy,
    /// Seconds between waves with `RespawnPolicy::OnInterval`
    pub spawn_interval: f32,
    /// Upper bound for items per wave (at most `MAX_ITEMS_PER_WAVE`)
    pub max_items_per_wave: u32,
    /// Score step that grows the wave by one item (0 = never)
    pub wave_score_step: i64,
    /// Base fall speed gained every time the wave grows
    pub wave_speed_step: f32,

    // === Scoring ===
    pub good_points: i64,
    pub bonus_points: i64,
    pub initial_stars: f32,
    pub bad_star_penalty: f32,
    pub slowdown_star_penalty: f32,
    /// Stars lost when a good item reaches the ground
    pub miss_star_penalty: f32,
    /// Base fall speed gained when a good item reaches the ground
    pub miss_speed_step: f32,

    // === Timed modifiers ===
    pub slowdown_delta: f32,
    /// Slowdown only bites while the player is faster than this
    pub slowdown_min_speed: f32,
    pub speedup_delta: f32,
    /// Seconds a slowdown/speedup lasts
    pub modifier_duration: f32,

    // === Round ===
    /// Round length in seconds (None = untimed)
    pub round_duration: Option<f32>,
    /// Countdown display starts at this many seconds left
    pub countdown_threshold: f32,
    /// Score needed to win (None = no Won state)
    pub winning_score: Option<i64>,
    /// Stars must stay strictly above this to win
    pub winning_stars: f32,
    pub instruction_pages: u8,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(RulesPreset::Timed)
    }
}

impl Settings {
    /// Build the rules for a preset
    pub fn from_preset(preset: RulesPreset) -> Self {
        let timed = Self {
            preset: RulesPreset::Timed,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_line: GROUND_LINE,

            player_y: PLAYER_Y,
            player_width: PLAYER_SIZE,
            player_height: PLAYER_SIZE,
            player_top_offset: PLAYER_TOP_OFFSET,
            player_speed: PLAYER_SPEED,

            item_size: ITEM_SIZE,
            spawn_table: vec![
                SpawnEntry::new(ItemKind::Good, 4),
                SpawnEntry::new(ItemKind::Bad, 6),
                SpawnEntry::new(ItemKind::Bonus, 1),
                SpawnEntry::new(ItemKind::Slowdown, 1),
                SpawnEntry::new(ItemKind::Speedup, 1),
            ],
            item_speed: ITEM_SPEED,
            bad_speed_offset: 60.0,
            catch_speed_step: 0.0,
            respawn: RespawnPolicy::OnInterval,
            spawn_interval: 1.0,
            max_items_per_wave: 1,
            wave_score_step: 0,
            wave_speed_step: 0.0,

            good_points: 1,
            bonus_points: 3,
            initial_stars: 5.0,
            bad_star_penalty: 0.5,
            slowdown_star_penalty: 1.0,
            miss_star_penalty: 0.0,
            miss_speed_step: 0.0,

            slowdown_delta: 240.0,
            slowdown_min_speed: 240.0,
            speedup_delta: 300.0,
            modifier_duration: 5.0,

            round_duration: Some(60.0),
            countdown_threshold: 10.0,
            winning_score: Some(50),
            winning_stars: 3.0,
            instruction_pages: 2,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        };

        match preset {
            RulesPreset::Timed => timed,
            RulesPreset::Classic => Self {
                preset,
                spawn_table: vec![
                    SpawnEntry::new(ItemKind::Good, 8),
                    SpawnEntry::new(ItemKind::Bonus, 1).unlocked_at(10),
                    SpawnEntry::new(ItemKind::Speedup, 1).unlocked_at(10),
                    SpawnEntry::new(ItemKind::Bad, 2).unlocked_at(20),
                ],
                catch_speed_step: TICK_RATE,
                respawn: RespawnPolicy::Immediate,
                bonus_points: 5,
                initial_stars: 3.0,
                miss_star_penalty: 1.0,
                miss_speed_step: SCREEN_WIDTH / 800.0 * TICK_RATE,
                speedup_delta: SCREEN_WIDTH / 320.0 * TICK_RATE,
                round_duration: None,
                winning_score: None,
                instruction_pages: 1,
                ..timed
            },
            RulesPreset::Scaling => Self {
                preset,
                spawn_interval: 1.5,
                max_items_per_wave: MAX_ITEMS_PER_WAVE,
                wave_score_step: 10,
                wave_speed_step: 20.0,
                ..timed
            },
        }
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &'static str| Err(SettingsError::Invalid(msg));

        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return invalid("screen dimensions must be positive");
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 || self.item_size <= 0.0 {
            return invalid("player and item sizes must be positive");
        }
        if self.item_size > self.screen_width || self.player_width > self.screen_width {
            return invalid("player and items must fit the screen width");
        }
        if self.ground_line <= 0.0 {
            return invalid("ground line must be below the top of the screen");
        }
        if self.player_speed <= 0.0 || self.item_speed <= 0.0 {
            return invalid("speeds must be positive");
        }
        if !self
            .spawn_table
            .iter()
            .any(|e| e.weight > 0 && e.unlock_score <= 0)
        {
            return invalid("spawn table needs a weighted entry available from the start");
        }
        if self.catch_speed_step < 0.0 || self.miss_speed_step < 0.0 {
            return invalid("item speed steps cannot be negative");
        }
        if self.spawn_interval <= 0.0 || self.modifier_duration <= 0.0 {
            return invalid("spawn interval and modifier duration must be positive");
        }
        if self.max_items_per_wave == 0 || self.max_items_per_wave > MAX_ITEMS_PER_WAVE {
            return invalid("items per wave must be between 1 and 4");
        }
        if self.wave_score_step < 0 {
            return invalid("wave score step cannot be negative");
        }
        if matches!(self.round_duration, Some(d) if d <= 0.0) {
            return invalid("round duration must be positive");
        }
        if self.initial_stars <= 0.0 {
            return invalid("initial stars must be positive");
        }
        if !(0.0..=1.0).contains(&self.master_volume) || !(0.0..=1.0).contains(&self.sfx_volume) {
            return invalid("volumes must be between 0 and 1");
        }
        Ok(())
    }

    /// Whether this rule set has a countdown clock
    pub fn is_timed(&self) -> bool {
        self.round_duration.is_some()
    }
}

/// Why a configuration was rejected
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "cannot read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed settings: {e}"),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}
