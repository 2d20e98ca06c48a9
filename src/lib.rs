//! Star Catch - rules engine for a catch-the-falling-object arcade game
//!
//! Core modules:
//! - `sim`: Gameplay rules (spawning, catches, scoring, round state machine)
//! - `platform`: Input event model and key mapping
//! - `audio`: Sound cue selection and playback seam
//! - `settings`: Data-driven rule presets and config loading

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, SoundCue, SoundSink};
pub use settings::{RespawnPolicy, RulesPreset, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate of the host loop
    pub const TICK_RATE: f32 = 30.0;
    /// Nominal frame delta (seconds)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Largest frame delta the host feeds into a tick (slow frames are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1600.0;
    pub const SCREEN_HEIGHT: f32 = SCREEN_WIDTH * 0.75;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = SCREEN_WIDTH / 10.0;
    /// Gap between the player's sprite top and the part that actually catches
    pub const PLAYER_TOP_OFFSET: f32 = SCREEN_WIDTH * (83.0 / 800.0);
    /// Top edge of the player sprite (the ground line it walks on)
    pub const PLAYER_Y: f32 = SCREEN_HEIGHT - PLAYER_SIZE - PLAYER_TOP_OFFSET;
    /// Horizontal speed in pixels/s
    pub const PLAYER_SPEED: f32 = 600.0;

    /// Falling item defaults
    pub const ITEM_SIZE: f32 = SCREEN_WIDTH / 12.0;
    /// Items at or below this y have hit the ground
    pub const GROUND_LINE: f32 = SCREEN_HEIGHT - PLAYER_SIZE;
    /// Base fall speed in pixels/s (12 px per frame at 30 Hz)
    pub const ITEM_SPEED: f32 = SCREEN_WIDTH * (3.0 / 400.0) * TICK_RATE;
    /// Slowest an item may ever fall
    pub const MIN_ITEM_SPEED: f32 = 30.0;

    /// Hard cap on items spawned per wave
    pub const MAX_ITEMS_PER_WAVE: u32 = 4;
}
