//! Gameplay rules module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only enters through `tick`'s `dt`
//! - Seeded RNG only
//! - Stable iteration order (by item ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod flow;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, catches};
pub use flow::{RoundOutcome, input_transition, round_outcome};
pub use spawn::{choose_kind, spawn_item, spawn_wave};
pub use state::{
    ActiveModifiers, Body, FallingItem, GameEvent, GamePhase, ItemKind, ItemView, LossReason,
    ModifierKind, Player, RoundState, Snapshot, TimedModifier,
};
pub use tick::{TickInput, start_round, tick};
