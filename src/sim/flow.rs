//! Round state machine
//!
//! Input-driven transitions between screens, and the end-of-round check.

use super::state::{GamePhase, LossReason, RoundState};
use super::tick::TickInput;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost(LossReason),
}

impl RoundOutcome {
    pub fn phase(&self) -> GamePhase {
        match self {
            RoundOutcome::Won => GamePhase::Won,
            RoundOutcome::Lost(_) => GamePhase::Lost,
        }
    }
}

/// Phase reached from `phase` given this tick's input, if any.
///
/// Entering `Playing` from a menu or a finished round means a fresh round;
/// leaving `Paused` resumes the current one.
pub fn input_transition(
    phase: GamePhase,
    input: &TickInput,
    instruction_pages: u8,
) -> Option<GamePhase> {
    match phase {
        GamePhase::MainMenu if input.confirm => Some(if instruction_pages == 0 {
            GamePhase::Playing
        } else {
            GamePhase::Instructions { page: 0 }
        }),
        GamePhase::Instructions { page } if input.confirm => {
            let next = page.saturating_add(1);
            Some(if next >= instruction_pages {
                GamePhase::Playing
            } else {
                GamePhase::Instructions { page: next }
            })
        }
        GamePhase::Playing if input.pause => Some(GamePhase::Paused),
        GamePhase::Paused if input.pause => Some(GamePhase::Playing),
        GamePhase::Won | GamePhase::Lost if input.restart => Some(GamePhase::Playing),
        _ => None,
    }
}

/// End-of-round check. Won is evaluated before Lost, so a tick that both
/// reaches the winning score and runs out of time counts as a win.
pub fn round_outcome(state: &RoundState) -> Option<RoundOutcome> {
    let s = &state.settings;

    if let Some(target) = s.winning_score {
        if state.score >= target && state.stars > s.winning_stars {
            return Some(RoundOutcome::Won);
        }
    }

    if state.stars <= 0.0 {
        return Some(RoundOutcome::Lost(LossReason::OutOfStars));
    }
    if matches!(state.time_remaining, Some(t) if t <= 0.0) {
        return Some(RoundOutcome::Lost(LossReason::TimeUp));
    }

    None
}
