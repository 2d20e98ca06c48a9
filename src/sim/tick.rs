//! Per-frame simulation tick
//!
//! Order within a tick: input/phase transitions, player movement, item
//! advancement and catches, modifier expiry, spawning, clock, end check.
//! Every timer advances by the frame's `dt`, so uneven frame times do not
//! drift the clock.

use std::cmp::Ordering;

use super::collision::catches;
use super::flow::{self, RoundOutcome};
use super::scoring;
use super::spawn;
use super::state::{FallingItem, GameEvent, GamePhase, RoundState};
use crate::settings::RespawnPolicy;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal steering, -1 (left) to 1 (right)
    pub move_dir: f32,
    /// A key was pressed (advances menu screens)
    pub confirm: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over after a round ends
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut RoundState, input: &TickInput, dt: f32) {
    let dt = dt.max(0.0);

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    let pages = state.settings.instruction_pages;
    if let Some(to) = flow::input_transition(state.phase, input, pages) {
        if to == GamePhase::Playing && state.phase != GamePhase::Paused {
            start_round(state);
        }
        state.set_phase(to);
        return;
    }

    // Nothing moves outside active play
    if state.phase != GamePhase::Playing {
        return;
    }

    state.clock += dt;

    let width = state.settings.screen_width;
    state.player.steer(input.move_dir, dt, width);

    advance_items(state, dt);
    scoring::expire_modifiers(state);

    spawn::update_wave_size(state);
    match state.settings.respawn {
        RespawnPolicy::Immediate => {
            if state.items.is_empty() {
                spawn::spawn_wave(state);
            }
        }
        RespawnPolicy::OnInterval => {
            // A long frame can owe more than one wave
            state.spawn_timer += dt;
            let interval = state.settings.spawn_interval;
            while state.spawn_timer >= interval {
                state.spawn_timer -= interval;
                spawn::spawn_wave(state);
            }
        }
    }

    update_clock(state, dt);

    if let Some(outcome) = flow::round_outcome(state) {
        finish_round(state, outcome);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Reset the round to its configured start and drop in the first wave
pub fn start_round(state: &mut RoundState) {
    state.reset_round();
    log::info!(
        "Round start: stars={} time={:?} target={:?}",
        state.stars,
        state.time_remaining,
        state.settings.winning_score
    );
    spawn::spawn_wave(state);
}

/// Move every item down; resolve ground hits first, then catches.
/// Resolved items leave the round in the same tick.
fn advance_items(state: &mut RoundState, dt: f32) {
    let catcher = state.player.catch_rect(state.settings.player_top_offset);
    let ground = state.settings.ground_line;

    let mut caught: Vec<FallingItem> = Vec::new();
    let mut missed: Vec<FallingItem> = Vec::new();

    state.items.retain_mut(|item| {
        item.fall(dt);
        if item.body.pos.y >= ground {
            missed.push(item.clone());
            false
        } else if catches(&catcher, &item.body.rect()) {
            caught.push(item.clone());
            false
        } else {
            true
        }
    });

    for item in &missed {
        log::debug!("Missed {:?} #{}", item.kind, item.id);
        scoring::apply_miss(state, item);
    }
    for item in &caught {
        scoring::apply_catch(state, item);
    }
}

/// Count the round clock down and announce each final second once
fn update_clock(state: &mut RoundState, dt: f32) {
    let Some(remaining) = state.time_remaining.as_mut() else {
        return;
    };
    *remaining = (*remaining - dt).max(0.0);
    let remaining = *remaining;

    if remaining <= state.settings.countdown_threshold {
        let value = remaining.ceil() as u32;
        if value >= 1 && state.countdown != Some(value) {
            state.countdown = Some(value);
            state.events.push(GameEvent::CountdownTick(value));
        }
    }
}

fn finish_round(state: &mut RoundState, outcome: RoundOutcome) {
    match outcome {
        RoundOutcome::Won => {
            log::info!("Round won with score {} and {} stars", state.score, state.stars);
            state.events.push(GameEvent::RoundWon { score: state.score });
        }
        RoundOutcome::Lost(reason) => {
            log::info!("Round lost ({:?}) with score {}", reason, state.score);
            state.events.push(GameEvent::RoundLost {
                score: state.score,
                reason,
            });
        }
    }
    state.set_phase(outcome.phase());
}

/// Fill in input for demo play: confirm menus, chase the lowest item worth
/// catching, and sidestep unwanted items when nothing is worth chasing.
fn autopilot(state: &RoundState, input: &mut TickInput) {
    match state.phase {
        GamePhase::MainMenu | GamePhase::Instructions { .. } => input.confirm = true,
        GamePhase::Playing => {
            let player = &state.player.body;
            let lowest = |wanted: bool| {
                state
                    .items
                    .iter()
                    .filter(move |i| i.kind.is_desirable() == wanted)
                    .max_by(|a, b| {
                        a.body
                            .pos
                            .y
                            .partial_cmp(&b.body.pos.y)
                            .unwrap_or(Ordering::Equal)
                    })
            };

            // Settle once roughly underneath
            let deadzone = player.size.x * 0.25;

            input.move_dir = if let Some(target) = lowest(true) {
                let dx = target.body.center_x() - player.center_x();
                if dx.abs() <= deadzone { 0.0 } else { dx.signum() }
            } else if let Some(threat) = lowest(false) {
                let overlapping = player.rect().overlaps_x(&threat.body.rect());
                if overlapping {
                    let away = player.center_x() - threat.body.center_x();
                    if away == 0.0 { 1.0 } else { away.signum() }
                } else {
                    0.0
                }
            } else {
                0.0
            };
        }
        _ => {}
    }
}
