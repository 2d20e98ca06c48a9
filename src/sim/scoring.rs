//! Catch resolution and timed modifiers

use super::state::{FallingItem, GameEvent, ItemKind, ModifierKind, RoundState, TimedModifier};

/// Score and star change for catching an item of `kind`
///
/// | Kind     | Score        | Stars                   |
/// |----------|--------------|-------------------------|
/// | Good     | good_points  | 0                       |
/// | Bonus    | bonus_points | 0                       |
/// | Bad      | 0            | -bad_star_penalty       |
/// | Slowdown | 0            | -slowdown_star_penalty  |
/// | Speedup  | 0            | 0                       |
pub fn catch_deltas(state: &RoundState, kind: ItemKind) -> (i64, f32) {
    let s = &state.settings;
    match kind {
        ItemKind::Good => (s.good_points, 0.0),
        ItemKind::Bonus => (s.bonus_points, 0.0),
        ItemKind::Bad => (0, -s.bad_star_penalty),
        ItemKind::Slowdown => (0, -s.slowdown_star_penalty),
        ItemKind::Speedup => (0, 0.0),
    }
}

/// Apply a caught item. The caller removes it from the round.
pub fn apply_catch(state: &mut RoundState, item: &FallingItem) {
    let (score_delta, stars_delta) = catch_deltas(state, item.kind);
    state.score += score_delta;
    state.stars += stars_delta;
    state.item_speed += state.settings.catch_speed_step;

    log::debug!(
        "Caught {:?} #{}: score {:+} -> {}, stars {:+} -> {}",
        item.kind,
        item.id,
        score_delta,
        state.score,
        stars_delta,
        state.stars
    );
    state.events.push(GameEvent::ItemCaught {
        id: item.id,
        kind: item.kind,
        score_delta,
        stars_delta,
    });

    match item.kind {
        ItemKind::Slowdown => activate_modifier(state, ModifierKind::Slowdown),
        ItemKind::Speedup => activate_modifier(state, ModifierKind::Speedup),
        _ => {}
    }
}

/// Apply an item that reached the ground. Only good items cost stars, and
/// a missed good item speeds up the items that follow.
pub fn apply_miss(state: &mut RoundState, item: &FallingItem) {
    let stars_delta = match item.kind {
        ItemKind::Good => {
            state.item_speed += state.settings.miss_speed_step;
            -state.settings.miss_star_penalty
        }
        _ => 0.0,
    };
    state.stars += stars_delta;
    state.events.push(GameEvent::ItemMissed {
        id: item.id,
        kind: item.kind,
        stars_delta,
    });
}

/// Start (or restart) a timed modifier on the round clock
pub fn activate_modifier(state: &mut RoundState, kind: ModifierKind) {
    let now = state.clock;

    if let Some(running) = state.modifiers.slot(kind) {
        // Reactivation only restarts the timer; the delta never stacks
        running.started_at = now;
    } else {
        let delta = match kind {
            ModifierKind::Speedup => state.settings.speedup_delta,
            ModifierKind::Slowdown => {
                if state.player.body.speed > state.settings.slowdown_min_speed {
                    state.settings.slowdown_delta
                } else {
                    0.0
                }
            }
        };
        *state.modifiers.slot(kind) = Some(TimedModifier { started_at: now, delta });
    }

    state.refresh_player_speed();
    log::debug!("{:?} active, player speed {}", kind, state.player.body.speed);
    state.events.push(GameEvent::ModifierStarted(kind));
}

/// Drop modifiers that have run for `modifier_duration` seconds
pub fn expire_modifiers(state: &mut RoundState) {
    let duration = state.settings.modifier_duration;
    let now = state.clock;

    for kind in [ModifierKind::Slowdown, ModifierKind::Speedup] {
        let expired = state
            .modifiers
            .get(kind)
            .is_some_and(|m| now - m.started_at >= duration);
        if expired {
            *state.modifiers.slot(kind) = None;
            state.refresh_player_speed();
            log::debug!("{:?} expired, player speed {}", kind, state.player.body.speed);
            state.events.push(GameEvent::ModifierExpired(kind));
        }
    }
}
