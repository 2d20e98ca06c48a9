//! Spawn policy
//!
//! Weighted draw over the spawn table, item placement, and the score-gated
//! growth of items per wave.

use glam::Vec2;
use rand::Rng;

use super::state::{Body, FallingItem, GameEvent, ItemKind, RoundState};
use crate::consts::{MAX_ITEMS_PER_WAVE, MIN_ITEM_SPEED};
use crate::settings::{Settings, SpawnEntry};

/// Pick an item kind with probability proportional to its weight among the
/// entries unlocked at `score`. Returns `None` when nothing is eligible.
pub fn choose_kind<R: Rng>(rng: &mut R, table: &[SpawnEntry], score: i64) -> Option<ItemKind> {
    let eligible = || {
        table
            .iter()
            .filter(move |e| e.weight > 0 && score >= e.unlock_score)
    };

    let total: u32 = eligible().map(|e| e.weight).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.random_range(0..total);
    for entry in eligible() {
        if roll < entry.weight {
            return Some(entry.kind);
        }
        roll -= entry.weight;
    }

    None
}

/// Build a new item of `kind` at the top of the screen
pub fn spawn_item<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    kind: ItemKind,
    id: u32,
    base_speed: f32,
) -> FallingItem {
    let max_x = (settings.screen_width - settings.item_size).max(0.0);
    let x = if max_x > 0.0 {
        rng.random_range(0.0..=max_x)
    } else {
        0.0
    };

    let speed = match kind {
        ItemKind::Bad => base_speed - settings.bad_speed_offset,
        _ => base_speed,
    };

    FallingItem {
        id,
        kind,
        body: Body::new(
            Vec2::new(x, 0.0),
            Vec2::splat(settings.item_size),
            speed.max(MIN_ITEM_SPEED),
        ),
    }
}

/// Spawn one wave (`items_per_wave` items) into the round
pub fn spawn_wave(state: &mut RoundState) {
    for _ in 0..state.items_per_wave {
        let score = state.score;
        let base_speed = state.item_speed;
        let id = state.next_entity_id();

        let (rng, settings) = state.rng_and_settings();
        let Some(kind) = choose_kind(rng, &settings.spawn_table, score) else {
            log::warn!("No spawnable item at score {}", score);
            return;
        };
        let item = spawn_item(rng, settings, kind, id, base_speed);

        state.items.push(item);
        state.events.push(GameEvent::ItemSpawned { id, kind });
    }
}

/// Grow the wave while score has crossed the rising threshold.
/// Each step adds one item (up to the cap) and speeds items up.
pub fn update_wave_size(state: &mut RoundState) {
    let step = state.settings.wave_score_step;
    if step <= 0 {
        return;
    }
    let cap = state.settings.max_items_per_wave.min(MAX_ITEMS_PER_WAVE);

    while state.items_per_wave < cap && state.score >= state.next_wave_score {
        state.items_per_wave += 1;
        state.next_wave_score += step;
        state.item_speed += state.settings.wave_speed_step;
        log::info!(
            "Wave grew to {} items (next at score {})",
            state.items_per_wave,
            state.next_wave_score
        );
        state.events.push(GameEvent::WaveGrew {
            items_per_wave: state.items_per_wave,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RulesPreset;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_weights_converge_to_ratio() {
        let settings = Settings::default();
        let table = &settings.spawn_table;
        let total: u32 = table.iter().map(|e| e.weight).sum();
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 130_000;

        let mut counts: HashMap<ItemKind, u32> = HashMap::new();
        for _ in 0..n {
            let kind = choose_kind(&mut rng, table, 0).unwrap();
            *counts.entry(kind).or_default() += 1;
        }

        for entry in table {
            let expected = entry.weight as f64 / total as f64;
            let observed = counts[&entry.kind] as f64 / n as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "{:?}: expected {:.3}, observed {:.3}",
                entry.kind,
                expected,
                observed
            );
        }
    }

    #[test]
    fn test_every_listed_kind_reachable() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(choose_kind(&mut rng, &settings.spawn_table, 0).unwrap());
        }
        for kind in ItemKind::ALL {
            assert!(seen.contains(&kind), "{:?} never drawn", kind);
        }
    }

    #[test]
    fn test_unlock_score_gates_entries() {
        let table = Settings::from_preset(RulesPreset::Classic).spawn_table;
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..500 {
            assert_eq!(choose_kind(&mut rng, &table, 0), Some(ItemKind::Good));
        }
        let drawn: Vec<_> = (0..2_000)
            .filter_map(|_| choose_kind(&mut rng, &table, 25))
            .collect();
        assert!(drawn.contains(&ItemKind::Bad));
        assert!(drawn.contains(&ItemKind::Bonus));
    }

    #[test]
    fn test_empty_table_yields_none() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(choose_kind(&mut rng, &[], 0), None);
        let zero = [SpawnEntry::new(ItemKind::Good, 0)];
        assert_eq!(choose_kind(&mut rng, &zero, 0), None);
    }

    #[test]
    fn test_spawn_item_placement() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..200 {
            let item = spawn_item(&mut rng, &settings, ItemKind::Good, id, 300.0);
            assert_eq!(item.body.pos.y, 0.0);
            assert!(item.body.pos.x >= 0.0);
            assert!(item.body.pos.x <= settings.screen_width - settings.item_size);
            assert_eq!(item.body.speed, 300.0);
            assert_eq!(item.body.size, Vec2::splat(settings.item_size));
        }
    }

    #[test]
    fn test_bad_items_fall_slower() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let bad = spawn_item(&mut rng, &settings, ItemKind::Bad, 1, 300.0);
        assert_eq!(bad.body.speed, 300.0 - settings.bad_speed_offset);

        let crawl = spawn_item(&mut rng, &settings, ItemKind::Bad, 2, 10.0);
        assert_eq!(crawl.body.speed, MIN_ITEM_SPEED);
    }

    #[test]
    fn test_wave_growth_capped_at_four() {
        let mut state = RoundState::new(Settings::from_preset(RulesPreset::Scaling), 9);
        let start_speed = state.item_speed;

        state.score = 9;
        update_wave_size(&mut state);
        assert_eq!(state.items_per_wave, 1);

        state.score = 10;
        update_wave_size(&mut state);
        assert_eq!(state.items_per_wave, 2);
        assert_eq!(state.next_wave_score, 20);
        assert!(state.item_speed > start_speed);

        state.score = 1_000;
        update_wave_size(&mut state);
        assert_eq!(state.items_per_wave, 4);
    }

    #[test]
    fn test_spawn_wave_spawns_per_wave_count() {
        let mut state = RoundState::new(Settings::from_preset(RulesPreset::Scaling), 9);
        state.items_per_wave = 3;
        spawn_wave(&mut state);
        assert_eq!(state.items.len(), 3);
        let ids: Vec<_> = state.items.iter().map(|i| i.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_wave_growth_without_step() {
        let mut state = RoundState::new(Settings::default(), 9);
        state.score = 500;
        update_wave_size(&mut state);
        assert_eq!(state.items_per_wave, 1);
    }
}
