//! Star Catch headless runner
//!
//! Plays one round with the demo autopilot, feeding the engine jittered
//! frame times the way a real frame loop would, and prints the final
//! snapshot as JSON.
//!
//! Usage: star-catch [--preset classic|timed|scaling] [--config FILE]
//!                   [--seed N] [--seconds N]

fn main() {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use star_catch::audio::{AudioManager, LogSink};
    use star_catch::consts::{MAX_FRAME_DT, SIM_DT};
    use star_catch::platform::InputMapper;
    use star_catch::sim::{RoundState, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            log::error!("{msg}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let settings = match &options.config {
        Some(path) => match star_catch::Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => star_catch::Settings::from_preset(options.preset),
    };

    log::info!(
        "Star Catch (native) starting: preset={} seed={}",
        settings.preset.as_str(),
        options.seed
    );

    let mut audio = AudioManager::from_settings(LogSink, &settings);
    let mut state = RoundState::new(settings, options.seed);
    let mut mapper = InputMapper::new();
    mapper.autopilot = true;

    // Frame-time jitter stands in for an uneven display loop
    let mut frame_rng = Pcg32::seed_from_u64(options.seed ^ 0x5eed);
    let mut elapsed = 0.0;

    while elapsed < options.seconds {
        let frame = mapper.map(&[]);
        if frame.quit {
            break;
        }

        let dt = (SIM_DT * frame_rng.random_range(0.5..2.0)).min(MAX_FRAME_DT);
        tick(&mut state, &frame.tick, dt);
        elapsed += dt;

        let events = state.drain_events();
        for event in &events {
            log::debug!("{:?}", event);
        }
        audio.play_events(&events);

        if state.phase.is_finished() {
            break;
        }
    }

    log::info!(
        "Finished after {:.1}s (seed {}): {:?} score={} stars={}",
        elapsed,
        state.seed,
        state.phase,
        state.score,
        state.stars
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}

const USAGE: &str =
    "usage: star-catch [--preset classic|timed|scaling] [--config FILE] [--seed N] [--seconds N]";

/// Command-line options
#[derive(Debug)]
struct Options {
    preset: star_catch::RulesPreset,
    config: Option<std::path::PathBuf>,
    seed: u64,
    /// Wall-clock cap on the run
    seconds: f32,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Self {
            preset: star_catch::RulesPreset::default(),
            config: None,
            seed: 1,
            seconds: 120.0,
        };

        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("missing value for {flag}"));
            match flag.as_str() {
                "--preset" => {
                    let name = value()?;
                    options.preset = star_catch::RulesPreset::from_str(&name)
                        .ok_or_else(|| format!("unknown preset: {name}"))?;
                }
                "--config" => options.config = Some(value()?.into()),
                "--seed" => {
                    options.seed = value()?.parse().map_err(|e| format!("bad seed: {e}"))?;
                }
                "--seconds" => {
                    options.seconds = value()?.parse().map_err(|e| format!("bad seconds: {e}"))?;
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(options)
    }
}
