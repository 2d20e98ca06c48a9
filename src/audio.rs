//! Sound cues
//!
//! The rules engine never plays audio itself. Events are mapped to cues,
//! and an `AudioManager` forwards them to whatever `SoundSink` the frontend
//! provides. Each cue also carries a tone recipe so a sink can synthesize it
//! procedurally instead of loading files.

use crate::settings::Settings;
use crate::sim::{GameEvent, ItemKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Good or bonus item caught
    EarnedPoint,
    /// Lost stars (bad item, slowdown, missed item)
    LostPoint,
    /// Speed boost picked up
    Boost,
    /// Round lost
    GameOver,
    /// Round won
    Win,
    /// One of the final seconds ticked by
    CountdownTick,
}

/// Oscillator recipe for a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f32,
    /// Relative loudness (0.0 - 1.0) before volume settings
    pub gain: f32,
}

impl SoundCue {
    /// Cue for an event, if the event makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ItemCaught { kind, .. } => Some(match kind {
                ItemKind::Good | ItemKind::Bonus => SoundCue::EarnedPoint,
                ItemKind::Bad | ItemKind::Slowdown => SoundCue::LostPoint,
                ItemKind::Speedup => SoundCue::Boost,
            }),
            GameEvent::ItemMissed { stars_delta, .. } if *stars_delta < 0.0 => {
                Some(SoundCue::LostPoint)
            }
            GameEvent::CountdownTick(_) => Some(SoundCue::CountdownTick),
            GameEvent::RoundWon { .. } => Some(SoundCue::Win),
            GameEvent::RoundLost { .. } => Some(SoundCue::GameOver),
            _ => None,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            // Rising chirp
            SoundCue::EarnedPoint => Tone {
                start_hz: 660.0,
                end_hz: 1320.0,
                duration: 0.12,
                gain: 0.5,
            },
            // Falling buzz
            SoundCue::LostPoint => Tone {
                start_hz: 220.0,
                end_hz: 110.0,
                duration: 0.2,
                gain: 0.5,
            },
            SoundCue::Boost => Tone {
                start_hz: 300.0,
                end_hz: 1800.0,
                duration: 0.35,
                gain: 0.6,
            },
            SoundCue::GameOver => Tone {
                start_hz: 400.0,
                end_hz: 60.0,
                duration: 1.2,
                gain: 0.7,
            },
            SoundCue::Win => Tone {
                start_hz: 523.0,
                end_hz: 1046.0,
                duration: 0.9,
                gain: 0.7,
            },
            // Short tick
            SoundCue::CountdownTick => Tone {
                start_hz: 1000.0,
                end_hz: 1000.0,
                duration: 0.04,
                gain: 0.3,
            },
        }
    }
}

/// Something that can play a cue (fire and forget)
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        let tone = cue.tone();
        log::debug!(
            "♪ {:?} {:.0}->{:.0} Hz {:.2}s vol {:.2}",
            cue,
            tone.start_hz,
            tone.end_hz,
            tone.duration,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager using the volume settings from `settings`
    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol * cue.tone().gain);
    }

    /// Play the cues for a batch of events, in order
    pub fn play_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for cue in events.into_iter().filter_map(SoundCue::for_event) {
            self.play(cue);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
