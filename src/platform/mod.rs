//! Platform abstraction layer
//!
//! Input as a frontend delivers it (discrete key events plus the set of
//! held movement keys), folded into one `TickInput` per frame.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    /// Any other key (still advances menu screens)
    Other,
}

/// Raw input events, polled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Movement keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Horizontal steering: -1, 0 or 1 (both keys cancel out)
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// One frame's worth of mapped input
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub tick: TickInput,
    /// Window closed or Escape pressed
    pub quit: bool,
}

/// Tracks held keys across frames and maps events to tick input
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    held: HeldKeys,
    /// Let the demo AI drive instead of the keyboard
    pub autopilot: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> HeldKeys {
        self.held
    }

    /// Replace held-key state with what the frontend reports
    pub fn sync_held(&mut self, held: HeldKeys) {
        self.held = held;
    }

    /// Fold this frame's events into a tick input
    ///
    /// Any key press confirms a menu screen; Space also toggles pause and
    /// restarts a finished round; Escape quits.
    pub fn map(&mut self, events: &[InputEvent]) -> FrameInput {
        let mut frame = FrameInput::default();

        for event in events {
            match *event {
                InputEvent::Quit => frame.quit = true,
                InputEvent::KeyDown(key) => {
                    frame.tick.confirm = true;
                    match key {
                        Key::Left => self.held.left = true,
                        Key::Right => self.held.right = true,
                        Key::Space => {
                            frame.tick.pause = !frame.tick.pause;
                            frame.tick.restart = true;
                        }
                        Key::Escape => frame.quit = true,
                        Key::Other => {}
                    }
                }
                InputEvent::KeyUp(Key::Left) => self.held.left = false,
                InputEvent::KeyUp(Key::Right) => self.held.right = false,
                InputEvent::KeyUp(_) => {}
            }
        }

        frame.tick.move_dir = self.held.axis();
        frame.tick.autopilot = self.autopilot;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_steer() {
        let mut mapper = InputMapper::new();
        let frame = mapper.map(&[InputEvent::KeyDown(Key::Left)]);
        assert_eq!(frame.tick.move_dir, -1.0);

        // Still held on the next frame with no new events
        let frame = mapper.map(&[]);
        assert_eq!(frame.tick.move_dir, -1.0);
        assert!(!frame.tick.confirm);

        let frame = mapper.map(&[InputEvent::KeyDown(Key::Right)]);
        assert_eq!(frame.tick.move_dir, 0.0);

        let frame = mapper.map(&[InputEvent::KeyUp(Key::Left)]);
        assert_eq!(frame.tick.move_dir, 1.0);
    }

    #[test]
    fn test_space_pauses_and_restarts() {
        let mut mapper = InputMapper::new();
        let frame = mapper.map(&[InputEvent::KeyDown(Key::Space)]);
        assert!(frame.tick.pause);
        assert!(frame.tick.restart);
        assert!(frame.tick.confirm);

        // Two presses in one frame cancel out
        let frame = mapper.map(&[InputEvent::KeyDown(Key::Space), InputEvent::KeyDown(Key::Space)]);
        assert!(!frame.tick.pause);
    }

    #[test]
    fn test_quit_events() {
        let mut mapper = InputMapper::new();
        assert!(mapper.map(&[InputEvent::Quit]).quit);
        assert!(mapper.map(&[InputEvent::KeyDown(Key::Escape)]).quit);
        assert!(!mapper.map(&[InputEvent::KeyDown(Key::Other)]).quit);
    }

    #[test]
    fn test_sync_held() {
        let mut mapper = InputMapper::new();
        mapper.sync_held(HeldKeys { left: false, right: true });
        assert_eq!(mapper.map(&[]).tick.move_dir, 1.0);
        assert_eq!(mapper.held(), HeldKeys { left: false, right: true });
    }
}
