//! Input abstraction
//!
//! The host polls an [`InputSource`] once per frame. Keyboards, gamepads or
//! replays plug in behind the trait; the headless runtime uses
//! [`ScriptedInput`].

/// Player intent for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Horizontal steering in `-1.0..=1.0`.
    pub move_x: f32,
    pub fire: bool,
    /// Request to leave the game loop.
    pub quit: bool,
}

impl InputState {
    pub const IDLE: Self = Self {
        move_x: 0.0,
        fire: false,
        quit: false,
    };

    pub fn steer(move_x: f32) -> Self {
        Self {
            move_x: move_x.clamp(-1.0, 1.0),
            ..Self::IDLE
        }
    }

    pub fn firing(mut self) -> Self {
        self.fire = true;
        self
    }
}

pub trait InputSource {
    /// Input for the current frame.
    fn poll(&mut self) -> InputState;
}

/// Replays a fixed list of `(frames, state)` segments, looping at the end.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    segments: Vec<(u32, InputState)>,
    segment: usize,
    frame_in_segment: u32,
}

impl ScriptedInput {
    pub fn new(segments: Vec<(u32, InputState)>) -> Self {
        Self {
            segments: segments.into_iter().filter(|(frames, _)| *frames > 0).collect(),
            segment: 0,
            frame_in_segment: 0,
        }
    }

    /// Sweep left and right across the screen while holding fire.
    pub fn patrol() -> Self {
        Self::new(vec![
            (400, InputState::steer(-1.0).firing()),
            (800, InputState::steer(1.0).firing()),
            (400, InputState::steer(-1.0).firing()),
        ])
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        let Some(&(frames, state)) = self.segments.get(self.segment) else {
            return InputState::IDLE;
        };

        self.frame_in_segment += 1;
        if self.frame_in_segment >= frames {
            self.frame_in_segment = 0;
            self.segment = (self.segment + 1) % self.segments.len();
        }
        state
    }
}
