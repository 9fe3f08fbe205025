//! The sliding options panel of the file review screen.
//!
//! Positions are fractions of the screen width measured from the left edge:
//! the panel rests off-screen at its start position and slides left to its
//! end position when opened. [`SlidePanel::tick`] advances one frame;
//! [`SlidePanel::play`] drives frames from a timer.

use std::time::Duration;

/// Distance travelled per frame.
pub const STEP: f64 = 0.008;

/// Time between frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Start position of the review screen's panel.
pub const DEFAULT_START: f64 = 1.0;

/// End position of the review screen's panel.
pub const DEFAULT_END: f64 = 0.8;

/// Direction of an animation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Sliding from the start towards the end position.
    Forward,
    /// Sliding back to the start position.
    Backward,
}

/// Animated panel state.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePanel {
    start: f64,
    end: f64,
    width: f64,
    pos: f64,
    in_start_pos: bool,
    motion: Option<Motion>,
}

impl Default for SlidePanel {
    fn default() -> Self {
        Self::new(DEFAULT_START, DEFAULT_END)
    }
}

impl SlidePanel {
    /// A closed panel that opens from `start` to `end`.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            // Overshoot slightly so the last frame lands past `end`
            end: end - 0.01,
            width: (start - end).abs(),
            pos: start,
            in_start_pos: true,
            motion: None,
        }
    }

    /// Current position.
    pub fn position(&self) -> f64 {
        self.pos
    }

    /// Panel width as a fraction of the screen.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Whether the panel is resting at its start position.
    pub fn in_start_pos(&self) -> bool {
        self.in_start_pos
    }

    /// Whether the panel has finished opening.
    pub fn is_open(&self) -> bool {
        !self.in_start_pos
    }

    /// Animation in progress, if any.
    pub fn motion(&self) -> Option<Motion> {
        self.motion
    }

    /// Whether frames are still pending.
    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// How far the panel is towards its end position, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        let span = self.start - self.end;
        if span == 0.0 {
            return 1.0;
        }
        ((self.start - self.pos) / span).clamp(0.0, 1.0)
    }

    /// Start sliding towards the end position.
    pub fn animate_forward(&mut self) {
        self.motion = Some(Motion::Forward);
    }

    /// Start sliding back to the start position.
    pub fn animate_backward(&mut self) {
        self.motion = Some(Motion::Backward);
    }

    /// Slide in whichever direction the panel is not resting in.
    pub fn trigger(&mut self) {
        if self.in_start_pos {
            self.animate_forward();
        } else {
            self.animate_backward();
        }
    }

    /// Advance one frame. Returns `true` while the panel is still moving.
    pub fn tick(&mut self) -> bool {
        match self.motion {
            None => false,
            Some(Motion::Forward) => {
                if self.pos > self.end {
                    self.pos -= STEP;
                    true
                } else {
                    self.in_start_pos = false;
                    self.motion = None;
                    false
                }
            }
            Some(Motion::Backward) => {
                if self.pos < self.start {
                    self.pos += STEP;
                    true
                } else {
                    self.in_start_pos = true;
                    self.motion = None;
                    false
                }
            }
        }
    }

    /// Run the pending animation to completion without waiting.
    pub fn settle(&mut self) {
        while self.tick() {}
    }

    /// Run the pending animation, one frame every [`FRAME_INTERVAL`].
    ///
    /// `frame` is called after every step with the updated panel.
    pub async fn play(&mut self, mut frame: impl FnMut(&SlidePanel)) {
        let mut interval = tokio::time::interval(FRAME_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let moving = self.tick();
            frame(self);
            if !moving {
                break;
            }
        }
    }
}
