//! Match state and core simulation types
//!
//! One long-lived `MatchState` is shared by reference between the
//! simulation step, the mode controller and the renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Controls shown, waiting for the begin input
    Intro,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// A point was scored, ball re-served and halted until continue
    WaitingToContinue,
    /// A side reached the winning score
    Finished,
}

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Right paddle is the scripted opponent
    SinglePlayer,
    /// Right paddle is a second human
    TwoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "Player 1",
            Side::Right => "Player 2",
        }
    }
}

/// Drawing surface dimensions, fixed for the lifetime of a match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest legal paddle offset
    pub fn paddle_max_y(&self) -> f32 {
        (self.height - PADDLE_HEIGHT).max(0.0)
    }

    /// Paddle offset that centers a paddle vertically
    pub fn paddle_center_y(&self) -> f32 {
        self.height / 2.0 - PADDLE_HEIGHT / 2.0
    }
}

/// Currently held paddle keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFlags {
    pub left_up: bool,
    pub left_down: bool,
    /// Right-side flags are only consumed in two-player matches
    pub right_up: bool,
    pub right_down: bool,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub mode: Mode,
    /// `None` until a match is started from the menu
    pub control_mode: Option<ControlMode>,
    pub score_left: u32,
    pub score_right: u32,
    /// Set when the match finishes
    pub winner: Option<Side>,
    pub paddle_left_y: f32,
    pub paddle_right_y: f32,
    pub ball: Ball,
    pub input: InputFlags,
    pub surface: Surface,
    rng: Pcg32,
}

impl MatchState {
    /// Fresh pre-start state: intro mode, zero scores, centered paddles and ball
    pub fn new(surface: Surface, seed: u64) -> Self {
        let paddle_y = surface.paddle_center_y();
        Self {
            mode: Mode::Intro,
            control_mode: None,
            score_left: 0,
            score_right: 0,
            winner: None,
            paddle_left_y: paddle_y,
            paddle_right_y: paddle_y,
            ball: Ball::new(
                surface.center(),
                Vec2::new(SERVE_SPEED_X, SERVE_SPEED_Y),
            ),
            input: InputFlags::default(),
            surface,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.score_left,
            Side::Right => self.score_right,
        }
    }

    /// Zero both scores and forget the winner
    pub fn reset_scores(&mut self) {
        self.score_left = 0;
        self.score_right = 0;
        self.winner = None;
    }

    pub fn center_paddles(&mut self) {
        let y = self.surface.paddle_center_y();
        self.paddle_left_y = y;
        self.paddle_right_y = y;
    }

    /// Center the ball with the opening serve velocity (rightward, downward)
    pub fn serve_fixed(&mut self) {
        self.ball.pos = self.surface.center();
        self.ball.vel = Vec2::new(SERVE_SPEED_X, SERVE_SPEED_Y);
    }

    /// Center the ball with fixed speed magnitudes and random signs
    pub fn serve_random(&mut self) {
        let sx = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.pos = self.surface.center();
        self.ball.vel = Vec2::new(SERVE_SPEED_X * sx, SERVE_SPEED_Y * sy);
    }

    /// Whether the host should keep driving frames
    pub fn frame_loop_active(&self) -> bool {
        self.control_mode.is_some() && self.mode != Mode::Finished
    }
}
