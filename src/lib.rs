//! Volley - a two-paddle ball-volley game
//!
//! Core modules:
//! - `sim`: Match state, per-frame simulation step and mode controller
//! - `input`: Keyboard bindings to logical controls
//! - `audio`: Fire-and-forget audio sink
//! - `renderer`: Scene description and Canvas 2D backend
//! - `settings`: Player preferences

pub mod audio;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, Cue, SilentAudio};
pub use input::{Action, Control, InputEvent};
pub use settings::Settings;
pub use sim::{ControlMode, MatchState, Mode, Side, Surface, step};

/// Game configuration constants
pub mod consts {
    /// Default drawing surface size
    pub const SURFACE_WIDTH: f32 = 1000.0;
    pub const SURFACE_HEIGHT: f32 = 800.0;

    /// Paddle dimensions
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Player paddle travel per tick
    pub const PADDLE_STEP: f32 = 5.0;

    /// Scripted opponent travel per tick
    pub const OPPONENT_STEP: f32 = 4.5;
    /// Opponent ignores offsets smaller than this from the paddle center
    pub const OPPONENT_DEAD_ZONE: f32 = 10.0;

    pub const BALL_RADIUS: f32 = 7.0;
    /// Serve speed magnitudes (units per tick)
    pub const SERVE_SPEED_X: f32 = 6.0;
    pub const SERVE_SPEED_Y: f32 = 5.0;

    /// First side to reach this score wins
    pub const WIN_SCORE: u32 = 9;
}
