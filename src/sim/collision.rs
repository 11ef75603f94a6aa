//! Collision checks against the surface walls and paddle bands
//!
//! Paddles are flush with the left and right edges of the surface. The
//! "band" of a paddle is the vertical strip it occupies; a ball entering a
//! band is either returned (inside the paddle span) or scores a point.

use super::state::{Ball, Side, Surface};
use crate::consts::{PADDLE_HEIGHT, PADDLE_WIDTH};

/// Outcome of a ball entering a paddle band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandResult {
    /// Ball is not in the band (or is leaving it)
    Clear,
    /// Ball hit the paddle
    Return,
    /// Ball slipped past the paddle
    Miss,
}

/// Check if the ball's top or bottom edge has crossed a horizontal wall
pub fn ball_hits_wall(ball: &Ball, surface: &Surface) -> bool {
    ball.pos.y - ball.radius < 0.0 || ball.pos.y + ball.radius > surface.height
}

/// Check whether the ball has entered the given paddle's band
///
/// Only a ball travelling toward the paddle counts, so a ball that was
/// just returned is not caught again on the following tick.
pub fn ball_in_band(ball: &Ball, side: Side, surface: &Surface) -> bool {
    match side {
        Side::Left => ball.vel.x < 0.0 && ball.pos.x - ball.radius < PADDLE_WIDTH,
        Side::Right => {
            ball.vel.x > 0.0 && ball.pos.x + ball.radius > surface.width - PADDLE_WIDTH
        }
    }
}

/// Check whether the ball's center lies strictly within a paddle's vertical span
pub fn within_paddle_span(ball_y: f32, paddle_y: f32) -> bool {
    ball_y > paddle_y && ball_y < paddle_y + PADDLE_HEIGHT
}

/// Resolve the ball against one paddle band
pub fn check_band(ball: &Ball, side: Side, paddle_y: f32, surface: &Surface) -> BandResult {
    if !ball_in_band(ball, side, surface) {
        BandResult::Clear
    } else if within_paddle_span(ball.pos.y, paddle_y) {
        BandResult::Return
    } else {
        BandResult::Miss
    }
}
