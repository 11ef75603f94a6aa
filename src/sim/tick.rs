//! Per-frame simulation step
//!
//! Advances paddles and ball by one tick, resolves wall and paddle
//! collisions, and hands scoring events to the mode controller.

use super::collision::{BandResult, ball_hits_wall, check_band};
use super::mode;
use super::state::{ControlMode, MatchState, Mode, Side};
use crate::audio::AudioSink;
use crate::consts::*;

/// Advance the match by one tick. Does nothing unless the match is playing.
pub fn step(state: &mut MatchState, audio: &mut impl AudioSink) {
    if state.mode != Mode::Playing {
        return;
    }

    let max_y = state.surface.paddle_max_y();

    state.paddle_left_y = move_paddle(
        state.paddle_left_y,
        state.input.left_up,
        state.input.left_down,
        max_y,
    );

    match state.control_mode {
        Some(ControlMode::TwoPlayer) => {
            state.paddle_right_y = move_paddle(
                state.paddle_right_y,
                state.input.right_up,
                state.input.right_down,
                max_y,
            );
        }
        Some(ControlMode::SinglePlayer) | None => track_ball(state),
    }

    state.ball.pos += state.ball.vel;

    if ball_hits_wall(&state.ball, &state.surface) {
        state.ball.vel.y = -state.ball.vel.y;
    }

    // Left band first; a scoring event ends the tick
    for (side, paddle_y) in [
        (Side::Left, state.paddle_left_y),
        (Side::Right, state.paddle_right_y),
    ] {
        match check_band(&state.ball, side, paddle_y, &state.surface) {
            BandResult::Clear => {}
            BandResult::Return => state.ball.vel.x = -state.ball.vel.x,
            BandResult::Miss => {
                let scorer = match side {
                    Side::Left => Side::Right,
                    Side::Right => Side::Left,
                };
                award_point(state, scorer, audio);
                return;
            }
        }
    }
}

/// Move a player paddle one step, clamped to the surface
fn move_paddle(y: f32, up: bool, down: bool, max_y: f32) -> f32 {
    let mut y = y;
    if up && y > 0.0 {
        y = (y - PADDLE_STEP).max(0.0);
    }
    if down && y < max_y {
        y = (y + PADDLE_STEP).min(max_y);
    }
    y
}

/// Scripted opponent: follows the ball only while it heads right
fn track_ball(state: &mut MatchState) {
    if state.ball.vel.x <= 0.0 {
        return;
    }
    let max_y = state.surface.paddle_max_y();
    let paddle_center = state.paddle_right_y + PADDLE_HEIGHT / 2.0;
    let ball_y = state.ball.pos.y;

    if ball_y > paddle_center + OPPONENT_DEAD_ZONE && state.paddle_right_y < max_y {
        state.paddle_right_y = (state.paddle_right_y + OPPONENT_STEP).min(max_y);
    } else if ball_y < paddle_center - OPPONENT_DEAD_ZONE && state.paddle_right_y > 0.0 {
        state.paddle_right_y = (state.paddle_right_y - OPPONENT_STEP).max(0.0);
    }
}

/// Score a point, then either end the match or re-serve and wait
fn award_point(state: &mut MatchState, scorer: Side, audio: &mut impl AudioSink) {
    match scorer {
        Side::Left => state.score_left += 1,
        Side::Right => state.score_right += 1,
    }
    audio.play_once(crate::audio::Cue::Score);
    log::debug!(
        "{} scores ({} - {})",
        scorer.label(),
        state.score_left,
        state.score_right
    );

    if state.score(scorer) >= WIN_SCORE {
        mode::finish(state, scorer, audio);
    } else {
        mode::await_continue(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioEvent, Cue, RecordingAudio, SilentAudio};
    use crate::sim::state::Surface;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(control: ControlMode) -> MatchState {
        let mut state = MatchState::new(Surface::default(), 7);
        state.control_mode = Some(control);
        state.mode = Mode::Playing;
        state
    }

    /// Compare every observable field (the RNG is covered by serve tests)
    fn snapshot(state: &MatchState) -> impl PartialEq + std::fmt::Debug + use<> {
        (
            state.mode,
            state.control_mode,
            state.score_left,
            state.score_right,
            state.winner,
            state.paddle_left_y,
            state.paddle_right_y,
            state.ball,
            state.input,
        )
    }

    #[test]
    fn test_step_single_player_from_center() {
        let mut state = playing(ControlMode::SinglePlayer);
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);

        assert_eq!(state.ball.pos, Vec2::new(506.0, 405.0));
        // Paddle center sits at 400, ball at 400: inside the dead zone
        assert!((state.paddle_right_y - before).abs() <= OPPONENT_STEP);
    }

    #[test]
    fn test_opponent_moves_toward_ball() {
        let mut state = playing(ControlMode::SinglePlayer);
        state.ball.pos = Vec2::new(500.0, 700.0);
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_right_y, before + OPPONENT_STEP);

        state.ball.pos = Vec2::new(500.0, 50.0);
        state.ball.vel = Vec2::new(6.0, -5.0);
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_right_y, before - OPPONENT_STEP);
    }

    #[test]
    fn test_opponent_idles_while_ball_heads_left() {
        let mut state = playing(ControlMode::SinglePlayer);
        state.ball.pos = Vec2::new(500.0, 700.0);
        state.ball.vel = Vec2::new(-6.0, 5.0);
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_right_y, before);
    }

    #[test]
    fn test_opponent_ignores_right_inputs() {
        let mut state = playing(ControlMode::SinglePlayer);
        state.input.right_up = true;
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_right_y, before);
    }

    #[test]
    fn test_two_player_right_paddle_follows_inputs() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.input.right_down = true;
        let before = state.paddle_right_y;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_right_y, before + PADDLE_STEP);
    }

    #[test]
    fn test_left_paddle_clamped_at_top() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.paddle_left_y = 0.0;
        state.input.left_up = true;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_left_y, 0.0);

        state.paddle_left_y = 3.0;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_left_y, 0.0);
    }

    #[test]
    fn test_left_paddle_clamped_at_bottom() {
        let mut state = playing(ControlMode::TwoPlayer);
        let max_y = state.surface.paddle_max_y();
        state.paddle_left_y = max_y - 2.0;
        state.input.left_down = true;
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.paddle_left_y, max_y);
    }

    #[test]
    fn test_wall_bounce_inverts_vertical_velocity() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.ball.pos = Vec2::new(500.0, 8.0);
        state.ball.vel = Vec2::new(6.0, -5.0);
        step(&mut state, &mut SilentAudio);
        // No clamp: ball overlaps the wall for this frame
        assert_eq!(state.ball.pos, Vec2::new(506.0, 3.0));
        assert_eq!(state.ball.vel, Vec2::new(6.0, 5.0));
    }

    #[test]
    fn test_left_paddle_returns_ball() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.paddle_left_y = 300.0;
        state.ball.pos = Vec2::new(PADDLE_WIDTH + BALL_RADIUS - 1.0, 301.0);
        state.ball.vel = Vec2::new(-6.0, 5.0);
        let mut audio = RecordingAudio::default();
        step(&mut state, &mut audio);

        assert_eq!(state.ball.vel.x, 6.0);
        assert_eq!((state.score_left, state.score_right), (0, 0));
        assert_eq!(state.mode, Mode::Playing);
        assert!(audio.events.is_empty());

        // Leaving the band on the next tick does not flip it back
        step(&mut state, &mut audio);
        assert_eq!(state.ball.vel.x, 6.0);
    }

    #[test]
    fn test_right_paddle_returns_ball() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.paddle_right_y = 300.0;
        state.ball.pos = Vec2::new(980.0, 340.0);
        state.ball.vel = Vec2::new(6.0, 5.0);
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.ball.vel.x, -6.0);
        assert_eq!(state.score_left, 0);
    }

    #[test]
    fn test_left_miss_scores_for_right_and_waits() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.paddle_left_y = 0.0;
        state.ball.pos = Vec2::new(15.0, 600.0);
        state.ball.vel = Vec2::new(-6.0, 5.0);
        let mut audio = RecordingAudio::default();
        step(&mut state, &mut audio);

        assert_eq!(state.score_right, 1);
        assert_eq!(state.score_left, 0);
        assert_eq!(state.mode, Mode::WaitingToContinue);
        assert_eq!(state.ball.pos, state.surface.center());
        assert_eq!(state.ball.vel.abs(), Vec2::new(6.0, 5.0));
        assert_eq!(audio.events, vec![AudioEvent::Play(Cue::Score)]);
    }

    #[test]
    fn test_right_miss_scores_for_left() {
        let mut state = playing(ControlMode::TwoPlayer);
        state.paddle_right_y = 0.0;
        state.ball.pos = Vec2::new(985.0, 600.0);
        state.ball.vel = Vec2::new(6.0, 5.0);
        step(&mut state, &mut SilentAudio);
        assert_eq!(state.score_left, 1);
        assert_eq!(state.mode, Mode::WaitingToContinue);
    }

    #[test]
    fn test_ninth_point_finishes_match() {
        let mut state = playing(ControlMode::SinglePlayer);
        state.score_right = 8;
        state.paddle_left_y = 0.0;
        state.ball.pos = Vec2::new(15.0, 600.0);
        state.ball.vel = Vec2::new(-6.0, 5.0);
        let mut audio = RecordingAudio::default();
        step(&mut state, &mut audio);

        assert_eq!(state.score_right, 9);
        assert_eq!(state.mode, Mode::Finished);
        assert_eq!(state.winner, Some(Side::Right));
        assert_eq!(
            audio.events,
            vec![
                AudioEvent::Play(Cue::Score),
                AudioEvent::StopLoop,
                AudioEvent::Play(Cue::Win)
            ]
        );

        // Frozen until reset
        let frozen = snapshot(&state);
        for _ in 0..10 {
            step(&mut state, &mut audio);
        }
        assert_eq!(snapshot(&state), frozen);
        assert_eq!(audio.events.len(), 3);
    }

    #[test]
    fn test_full_rally_reaches_finish() {
        // Left paddle always dodges, so every rally ends in a point
        let mut state = playing(ControlMode::SinglePlayer);
        let mut ticks = 0;
        while state.mode != Mode::Finished && ticks < 100_000 {
            state.paddle_left_y = if state.ball.pos.y < 400.0 { 700.0 } else { 0.0 };
            step(&mut state, &mut SilentAudio);
            if state.mode == Mode::WaitingToContinue {
                mode::press(&mut state, crate::input::Control::Begin, &mut SilentAudio);
            }
            ticks += 1;
        }
        assert_eq!(state.mode, Mode::Finished);
        assert_eq!(state.score(Side::Right).max(state.score(Side::Left)), WIN_SCORE);
    }

    proptest! {
        #[test]
        fn prop_step_is_noop_outside_playing(
            mode_idx in 0usize..4,
            seed in any::<u64>(),
            left_up in any::<bool>(),
            right_down in any::<bool>(),
        ) {
            let modes = [Mode::Intro, Mode::Paused, Mode::WaitingToContinue, Mode::Finished];
            let mut state = MatchState::new(Surface::default(), seed);
            state.control_mode = Some(ControlMode::TwoPlayer);
            state.mode = modes[mode_idx];
            state.input.left_up = left_up;
            state.input.right_down = right_down;
            let before = snapshot(&state);
            let mut audio = RecordingAudio::default();
            step(&mut state, &mut audio);
            prop_assert_eq!(snapshot(&state), before);
            prop_assert!(audio.events.is_empty());
        }

        #[test]
        fn prop_paddles_stay_in_bounds(
            seed in any::<u64>(),
            two_player in any::<bool>(),
            inputs in proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 1..400),
        ) {
            let control = if two_player { ControlMode::TwoPlayer } else { ControlMode::SinglePlayer };
            let mut state = MatchState::new(Surface::new(500.0, 400.0), seed);
            state.control_mode = Some(control);
            state.mode = Mode::Playing;
            let max_y = state.surface.paddle_max_y();

            for (lu, ld, ru, rd) in inputs {
                state.input.left_up = lu;
                state.input.left_down = ld;
                state.input.right_up = ru;
                state.input.right_down = rd;
                step(&mut state, &mut SilentAudio);
                if state.mode == Mode::WaitingToContinue {
                    state.mode = Mode::Playing;
                }
                prop_assert!((0.0..=max_y).contains(&state.paddle_left_y));
                prop_assert!((0.0..=max_y).contains(&state.paddle_right_y));
                prop_assert!(state.score_left <= WIN_SCORE);
                prop_assert!(state.score_right <= WIN_SCORE);
            }
        }
    }
}
