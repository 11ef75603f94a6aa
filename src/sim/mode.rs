//! Mode controller
//!
//! The only place `MatchState::mode` changes. Input handlers call
//! [`handle`]; the simulation step calls [`finish`] and
//! [`await_continue`] when a point is scored.

use super::state::{ControlMode, InputFlags, MatchState, Mode, Side};
use crate::audio::{AudioSink, Cue};
use crate::input::{Action, Control, InputEvent};

/// An accepted mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

fn transition(state: &mut MatchState, to: Mode) -> Transition {
    let from = state.mode;
    state.mode = to;
    log::debug!("mode {:?} -> {:?}", from, to);
    Transition { from, to }
}

/// Route one input event. Returns the mode change it caused, if any.
pub fn handle(
    state: &mut MatchState,
    event: InputEvent,
    audio: &mut impl AudioSink,
) -> Option<Transition> {
    match event {
        InputEvent::Press(control) => press(state, control, audio),
        InputEvent::Release(control) => {
            release(state, control);
            None
        }
        InputEvent::Action(action) => apply_action(state, action, audio),
    }
}

/// Key pressed. Paddle flags are set whatever the mode.
///
/// Pause only leaves PLAYING and resume only leaves PAUSED; repeating
/// either, or sending them in any other mode, is a harmless no-op.
pub fn press(
    state: &mut MatchState,
    control: Control,
    audio: &mut impl AudioSink,
) -> Option<Transition> {
    match control {
        Control::LeftUp | Control::LeftDown | Control::RightUp | Control::RightDown => {
            set_flag(&mut state.input, control, true);
            None
        }
        Control::Begin => match state.mode {
            Mode::Intro if state.control_mode.is_some() => {
                audio.start_loop();
                Some(transition(state, Mode::Playing))
            }
            Mode::WaitingToContinue => Some(transition(state, Mode::Playing)),
            _ => None,
        },
        // Pause/resume are idempotent and ignored outside a live rally
        Control::Pause => match state.mode {
            Mode::Playing => Some(transition(state, Mode::Paused)),
            _ => None,
        },
        Control::Resume => match state.mode {
            Mode::Paused => Some(transition(state, Mode::Playing)),
            _ => None,
        },
    }
}

/// Key released. Only paddle controls are level-triggered.
pub fn release(state: &mut MatchState, control: Control) {
    if control.is_held() {
        set_flag(&mut state.input, control, false);
    }
}

fn set_flag(flags: &mut InputFlags, control: Control, held: bool) {
    match control {
        Control::LeftUp => flags.left_up = held,
        Control::LeftDown => flags.left_down = held,
        Control::RightUp => flags.right_up = held,
        Control::RightDown => flags.right_down = held,
        _ => {}
    }
}

pub fn apply_action(
    state: &mut MatchState,
    action: Action,
    audio: &mut impl AudioSink,
) -> Option<Transition> {
    match action {
        Action::StartMatch(control_mode) => Some(start_match(state, control_mode)),
        Action::PlayAgain => play_again(state, audio),
        Action::MainMenu => Some(main_menu(state, audio)),
    }
}

/// Start a match from the menu: intro screen with the chosen controls
pub fn start_match(state: &mut MatchState, control_mode: ControlMode) -> Transition {
    state.control_mode = Some(control_mode);
    state.reset_scores();
    state.center_paddles();
    state.serve_fixed();
    log::info!("Match started ({:?})", control_mode);
    transition(state, Mode::Intro)
}

/// Rematch with the same controls, straight into play
///
/// Ignored when no match has been started yet.
pub fn play_again(state: &mut MatchState, audio: &mut impl AudioSink) -> Option<Transition> {
    if state.control_mode.is_none() {
        return None;
    }
    state.reset_scores();
    state.center_paddles();
    state.serve_random();
    audio.start_loop();
    log::info!("Rematch");
    Some(transition(state, Mode::Playing))
}

/// Back to the menu: scores, paddles, flags and control choice cleared
pub fn main_menu(state: &mut MatchState, audio: &mut impl AudioSink) -> Transition {
    state.reset_scores();
    state.center_paddles();
    state.serve_fixed();
    state.input = InputFlags::default();
    state.control_mode = None;
    audio.stop_loop();
    transition(state, Mode::Intro)
}

/// A side reached the winning score
pub fn finish(state: &mut MatchState, winner: Side, audio: &mut impl AudioSink) -> Transition {
    state.winner = Some(winner);
    audio.stop_loop();
    audio.play_once(Cue::Win);
    log::info!(
        "{} wins {} - {}",
        winner.label(),
        state.score_left,
        state.score_right
    );
    transition(state, Mode::Finished)
}

/// A point was scored short of the win: re-serve and hold the ball
pub fn await_continue(state: &mut MatchState) -> Transition {
    state.serve_random();
    transition(state, Mode::WaitingToContinue)
}
