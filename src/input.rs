//! Keyboard bindings and logical input events
//!
//! The host translates raw key events into [`InputEvent`]s; the mode
//! controller never sees key codes.

use crate::sim::ControlMode;

/// Logical controls with press/release semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
    /// Begin from the intro, or continue after a point
    Begin,
    Pause,
    Resume,
}

/// Discrete menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartMatch(ControlMode),
    PlayAgain,
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Control),
    Release(Control),
    Action(Action),
}

impl Control {
    /// Map a DOM `KeyboardEvent` (`key`, `code`) to a control
    ///
    /// Letter keys are case-insensitive so Caps Lock doesn't break play.
    pub fn from_key(key: &str, code: &str) -> Option<Self> {
        if code == "Space" {
            return Some(Control::Begin);
        }
        match key {
            "ArrowUp" => return Some(Control::RightUp),
            "ArrowDown" => return Some(Control::RightDown),
            _ => {}
        }
        match key.to_lowercase().as_str() {
            "s" => Some(Control::LeftUp),
            "x" => Some(Control::LeftDown),
            "p" => Some(Control::Pause),
            "r" => Some(Control::Resume),
            _ => None,
        }
    }

    /// Paddle controls are level-triggered (held); the rest fire on press
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            Control::LeftUp | Control::LeftDown | Control::RightUp | Control::RightDown
        )
    }
}

impl Action {
    /// Map a menu button element id to an action
    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "single-player-btn" => Some(Action::StartMatch(ControlMode::SinglePlayer)),
            "two-player-btn" => Some(Action::StartMatch(ControlMode::TwoPlayer)),
            "play-again-btn" => Some(Action::PlayAgain),
            "main-menu-btn" => Some(Action::MainMenu),
            _ => None,
        }
    }
}

/// `M` toggles mute; handled by the host, never by the mode controller
pub fn is_mute_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("m")
}

/// One-line controls hint shown on the intro screen
pub fn controls_hint(control_mode: ControlMode) -> String {
    let mut hint = String::from("Controls: S = Up | X = Down");
    if control_mode == ControlMode::TwoPlayer {
        hint.push_str(" | Up/Down arrows = Player 2");
    }
    hint
}
