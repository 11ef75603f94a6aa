//! Rendering
//!
//! [`scene`] turns a `MatchState` into a flat list of draw commands; a
//! backend replays them. The scene is rebuilt every frame and never
//! touches the state it reads.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::consts::{PADDLE_HEIGHT, PADDLE_WIDTH, WIN_SCORE};
use crate::input::controls_hint;
use crate::sim::{MatchState, Mode};

/// Dash pattern of the center net (on, off)
pub const NET_DASH: [f32; 2] = [5.0, 15.0];
/// Baseline of the score digits
pub const SCORE_BASELINE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// Score digits
    Large,
    /// Overlay messages
    Small,
}

impl TextSize {
    pub fn font(&self) -> &'static str {
        match self {
            TextSize::Large => "30px Courier New",
            TextSize::Small => "20px Courier New",
        }
    }
}

/// A single draw operation, in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear { size: Vec2 },
    DashedLine { from: Vec2, to: Vec2 },
    Rect { pos: Vec2, size: Vec2 },
    Ball { center: Vec2, radius: f32 },
    /// `pos.x` is the left edge unless `centered`
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        centered: bool,
    },
}

/// Build the frame for the current state
pub fn scene(state: &MatchState) -> Vec<DrawCmd> {
    let w = state.surface.width;
    let h = state.surface.height;
    let mut cmds = Vec::with_capacity(12);

    cmds.push(DrawCmd::Clear {
        size: Vec2::new(w, h),
    });
    cmds.push(DrawCmd::DashedLine {
        from: Vec2::new(w / 2.0, 0.0),
        to: Vec2::new(w / 2.0, h),
    });

    let paddle = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(0.0, state.paddle_left_y),
        size: paddle,
    });
    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(w - PADDLE_WIDTH, state.paddle_right_y),
        size: paddle,
    });

    if ball_visible(state.mode) {
        cmds.push(DrawCmd::Ball {
            center: state.ball.pos,
            radius: state.ball.radius,
        });
    }

    cmds.push(DrawCmd::Text {
        text: state.score_left.to_string(),
        pos: Vec2::new(w / 4.0, SCORE_BASELINE),
        size: TextSize::Large,
        centered: false,
    });
    cmds.push(DrawCmd::Text {
        text: state.score_right.to_string(),
        pos: Vec2::new(w * 3.0 / 4.0, SCORE_BASELINE),
        size: TextSize::Large,
        centered: false,
    });

    for (text, y_offset) in overlay(state) {
        cmds.push(DrawCmd::Text {
            text,
            pos: Vec2::new(w / 2.0, h / 2.0 + y_offset),
            size: TextSize::Small,
            centered: true,
        });
    }

    cmds
}

/// Page panels and whether each should be shown: the start menu while no
/// match is chosen, the canvas during a match, the winner panel once finished
pub fn panel_visibility(state: &MatchState) -> [(&'static str, bool); 3] {
    let in_menu = state.control_mode.is_none();
    [
        ("menu", in_menu),
        ("gameCanvas", !in_menu),
        ("winner", state.mode == Mode::Finished),
    ]
}

/// The ball is hidden while play is held
fn ball_visible(mode: Mode) -> bool {
    matches!(mode, Mode::Playing | Mode::Paused)
}

/// Mode-dependent message lines with their vertical offsets from center
fn overlay(state: &MatchState) -> Vec<(String, f32)> {
    match state.mode {
        Mode::Intro => match state.control_mode {
            Some(control_mode) => vec![
                (controls_hint(control_mode), -30.0),
                (format!("First to {} wins!", WIN_SCORE), 0.0),
                ("Press SPACE to start".to_string(), 40.0),
            ],
            None => Vec::new(),
        },
        Mode::WaitingToContinue => vec![("Press SPACE to continue".to_string(), 0.0)],
        Mode::Paused => vec![
            ("Game Paused".to_string(), -10.0),
            ("Press R to Resume".to_string(), 20.0),
        ],
        Mode::Finished => match state.winner {
            Some(side) => vec![(format!("{} Wins!", side.label()), 0.0)],
            None => Vec::new(),
        },
        Mode::Playing => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ControlMode, Side, Surface};

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn has_ball(cmds: &[DrawCmd]) -> bool {
        cmds.iter().any(|c| matches!(c, DrawCmd::Ball { .. }))
    }

    fn state(mode: Mode) -> MatchState {
        let mut state = MatchState::new(Surface::new(500.0, 400.0), 0);
        state.control_mode = Some(ControlMode::SinglePlayer);
        state.mode = mode;
        state
    }

    #[test]
    fn test_playing_scene() {
        let mut s = state(Mode::Playing);
        s.score_left = 3;
        s.score_right = 7;
        let cmds = scene(&s);

        assert!(has_ball(&cmds));
        assert_eq!(texts(&cmds), vec!["3", "7"]);
        assert!(cmds.contains(&DrawCmd::Rect {
            pos: Vec2::new(490.0, s.paddle_right_y),
            size: Vec2::new(10.0, 100.0),
        }));
        assert!(cmds.contains(&DrawCmd::DashedLine {
            from: Vec2::new(250.0, 0.0),
            to: Vec2::new(250.0, 400.0),
        }));
    }

    #[test]
    fn test_intro_shows_controls_and_hides_ball() {
        let cmds = scene(&state(Mode::Intro));
        assert!(!has_ball(&cmds));
        let lines = texts(&cmds);
        assert!(lines.contains(&"First to 9 wins!"));
        assert!(lines.contains(&"Press SPACE to start"));
    }

    #[test]
    fn test_pre_start_has_no_overlay() {
        let s = MatchState::new(Surface::new(500.0, 400.0), 0);
        assert_eq!(texts(&scene(&s)), vec!["0", "0"]);
    }

    #[test]
    fn test_panel_visibility_follows_match() {
        let s = MatchState::new(Surface::new(500.0, 400.0), 0);
        assert_eq!(
            panel_visibility(&s),
            [("menu", true), ("gameCanvas", false), ("winner", false)]
        );
        assert_eq!(
            panel_visibility(&state(Mode::Playing)),
            [("menu", false), ("gameCanvas", true), ("winner", false)]
        );
        assert_eq!(
            panel_visibility(&state(Mode::Finished)),
            [("menu", false), ("gameCanvas", true), ("winner", true)]
        );
    }

    #[test]
    fn test_paused_keeps_ball_visible() {
        let cmds = scene(&state(Mode::Paused));
        assert!(has_ball(&cmds));
        assert!(texts(&cmds).contains(&"Press R to Resume"));
    }

    #[test]
    fn test_waiting_and_finished_overlays() {
        let cmds = scene(&state(Mode::WaitingToContinue));
        assert!(!has_ball(&cmds));
        assert!(texts(&cmds).contains(&"Press SPACE to continue"));

        let mut s = state(Mode::Finished);
        s.winner = Some(Side::Right);
        let cmds = scene(&s);
        assert!(!has_ball(&cmds));
        assert!(texts(&cmds).contains(&"Player 2 Wins!"));
    }
}
