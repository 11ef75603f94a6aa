//! Match simulation
//!
//! All gameplay logic lives here and is deterministic for a given seed:
//! - One tick per display frame, fixed per-tick velocities
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod mode;
pub mod state;
pub mod tick;

pub use collision::{BandResult, ball_hits_wall, check_band};
pub use mode::{Transition, handle};
pub use state::{Ball, ControlMode, InputFlags, MatchState, Mode, Side, Surface};
pub use tick::step;
