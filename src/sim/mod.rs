//! Simulation module
//!
//! All gameplay logic lives here. This module has no rendering or
//! platform dependencies:
//! - One update per animation frame (the game is frame-based, not dt-scaled)
//! - Single shared RNG owned by the game state
//! - Totality: every operation is defined for every input; a missed
//!   click is a normal outcome, not an error

pub mod state;
pub mod tick;

pub use state::{BONUS_COLOR, Balloon, Explosion, GameState, PaletteColor, Particle};
pub use tick::{PopEvent, handle_click, tick};
