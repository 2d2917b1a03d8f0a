//! Balloon Pop - a casual balloon-popping canvas game
//!
//! Core modules:
//! - `sim`: Simulation (balloon field, explosion bursts, hit-testing, scoring)
//! - `render`: Canvas 2D presentation layer
//! - `audio`: Procedural pop sounds via Web Audio
//! - `settings`: Player preferences persisted in LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed balloon population - balloons are recycled, never destroyed
    pub const NUM_BALLOONS: usize = 20;

    /// Particles spawned per popped balloon
    pub const PARTICLES_PER_BURST: usize = 30;
    /// Upper bound of the base particle speed distribution
    pub const PARTICLE_SPEED: f32 = 2.5;

    /// Balloon diameter range (the hit radius is half of this)
    pub const DIAMETER_MIN: f32 = 50.0;
    pub const DIAMETER_MAX: f32 = 200.0;

    /// Balloon fill alpha range (0-255 scale)
    pub const ALPHA_MIN: f32 = 80.0;
    pub const ALPHA_MAX: f32 = 255.0;

    /// Balloon rise speed range (pixels per frame)
    pub const SPEED_MIN: f32 = 1.0;
    pub const SPEED_MAX: f32 = 5.0;

    /// Canvas background color
    pub const BACKGROUND_COLOR: &str = "#fcf6bd";
    /// HUD text color
    pub const HUD_COLOR: &str = "#669bbc";
}
