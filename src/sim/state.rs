//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// The five balloon colors. Hit scoring compares against [`BONUS_COLOR`],
/// so the palette can change without touching the scoring logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    Coral,
    Gold,
    Lime,
    Azure,
    Violet,
}

/// The one color worth +1 on a hit; every other color costs -1.
pub const BONUS_COLOR: PaletteColor = PaletteColor::Gold;

impl PaletteColor {
    pub const ALL: [PaletteColor; 5] = [
        PaletteColor::Coral,
        PaletteColor::Gold,
        PaletteColor::Lime,
        PaletteColor::Azure,
        PaletteColor::Violet,
    ];

    /// RGB triple for fills and particle tinting
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PaletteColor::Coral => (255, 89, 94),
            PaletteColor::Gold => (255, 202, 58),
            PaletteColor::Lime => (138, 201, 38),
            PaletteColor::Azure => (25, 130, 196),
            PaletteColor::Violet => (106, 76, 147),
        }
    }

    /// Pick a palette color uniformly at random
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A rising, clickable balloon. Exactly [`NUM_BALLOONS`] exist at all
/// times; a balloon is reset in place when it leaves the screen or is
/// popped, never removed.
#[derive(Debug, Clone, Copy)]
pub struct Balloon {
    pub pos: Vec2,
    /// Full diameter; the hit radius and edge tests use half of this
    pub diameter: f32,
    pub color: PaletteColor,
    /// Fill alpha on a 0-255 scale, constant for one life
    pub alpha: f32,
    /// Vertical rise per frame
    pub speed: f32,
}

impl Balloon {
    /// Fresh balloon with randomized attributes at a random point on the
    /// canvas. Used only for the initial population.
    pub fn scatter(rng: &mut impl Rng, bounds: Vec2) -> Self {
        let mut balloon = Self::with_random_attributes(rng);
        balloon.pos = Vec2::new(
            rng.random_range(0.0..bounds.x),
            rng.random_range(0.0..bounds.y),
        );
        balloon
    }

    /// Recycle this balloon: re-randomize every attribute and move it
    /// just below the bottom edge at a random x. Shared by the
    /// scrolled-off-screen path and the popped-by-click path.
    pub fn respawn_below(&mut self, rng: &mut impl Rng, bounds: Vec2) {
        *self = Self::with_random_attributes(rng);
        self.pos = Vec2::new(
            rng.random_range(0.0..bounds.x),
            bounds.y + self.diameter / 2.0,
        );
    }

    fn with_random_attributes(rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::ZERO,
            diameter: rng.random_range(DIAMETER_MIN..DIAMETER_MAX),
            color: PaletteColor::sample(rng),
            alpha: rng.random_range(ALPHA_MIN..ALPHA_MAX),
            speed: rng.random_range(SPEED_MIN..SPEED_MAX),
        }
    }
}

/// One particle of an explosion burst
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Downward acceleration per frame, fixed per particle
    pub gravity: f32,
    /// RGB jittered from the source balloon; may leave 0-255 until
    /// clamped at render time
    pub color: [f32; 3],
    /// 0-255 scale, decremented by `fade` each frame
    pub alpha: f32,
    pub fade: f32,
    /// Diameter, multiplied by `shrink` each frame
    pub size: f32,
    pub shrink: f32,
}

impl Particle {
    /// A particle stops contributing once invisible or sub-pixel
    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0 || self.size <= 0.5
    }
}

/// A transient burst of [`PARTICLES_PER_BURST`] particles spawned when a
/// balloon is popped. Pruned as a unit: particles are never removed
/// individually, the whole burst goes once every particle is dead.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Spawn a burst at the balloon's position, tinted with its color.
    /// Gravity and shrink are per-particle so each burst disperses
    /// unevenly.
    pub fn burst(balloon: &Balloon, rng: &mut impl Rng) -> Self {
        let (r, g, b) = balloon.color.rgb();
        let base = [r as f32, g as f32, b as f32];
        let spread = balloon.diameter / 6.0;
        let max_size = (balloon.diameter / 12.0).max(6.0);

        let particles = (0..PARTICLES_PER_BURST)
            .map(|_| {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                // Two-stage randomization biases speeds toward the low end
                let speed =
                    rng.random_range(0.5..PARTICLE_SPEED) * (0.4 + rng.random_range(0.0..1.0));
                Particle {
                    pos: balloon.pos
                        + Vec2::new(
                            rng.random_range(-spread..spread),
                            rng.random_range(-spread..spread),
                        ),
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    gravity: 0.03 * rng.random_range(0.5..1.5),
                    color: base.map(|c| c + rng.random_range(-20.0..20.0)),
                    alpha: rng.random_range(180.0..255.0),
                    fade: rng.random_range(2.0..6.0),
                    size: rng.random_range(4.0..max_size),
                    shrink: rng.random_range(0.985..0.995),
                }
            })
            .collect();

        Self { particles }
    }

    /// True once every particle is dead; the burst is removed on the
    /// update that observes this
    pub fn is_spent(&self) -> bool {
        self.particles.iter().all(Particle::is_dead)
    }
}

/// Complete game state, mutated only by the frame callback and the
/// click handler (both run to completion on the single browser thread)
#[derive(Debug)]
pub struct GameState {
    /// Canvas size in CSS pixels; respawn positions track this
    pub bounds: Vec2,
    pub balloons: Vec<Balloon>,
    pub explosions: Vec<Explosion>,
    pub score: i64,
    /// Single shared generator for every randomized attribute
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game with the full balloon population scattered
    /// across the canvas
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let balloons = (0..NUM_BALLOONS)
            .map(|_| Balloon::scatter(&mut rng, bounds))
            .collect();
        Self {
            bounds,
            balloons,
            explosions: Vec::new(),
            score: 0,
            rng,
        }
    }

    /// Find the topmost balloon under a point: balloons are checked in
    /// reverse index order and the first within its hit radius wins, so
    /// overlaps resolve to the later-created balloon.
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.balloons
            .iter()
            .enumerate()
            .rev()
            .find(|(_, balloon)| point.distance(balloon.pos) <= balloon.diameter / 2.0)
            .map(|(index, _)| index)
    }

    /// Adopt a new canvas size and rescatter balloon positions within
    /// it. Attributes are kept; this is purely cosmetic.
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        let Self { balloons, rng, .. } = self;
        for balloon in balloons.iter_mut() {
            balloon.pos = Vec2::new(
                rng.random_range(0.0..bounds.x),
                rng.random_range(0.0..bounds.y),
            );
        }
    }
}
