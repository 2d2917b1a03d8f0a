//! Per-frame simulation update and the pointer-click entry point
//!
//! Both run to completion on the single browser thread; the host never
//! interleaves the frame callback with the click handler.

use glam::Vec2;
use rand::Rng;

use super::state::{BONUS_COLOR, Explosion, GameState, PaletteColor};

/// Outcome of a click that popped a balloon. Carries the randomized
/// sound parameters so playback draws from the one shared generator.
#[derive(Debug, Clone, Copy)]
pub struct PopEvent {
    pub color: PaletteColor,
    pub bonus: bool,
    /// Playback rate for the pop sound, around 1.0
    pub sound_rate: f32,
    /// Per-pop volume before the settings mix
    pub sound_volume: f32,
}

/// Advance the simulation by one animation frame:
/// balloons rise and recycle, particles fly and fade, spent bursts are
/// dropped.
pub fn tick(state: &mut GameState) {
    let GameState {
        bounds,
        balloons,
        explosions,
        rng,
        ..
    } = state;

    for balloon in balloons.iter_mut() {
        balloon.pos.y -= balloon.speed;
        // Recycle only once fully above the top edge (strict: a balloon
        // whose bottom sits exactly on y=0 survives one more frame)
        if balloon.pos.y + balloon.diameter / 2.0 < 0.0 {
            balloon.respawn_below(rng, *bounds);
        }
    }

    for explosion in explosions.iter_mut() {
        for particle in explosion.particles.iter_mut() {
            particle.vel.y += particle.gravity;
            particle.pos += particle.vel;
            particle.alpha -= particle.fade;
            particle.size *= particle.shrink;
        }
    }
    // Bursts go as a unit once every particle is dead
    explosions.retain(|explosion| !explosion.is_spent());
}

/// Resolve a pointer click at `point` (canvas coordinates).
///
/// At most one balloon is affected per click: the topmost hit is
/// scored (+1 for the bonus color, -1 otherwise), bursts into
/// particles, and respawns below the bottom edge. A miss changes
/// nothing and returns `None`.
pub fn handle_click(state: &mut GameState, point: Vec2) -> Option<PopEvent> {
    let index = state.hit_test(point)?;
    let balloon = state.balloons[index];

    let bonus = balloon.color == BONUS_COLOR;
    state.score += if bonus { 1 } else { -1 };

    let GameState {
        bounds,
        balloons,
        explosions,
        rng,
        ..
    } = state;
    explosions.push(Explosion::burst(&balloon, rng));
    balloons[index].respawn_below(rng, *bounds);

    Some(PopEvent {
        color: balloon.color,
        bonus,
        sound_rate: rng.random_range(0.95..1.05),
        sound_volume: rng.random_range(0.6..1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{NUM_BALLOONS, PARTICLES_PER_BURST};
    use crate::sim::state::Particle;
    use proptest::prelude::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn live_particle() -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            gravity: 0.03,
            color: [255.0, 202.0, 58.0],
            alpha: 200.0,
            fade: 3.0,
            size: 5.0,
            shrink: 0.99,
        }
    }

    #[test]
    fn test_balloon_count_never_changes() {
        let mut state = GameState::new(1, BOUNDS);
        for frame in 0..500 {
            tick(&mut state);
            assert_eq!(state.balloons.len(), NUM_BALLOONS, "frame {frame}");
        }
    }

    #[test]
    fn test_balloons_rise_each_frame() {
        let mut state = GameState::new(2, BOUNDS);
        let before: Vec<f32> = state.balloons.iter().map(|b| b.pos.y).collect();
        let speeds: Vec<f32> = state.balloons.iter().map(|b| b.speed).collect();
        tick(&mut state);
        for ((balloon, y), speed) in state.balloons.iter().zip(before).zip(speeds) {
            // Either it rose by its speed or it was recycled below the bottom
            assert!(
                (balloon.pos.y - (y - speed)).abs() < 1e-4 || balloon.pos.y >= BOUNDS.y,
                "balloon neither rose nor recycled"
            );
        }
    }

    #[test]
    fn test_offscreen_boundary_is_strict() {
        let mut state = GameState::new(3, BOUNDS);
        state.balloons[0].diameter = 100.0;
        state.balloons[0].speed = 0.0;
        state.balloons[0].pos = Vec2::new(100.0, -50.0);
        tick(&mut state);
        // Bottom edge exactly at y=0: not recycled yet
        assert_eq!(state.balloons[0].pos.y, -50.0);

        state.balloons[0].speed = 1.0;
        tick(&mut state);
        // One more frame pushes it strictly above: recycled below bottom
        assert!(state.balloons[0].pos.y >= BOUNDS.y);
    }

    #[test]
    fn test_offscreen_recycle_randomizes_attributes() {
        let mut state = GameState::new(4, BOUNDS);
        state.balloons[0].diameter = 80.0;
        state.balloons[0].speed = 2.0;
        state.balloons[0].pos = Vec2::new(50.0, -41.0);
        tick(&mut state);
        let balloon = &state.balloons[0];
        assert!(balloon.pos.y >= BOUNDS.y);
        assert!((50.0..200.0).contains(&balloon.diameter));
        assert!((80.0..255.0).contains(&balloon.alpha));
        assert!((1.0..5.0).contains(&balloon.speed));
        // No score change on the missed path
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_click_bonus_scores_plus_one() {
        let mut state = GameState::new(5, BOUNDS);
        for balloon in state.balloons.iter_mut() {
            balloon.pos = Vec2::new(-10_000.0, -10_000.0);
        }
        state.balloons[7].pos = Vec2::new(400.0, 300.0);
        state.balloons[7].diameter = 100.0;
        state.balloons[7].color = BONUS_COLOR;

        let event = handle_click(&mut state, Vec2::new(400.0, 300.0)).expect("hit");
        assert!(event.bonus);
        assert_eq!(event.color, BONUS_COLOR);
        assert_eq!(state.score, 1);
        assert!((0.95..1.05).contains(&event.sound_rate));
        assert!((0.6..1.0).contains(&event.sound_volume));
    }

    #[test]
    fn test_click_other_color_scores_minus_one() {
        let mut state = GameState::new(6, BOUNDS);
        for balloon in state.balloons.iter_mut() {
            balloon.pos = Vec2::new(-10_000.0, -10_000.0);
        }
        state.balloons[0].pos = Vec2::new(200.0, 200.0);
        state.balloons[0].diameter = 100.0;
        state.balloons[0].color = PaletteColor::Violet;

        let event = handle_click(&mut state, Vec2::new(200.0, 200.0)).expect("hit");
        assert!(!event.bonus);
        assert_eq!(state.score, -1);
    }

    #[test]
    fn test_click_empty_space_changes_nothing() {
        let mut state = GameState::new(7, BOUNDS);
        for balloon in state.balloons.iter_mut() {
            balloon.pos = Vec2::new(-10_000.0, -10_000.0);
        }
        let positions: Vec<Vec2> = state.balloons.iter().map(|b| b.pos).collect();

        assert!(handle_click(&mut state, Vec2::new(400.0, 300.0)).is_none());
        assert_eq!(state.score, 0);
        assert!(state.explosions.is_empty());
        for (balloon, pos) in state.balloons.iter().zip(positions) {
            assert_eq!(balloon.pos, pos);
        }
    }

    #[test]
    fn test_pop_spawns_burst_and_respawns_balloon() {
        let mut state = GameState::new(8, BOUNDS);
        for balloon in state.balloons.iter_mut() {
            balloon.pos = Vec2::new(-10_000.0, -10_000.0);
        }
        let center = Vec2::new(320.0, 240.0);
        state.balloons[3].pos = center;
        state.balloons[3].diameter = 120.0;
        state.balloons[3].color = BONUS_COLOR;

        handle_click(&mut state, center).expect("hit");

        assert_eq!(state.score, 1);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].particles.len(), PARTICLES_PER_BURST);
        // Burst originates around the balloon's prior center
        let spread = 120.0 / 6.0;
        for particle in &state.explosions[0].particles {
            assert!((particle.pos.x - center.x).abs() <= spread);
            assert!((particle.pos.y - center.y).abs() <= spread);
        }
        // The popped balloon respawned below the bottom edge immediately
        assert!(state.balloons[3].pos.y >= BOUNDS.y);
        assert_eq!(state.balloons.len(), NUM_BALLOONS);
    }

    #[test]
    fn test_overlapping_click_pops_only_topmost() {
        let mut state = GameState::new(9, BOUNDS);
        for balloon in state.balloons.iter_mut() {
            balloon.pos = Vec2::new(-10_000.0, -10_000.0);
        }
        let center = Vec2::new(400.0, 300.0);
        state.balloons[1].pos = center;
        state.balloons[1].diameter = 100.0;
        state.balloons[1].color = PaletteColor::Coral;
        state.balloons[6].pos = center;
        state.balloons[6].diameter = 100.0;
        state.balloons[6].color = BONUS_COLOR;

        let event = handle_click(&mut state, center).expect("hit");
        // Later index is on top: only it pops
        assert!(event.bonus);
        assert_eq!(state.score, 1);
        assert_eq!(state.explosions.len(), 1);
        assert!(state.balloons[6].pos.y >= BOUNDS.y);
        assert_eq!(state.balloons[1].pos, center);
    }

    #[test]
    fn test_explosion_survives_while_any_particle_lives() {
        let mut state = GameState::new(10, BOUNDS);
        let mut dead = live_particle();
        dead.alpha = 0.0;
        let alive = live_particle();
        state.explosions.push(Explosion {
            particles: vec![dead, alive],
        });

        tick(&mut state);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_explosion_pruned_on_next_update_after_all_die() {
        let mut state = GameState::new(11, BOUNDS);
        let mut last = live_particle();
        last.alpha = 1.0; // fade 3.0 kills it on the next update
        state.explosions.push(Explosion {
            particles: vec![last],
        });

        tick(&mut state);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_particle_kinematics() {
        let mut state = GameState::new(12, BOUNDS);
        let particle = live_particle();
        state.explosions.push(Explosion {
            particles: vec![particle],
        });

        tick(&mut state);
        let updated = &state.explosions[0].particles[0];
        assert_eq!(updated.vel.y, particle.vel.y + particle.gravity);
        assert_eq!(updated.pos.x, particle.pos.x + particle.vel.x);
        assert_eq!(
            updated.pos.y,
            particle.pos.y + particle.vel.y + particle.gravity
        );
        assert_eq!(updated.alpha, particle.alpha - particle.fade);
        assert_eq!(updated.size, particle.size * particle.shrink);
    }

    #[test]
    fn test_bursts_decay_in_bounded_time() {
        let mut state = GameState::new(13, BOUNDS);
        let center = state.balloons[0].pos;
        handle_click(&mut state, center);
        assert!(!state.explosions.is_empty());

        // Max alpha 255 at min fade 2 dies within 128 frames
        for _ in 0..200 {
            tick(&mut state);
        }
        assert!(state.explosions.is_empty());
    }

    proptest! {
        #[test]
        fn prop_click_preserves_population_and_ranges(
            seed in any::<u64>(),
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
        ) {
            let mut state = GameState::new(seed, BOUNDS);
            handle_click(&mut state, Vec2::new(x, y));
            tick(&mut state);
            prop_assert_eq!(state.balloons.len(), NUM_BALLOONS);
            for balloon in &state.balloons {
                prop_assert!((50.0..200.0).contains(&balloon.diameter));
                prop_assert!((80.0..255.0).contains(&balloon.alpha));
                prop_assert!((1.0..5.0).contains(&balloon.speed));
            }
        }

        #[test]
        fn prop_score_moves_by_at_most_one(seed in any::<u64>(), x in 0.0f32..800.0, y in 0.0f32..600.0) {
            let mut state = GameState::new(seed, BOUNDS);
            let before = state.score;
            let event = handle_click(&mut state, Vec2::new(x, y));
            match event {
                Some(e) if e.bonus => prop_assert_eq!(state.score, before + 1),
                Some(_) => prop_assert_eq!(state.score, before - 1),
                None => prop_assert_eq!(state.score, before),
            }
        }
    }
}
