//! Canvas 2D presentation layer
//!
//! Pure output: reads the simulation state every frame and draws it.
//! Nothing here mutates game state.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::Settings;
use crate::consts::{BACKGROUND_COLOR, HUD_COLOR};
use crate::sim::GameState;

/// Angle of the decorative highlight square (upper-right quadrant)
const HIGHLIGHT_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;
/// Highlight distance from the balloon center, as a fraction of the radius
const HIGHLIGHT_DISTANCE: f32 = 0.65;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Resize the backing store to `width x height` CSS pixels at the
    /// given device pixel ratio. Drawing stays in CSS pixel coordinates.
    pub fn resize(
        &self,
        canvas: &HtmlCanvasElement,
        width: f32,
        height: f32,
        dpr: f64,
    ) -> Result<(), JsValue> {
        canvas.set_width((width as f64 * dpr) as u32);
        canvas.set_height((height as f64 * dpr) as u32);
        // Resizing resets the context transform
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }

    /// Draw one frame: background, balloons, bursts, HUD
    pub fn render(
        &self,
        state: &GameState,
        settings: &Settings,
        fps: u32,
        audio_unlocked: bool,
    ) {
        let ctx = &self.ctx;
        let bounds = state.bounds;

        ctx.set_fill_style_str(BACKGROUND_COLOR);
        ctx.fill_rect(0.0, 0.0, bounds.x as f64, bounds.y as f64);

        for balloon in &state.balloons {
            self.draw_balloon(balloon);
        }

        if settings.particles {
            for explosion in &state.explosions {
                self.draw_burst(explosion);
            }
        }

        self.draw_hud(state, settings, fps, audio_unlocked);
    }

    fn draw_balloon(&self, balloon: &crate::sim::Balloon) {
        let ctx = &self.ctx;
        let (r, g, b) = balloon.color.rgb();
        let radius = balloon.diameter / 2.0;

        ctx.set_fill_style_str(&rgba(r as f32, g as f32, b as f32, balloon.alpha));
        ctx.begin_path();
        let _ = ctx.arc(
            balloon.pos.x as f64,
            balloon.pos.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();

        // Decorative highlight square in the upper-right quadrant
        let side = balloon.diameter / 6.0;
        let center = balloon.pos
            + Vec2::new(HIGHLIGHT_ANGLE.cos(), HIGHLIGHT_ANGLE.sin()) * HIGHLIGHT_DISTANCE * radius;
        ctx.set_fill_style_str(&rgba(255.0, 255.0, 255.0, 120.0));
        ctx.fill_rect(
            (center.x - side / 2.0) as f64,
            (center.y - side / 2.0) as f64,
            side as f64,
            side as f64,
        );
    }

    fn draw_burst(&self, explosion: &crate::sim::Explosion) {
        let ctx = &self.ctx;
        for particle in &explosion.particles {
            let alpha = particle.alpha.max(0.0);
            if alpha <= 0.0 {
                continue;
            }
            let [r, g, b] = particle.color;
            ctx.set_fill_style_str(&rgba(r, g, b, alpha));
            ctx.begin_path();
            let _ = ctx.arc(
                particle.pos.x as f64,
                particle.pos.y as f64,
                (particle.size.max(0.5) / 2.0) as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }

    fn draw_hud(&self, state: &GameState, settings: &Settings, fps: u32, audio_unlocked: bool) {
        let ctx = &self.ctx;
        let bounds = state.bounds;

        ctx.set_fill_style_str(HUD_COLOR);
        ctx.set_font("32px Arial");
        ctx.set_text_align("right");
        ctx.set_text_baseline("top");
        let _ = ctx.fill_text(
            &format!("Score: {}", state.score),
            (bounds.x - 10.0) as f64,
            10.0,
        );

        if settings.show_fps {
            ctx.set_font("16px Arial");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&format!("{fps} fps"), 10.0, 10.0);
        }

        // Prompt until the first click unlocks the AudioContext
        if !audio_unlocked {
            let (w, h) = (420.0, 56.0);
            let (cx, cy) = (bounds.x as f64 / 2.0, bounds.y as f64 - 60.0);
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.63)");
            ctx.fill_rect(cx - w / 2.0, cy - h / 2.0, w, h);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("18px Arial");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let _ = ctx.fill_text("Click to enable sound", cx, cy);
        }
    }
}

/// CSS rgba() string from 0-255 channels and a 0-255 alpha
fn rgba(r: f32, g: f32, b: f32, alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r.clamp(0.0, 255.0)) as u8,
        (g.clamp(0.0, 255.0)) as u8,
        (b.clamp(0.0, 255.0)) as u8,
        (alpha.clamp(0.0, 255.0) / 255.0)
    )
}
