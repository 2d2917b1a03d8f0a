//! Audio system using Web Audio API
//!
//! Procedurally generated pop sound - no external files needed.
//! Playback is fire-and-forget: every failure path is swallowed and
//! never reaches the simulation.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the balloon pop. `rate` varies the pitch around 1.0 and
    /// `volume` scales this one pop; both come from the simulation's
    /// shared RNG so no two pops sound quite alike.
    pub fn play_pop(&self, rate: f32, volume: f32) {
        let vol = self.effective_volume() * volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();

        // Body of the pop - quick downward sine sweep
        if let Some((osc, gain)) = self.create_osc(ctx, 520.0 * rate, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                .ok();
            osc.frequency().set_value_at_time(520.0 * rate, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(140.0 * rate, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        // Short high snap on top
        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0 * rate, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.07).ok();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
