//! Balloon Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use balloon_pop::Settings;
    use balloon_pop::audio::AudioManager;
    use balloon_pop::render::CanvasRenderer;
    use balloon_pop::sim::{GameState, handle_click, tick};
    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Flipped by the first pointer gesture
        audio_unlocked: bool,
    }

    impl Game {
        fn new(seed: u64, bounds: Vec2, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);
            Self {
                state: GameState::new(seed, bounds),
                renderer,
                audio,
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                audio_unlocked: false,
            }
        }

        /// Advance one animation frame
        fn update(&mut self, time: f64) {
            tick(&mut self.state);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            self.renderer
                .render(&self.state, &self.settings, self.fps, self.audio_unlocked);
        }

        /// Resolve a pointer press at canvas coordinates
        fn pointer_pressed(&mut self, x: f32, y: f32) {
            // First gesture unlocks the AudioContext; failures are
            // swallowed and never block gameplay
            if !self.audio_unlocked {
                self.audio.resume();
                self.audio_unlocked = true;
            }

            if let Some(pop) = handle_click(&mut self.state, Vec2::new(x, y)) {
                self.audio.play_pop(pop.sound_rate, pop.sound_volume);
                log::debug!(
                    "popped {:?} balloon ({}), score {}",
                    pop.color,
                    if pop.bonus { "+1" } else { "-1" },
                    self.state.score
                );
            }
        }

        /// Adopt a new canvas size
        fn resized(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let width = canvas.client_width() as f32;
            let height = canvas.client_height() as f32;
            if let Err(e) = self.renderer.resize(canvas, width, height, dpr) {
                log::warn!("Canvas resize failed: {e:?}");
            }
            self.state.resize(Vec2::new(width, height));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Balloon Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = canvas.client_width() as f32;
        let height = canvas.client_height() as f32;

        let renderer = CanvasRenderer::new(&canvas).expect("Failed to create renderer");
        renderer
            .resize(&canvas, width, height, dpr)
            .expect("Failed to size canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            Vec2::new(width, height),
            renderer,
        )));

        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&canvas, game.clone(), dpr);

        request_animation_frame(game);

        log::info!("Balloon Pop running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press - hit-test and pop
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer_pressed(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch press
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer_pressed(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>, dpr: f64) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resized(&canvas, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Balloon Pop (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning headless smoke simulation...");
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the simulation for a few seconds of frames and one click,
/// checking the core invariants hold outside the browser.
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use balloon_pop::consts::NUM_BALLOONS;
    use balloon_pop::sim::{GameState, handle_click, tick};
    use glam::Vec2;
    use std::time::{SystemTime, UNIX_EPOCH};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, Vec2::new(800.0, 600.0));

    for _ in 0..240 {
        tick(&mut state);
    }
    assert_eq!(state.balloons.len(), NUM_BALLOONS);

    // Click straight at a balloon center - guaranteed pop
    let target = state.balloons[0].pos;
    let pop = handle_click(&mut state, target);
    assert!(pop.is_some(), "Click at a balloon center must pop");
    assert_eq!(state.explosions.len(), 1);

    for _ in 0..240 {
        tick(&mut state);
    }
    assert!(state.explosions.is_empty(), "Bursts must decay");

    println!("✓ Smoke simulation passed (seed {seed}, score {})", state.score);
}
