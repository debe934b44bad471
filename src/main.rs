//! Frog Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use frog_dash::Game;
    use frog_dash::game::{GamePhase, HeadlessRenderer};
    use frog_dash::platform::web::{DomScoreSink, FetchLoader, read_tuning};
    use frog_dash::renderer::RenderState;

    /// Game plus the GPU state it draws into
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        /// Stand-in while the GPU is unavailable
        headless: HeadlessRenderer,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            match self.render_state.as_mut() {
                Some(render_state) => self.game.frame(time, render_state),
                None => self.game.frame(time, &mut self.headless),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Frog Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            read_tuning(),
            seed,
            Box::new(FetchLoader::new()),
            Box::new(DomScoreSink::new("score-board")),
        );
        let app = Rc::new(RefCell::new(App {
            game,
            render_state: None,
            headless: HeadlessRenderer::default(),
        }));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device, running without rendering: {}", e),
        }

        setup_buttons(app.clone());
        setup_keyboard(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Frog Dash running!");
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start: begin the session and take the button away
        if let Some(btn) = document.get_element_by_id("start-button") {
            let app = app.clone();
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.start();
                btn_clone.remove();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause: label shows the action the next click performs
        if let Some(btn) = document.get_element_by_id("pause-button") {
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let phase = app.borrow_mut().game.toggle_pause();
                match phase {
                    GamePhase::Paused => btn_clone.set_text_content(Some("RESUME")),
                    GamePhase::Running => btn_clone.set_text_content(Some("PAUSE")),
                    GamePhase::NotStarted | GamePhase::Over => {}
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    app.borrow_mut().game.press_jump();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    app.borrow_mut().game.release_jump();
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: fixed 60 Hz frames with a simple jump autopilot
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use frog_dash::assets::EmbeddedLoader;
    use frog_dash::game::HeadlessRenderer;
    use frog_dash::platform::LogScoreSink;
    use frog_dash::{Game, GamePhase, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this many simulated seconds
    const MAX_SECONDS: f64 = 120.0;
    /// Jump when the next obstacle is this close in front
    const JUMP_LEAD: f32 = 3.5;
    const DEFAULT_SEED: u64 = 42;

    pub fn load_tuning(path: Option<&str>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn parse_seed(arg: Option<&str>) -> u64 {
        match arg.map(str::parse::<u64>) {
            Some(Ok(seed)) => seed,
            Some(Err(e)) => {
                log::warn!("Invalid seed ({}), using {}", e, DEFAULT_SEED);
                DEFAULT_SEED
            }
            None => DEFAULT_SEED,
        }
    }

    /// Hold jump while an obstacle is about to reach the player
    fn autopilot(game: &mut Game) {
        let (Some(player), Some(world)) = (game.player(), game.world()) else {
            return;
        };
        let px = player.position().x;
        let reach = player.bounds().radius;

        let gap = world
            .colliders()
            .iter()
            .map(|o| o.collider())
            .filter(|c| !c.is_empty() && c.max.x >= px - reach)
            .map(|c| c.min.x - (px + reach))
            .fold(f32::INFINITY, f32::min);

        if gap < JUMP_LEAD && player.on_ground() {
            game.press_jump();
        } else {
            game.release_jump();
        }
    }

    pub fn run(tuning: Tuning, seed: u64) {
        let mut game = Game::new(
            tuning,
            seed,
            Box::new(EmbeddedLoader::new()),
            Box::new(LogScoreSink::new(1000)),
        );
        let mut renderer = HeadlessRenderer::default();
        game.start();

        let max_frames = (MAX_SECONDS * 1000.0 / FRAME_MS) as u64;
        let mut frame = 0;
        while game.phase() == GamePhase::Running && frame < max_frames {
            autopilot(&mut game);
            game.frame(frame as f64 * FRAME_MS, &mut renderer);
            frame += 1;
        }

        let seconds = frame as f64 * FRAME_MS / 1000.0;
        match game.phase() {
            GamePhase::Over => log::info!(
                "Game over after {:.1}s, final score: {}",
                seconds,
                game.score_text()
            ),
            _ => log::info!(
                "Survived {:.1}s, score: {}",
                seconds,
                game.score_text()
            ),
        }
        log::info!("Rendered {} frames", renderer.frames);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Frog Dash (native, headless) starting...");
    log::info!("Run with `trunk serve` for the web version");

    // Usage: frog-dash [tuning.json] [seed]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = headless::load_tuning(args.first().map(String::as_str));
    let seed = headless::parse_seed(args.get(1).map(String::as_str));

    headless::run(tuning, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
