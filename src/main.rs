//! Crown Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use crown_runner::platform;
    use crown_runner::records::RunRecords;
    use crown_runner::render;
    use crown_runner::settings::Settings;
    use crown_runner::sim::{RunEvent, RunPhase, RunSummary, TickInput, World, tick};

    /// Game instance holding all state
    struct Game {
        world: World,
        ctx: CanvasRenderingContext2d,
        input: TickInput,
        settings: Settings,
        records: RunRecords,
        /// Host-assignable completion hook, fired once per crashed run
        on_game_over: Option<Box<dyn FnMut(RunSummary)>>,
        /// Guards against double-scheduling the frame loop
        loop_running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(world: World, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                world,
                ctx,
                input: TickInput::default(),
                settings: Settings::load(),
                records: RunRecords::load(),
                on_game_over: None,
                loop_running: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the simulation one tick and react to its events
        fn update(&mut self, time: f64) {
            let mut crashed = false;

            if self.world.is_running() {
                let input = self.input.clone();
                tick(&mut self.world, &input);
                // Clear one-shot inputs after processing
                self.input.jump = false;

                for event in self.world.drain_events() {
                    match event {
                        RunEvent::Jumped | RunEvent::CoinCollected => {
                            if self.settings.haptics {
                                platform::haptic_impact();
                            }
                        }
                        RunEvent::Crashed => {
                            crashed = true;
                            if self.settings.haptics {
                                platform::haptic_error();
                            }
                        }
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Collision-triggered termination: completion notification and
            // records. Host stop does not reach here (no Crashed event).
            if crashed {
                let summary = self.world.summary();
                log::info!(
                    "Run over: score {} coins {}",
                    summary.score,
                    summary.coins_collected
                );
                if self.records.record(summary, js_sys::Date::now()).is_some() {
                    self.records.save();
                }
                if let Some(callback) = self.on_game_over.as_mut() {
                    callback(summary);
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            render::render(&self.ctx, &self.world, &self.settings);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("game-score") {
                el.set_text_content(Some(&format!("Score: {}", self.world.score)));
            }
            if let Some(el) = document.get_element_by_id("game-coins") {
                el.set_text_content(Some(&format!("Coins: {}", self.world.coins_collected)));
            }
            if let Some(el) = document.get_element_by_id("game-best") {
                if let Some(best) = self.records.best_score() {
                    el.set_text_content(Some(&format!("Best: {}", best)));
                }
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Crown Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let ctx = size_canvas(&canvas);

        // Difficulty tier comes from the embedding page
        let tier = canvas
            .get_attribute("data-tier")
            .and_then(|t| t.parse::<u32>().ok())
            .unwrap_or(1);

        let seed = js_sys::Date::now() as u64;
        let world = World::new(
            canvas.client_width() as f32,
            canvas.client_height() as f32,
            tier,
            seed,
        );
        log::info!("World created: tier {}, seed {}", tier, seed);

        let mut game = Game::new(world, ctx);

        // Completion notification: show the game-over overlay
        game.on_game_over = Some(Box::new(|summary: RunSummary| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&summary.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-coins") {
                el.set_text_content(Some(&summary.coins_collected.to_string()));
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        }));

        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_auto_stop(game.clone());

        // First paint while idle, before any run begins
        {
            let g = game.borrow();
            g.render();
            g.update_hud();
        }

        log::info!("Crown Runner ready");
    }

    /// Size the canvas backing store to the device pixel ratio and return
    /// a context scaled back to CSS pixels (the simulation's space)
    fn size_canvas(canvas: &HtmlCanvasElement) -> CanvasRenderingContext2d {
        let window = web_sys::window().expect("no window");
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        let _ = ctx.scale(dpr, dpr);
        ctx
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard (Space / ArrowUp)
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        game.borrow_mut().input.jump = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    g.world.start();
                    g.input = TickInput::default();
                }
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", "hidden");
                }
                schedule_frame(game.clone());
                log::info!("Run started");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let ctx = size_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.ctx = ctx;
            g.world
                .set_viewport(canvas.client_width() as f32, canvas.client_height() as f32);
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Visibility loss stops the run; there is no pause state
    fn setup_auto_stop(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.world.is_running() {
                    g.world.stop();
                    log::info!("Run stopped (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the next frame, guarding against a second live chain
    fn schedule_frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
        }
        request_animation_frame(game);
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
        let keep_running = {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
            let keep = g.world.phase == RunPhase::Running;
            if !keep {
                // The chain ends naturally with the run
                g.loop_running = false;
            }
            keep
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use crown_runner::sim::{TickInput, World, tick};

    env_logger::init();
    log::info!("Crown Runner (native) headless demo");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let tier = std::env::var("RUNNER_TIER")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(1);

    let mut world = World::new(800.0, 400.0, tier, seed);
    world.start();

    let input = TickInput::default();
    while world.is_running() && world.score < 10_000 {
        // Naive autopilot: hop over anything approaching at ground level
        let should_jump = world.obstacles.iter().any(|o| {
            o.kind.ground_offset() < 40.0
                && o.pos.x > world.player.pos.x
                && o.pos.x < world.player.pos.x + 130.0
        });
        if should_jump {
            world.jump();
        }
        tick(&mut world, &input);
        world.drain_events();
    }

    let summary = world.summary();
    println!(
        "Run ended: score {} coins {} (tier {}, seed {})",
        summary.score, summary.coins_collected, tier, seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
