//! Sky Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, MouseEvent, TouchEvent};

    use sky_shooter::Game;
    use sky_shooter::Settings;
    use sky_shooter::platform::web::DomPresenter;

    /// Game driver plus the page it draws on
    struct App {
        game: Game,
        presenter: DomPresenter,
        container: HtmlElement,
    }

    impl App {
        /// Container-relative coordinates of a viewport point
        fn to_playfield(&self, client_x: i32, client_y: i32) -> Option<(f32, f32)> {
            let rect = self.container.get_bounding_client_rect();
            let x = client_x as f64 - rect.left();
            let y = client_y as f64 - rect.top();
            if x.is_finite() && y.is_finite() {
                Some((x as f32, y as f32))
            } else {
                None
            }
        }

        /// Measure the container and hand queued events to the page
        fn sync(&mut self) {
            let playfield = self.presenter.playfield();
            self.game.set_playfield(playfield);
            self.game.present(&mut self.presenter);
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn new_seed(settings: &Settings) -> u64 {
        settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Sky Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = Settings::load();
        let presenter =
            DomPresenter::new(&document, &settings).ok_or("no #game-container element")?;
        let container: HtmlElement = document
            .get_element_by_id("game-container")
            .ok_or("no #game-container element")?
            .dyn_into()?;

        let seed = new_seed(&settings);
        let game = Game::new(settings, presenter.playfield(), seed);
        let app = Rc::new(RefCell::new(App {
            game,
            presenter,
            container: container.clone(),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(&document, app.clone());
        setup_input_handlers(&container, app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);

        log::info!("Sky Shooter running!");
        Ok(())
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("start-button") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.sync();
                a.game.start(now());
                a.sync();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #start-button");
        }

        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                let seed = new_seed(a.game.settings());
                a.game.restart(now(), seed);
                a.sync();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #restart-button");
        }
    }

    fn setup_input_handlers(container: &HtmlElement, app: Rc<RefCell<App>>) {
        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let point = a.to_playfield(event.client_x(), event.client_y());
                a.game.pointer_moved(point);
            });
            let _ = container
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let point = event
                    .touches()
                    .get(0)
                    .and_then(|touch| a.to_playfield(touch.client_x(), touch.client_y()));
                a.game.touch_start(point);
            });
            let _ = container
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let point = event
                    .touches()
                    .get(0)
                    .and_then(|touch| a.to_playfield(touch.client_x(), touch.client_y()));
                a.game.touch_move(point);
            });
            let _ = container
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().game.touch_end();
            });
            let _ = container
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let playfield = a.presenter.playfield();
            a.game.set_playfield(playfield);
            log::debug!("Playfield resized to {}x{}", playfield.width, playfield.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window for animation frame");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.game.frame(time);
            a.sync();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_shooter::platform::HeadlessPresenter;
    use sky_shooter::sim::{GamePhase, Playfield};
    use sky_shooter::{Game, GameVariant, Settings};

    env_logger::init();
    log::info!("Sky Shooter (native) starting...");

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => GameVariant::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using arcade", name);
            GameVariant::Arcade
        }),
        None => GameVariant::Arcade,
    };
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let settings = Settings::from_preset(variant);
    let seed = settings.seed.unwrap_or_else(rand::random);
    let playfield = Playfield::new(480.0, 720.0);
    let mut game = Game::new(settings, playfield, seed);
    let mut presenter = HeadlessPresenter::recording();

    game.start(0.0);

    // Sweep the pointer left and right along the player's row at 60 Hz
    let frame_ms = 1000.0 / 60.0;
    let row = playfield.height * 0.8;
    let mut now = 0.0;
    let mut logged = 0;
    while now < seconds * 1000.0 && game.phase() == GamePhase::Running {
        now += frame_ms;
        let phase = (now / 4000.0).fract() as f32;
        let sweep = 1.0 - (2.0 * phase - 1.0).abs();
        game.pointer_moved(Some((sweep * playfield.width, row)));
        game.frame(now);
        game.present(&mut presenter);

        for line in &presenter.lines()[logged..] {
            log::debug!("{}", line);
        }
        logged = presenter.lines().len();
    }

    let summary = serde_json::json!({
        "variant": variant.as_str(),
        "seed": seed,
        "elapsed_ms": now.round(),
        "ticks": game.state().time_ticks,
        "phase": game.phase(),
        "presented": presenter.summary(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode run summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
