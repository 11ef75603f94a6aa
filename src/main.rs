//! Volley entry point
//!
//! On the web: wires DOM input and menu buttons to the mode controller and
//! drives the frame loop. Natively: plays a headless demo match.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use volley::audio::WebAudio;
    use volley::input::is_mute_key;
    use volley::renderer::{CanvasRenderer, panel_visibility, scene};
    use volley::sim::{MatchState, Mode, Surface, handle, step};
    use volley::{Action, Control, InputEvent, Settings};

    const MENU_BUTTONS: [&str; 4] = [
        "single-player-btn",
        "two-player-btn",
        "play-again-btn",
        "main-menu-btn",
    ];

    /// Game instance holding all state
    struct Game {
        state: MatchState,
        audio: WebAudio,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        /// A frame callback is pending
        running: bool,
        last_mode: Mode,
    }

    impl Game {
        fn new(surface: Surface, seed: u64, renderer: Option<CanvasRenderer>) -> Self {
            let settings = Settings::load();
            let mut audio = WebAudio::new();
            audio.apply_settings(&settings);
            let state = MatchState::new(surface, seed);
            let last_mode = state.mode;
            Self {
                state,
                audio,
                renderer,
                settings,
                running: false,
                last_mode,
            }
        }

        fn dispatch(&mut self, event: InputEvent) {
            if let Some(t) = handle(&mut self.state, event, &mut self.audio) {
                log::info!("{:?} -> {:?}", t.from, t.to);
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&scene(&self.state));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Volley starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into().ok());
        let Some(canvas) = canvas else {
            log::error!("No #gameCanvas element - cannot start");
            return;
        };

        let surface = Surface::new(canvas.width() as f32, canvas.height() as f32);
        let renderer = CanvasRenderer::new(&canvas);
        if renderer.is_none() {
            log::warn!("Canvas 2D context unavailable - rendering disabled");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(surface, seed, renderer)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_focus_handlers(game.clone());

        sync_dom(&document, &game.borrow().state);
        log::info!("Volley running!");
    }

    /// Route an event, then refresh the DOM and restart the loop if needed
    fn dispatch(game: &Rc<RefCell<Game>>, event: InputEvent) {
        {
            let mut g = game.borrow_mut();
            g.dispatch(event);
        }
        after_change(game, true);
    }

    /// Refresh the DOM when forced or the mode moved, and restart the loop if needed
    fn after_change(game: &Rc<RefCell<Game>>, force_sync: bool) {
        let start_loop = {
            let mut g = game.borrow_mut();
            if force_sync || g.state.mode != g.last_mode {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    sync_dom(&document, &g.state);
                }
                g.last_mode = g.state.mode;
            }
            let start = !g.running && g.state.frame_loop_active();
            if start {
                g.running = true;
            }
            start
        };
        if start_loop {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow().audio.resume();
                if is_mute_key(&event.key()) && !event.repeat() {
                    toggle_mute(&game);
                    return;
                }
                if let Some(control) = Control::from_key(&event.key(), &event.code()) {
                    // Keep Space and arrows from scrolling the page
                    event.prevent_default();
                    if !event.repeat() {
                        dispatch(&game, InputEvent::Press(control));
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(control) = Control::from_key(&event.key(), &event.code()) {
                    dispatch(&game, InputEvent::Release(control));
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Flip the mute preference, apply it and persist it
    fn toggle_mute(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let muted = g.settings.toggle_mute();
        g.audio.set_muted(muted);
        g.settings.save();
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in MENU_BUTTONS {
            let Some(action) = Action::from_button_id(id) else {
                continue;
            };
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Menu button #{} missing", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow().audio.resume();
                dispatch(&game, InputEvent::Action(action));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let (pause, mute) = {
                    let g = game.borrow();
                    (g.settings.pause_on_blur, g.settings.mute_on_blur)
                };
                if mute {
                    game.borrow_mut().audio.set_muted(true);
                }
                if pause && game.borrow().state.mode == Mode::Playing {
                    log::info!("Auto-paused (window blur)");
                    dispatch(&game, InputEvent::Press(Control::Pause));
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let Game { state, audio, .. } = &mut *g;
            step(state, audio);
            audio.pump();
            g.render();
            let active = g.state.frame_loop_active();
            if !active {
                g.running = false;
            }
            active
        };
        after_change(&game, false);
        if keep_going {
            request_animation_frame(game);
        }
    }

    /// Toggle only the `hidden` class, leaving page styling intact
    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Show the menu, canvas and winner panel that match the state
    fn sync_dom(document: &Document, state: &MatchState) {
        for (id, visible) in panel_visibility(state) {
            set_hidden(document, id, !visible);
        }
        if let (Mode::Finished, Some(winner)) = (state.mode, state.winner) {
            if let Some(el) = document.get_element_by_id("winner-text") {
                el.set_text_content(Some(&format!("Congratulations! {} Wins!", winner.label())));
            }
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
    env_logger::init();
    log::info!("Volley (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless single-player match with a simple stand-in for the left player
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use volley::consts::PADDLE_HEIGHT;
    use volley::sim::{ControlMode, MatchState, Mode, Surface, handle, step};
    use volley::{Action, Control, InputEvent, SilentAudio};

    const MAX_TICKS: u64 = 500_000;

    fn send(state: &mut MatchState, audio: &mut SilentAudio, event: InputEvent) {
        if let Some(t) = handle(state, event, audio) {
            log::info!("{:?} -> {:?}", t.from, t.to);
        }
    }

    pub fn run(seed: u64) {
        let mut state = MatchState::new(Surface::default(), seed);
        let mut audio = SilentAudio;

        send(
            &mut state,
            &mut audio,
            InputEvent::Action(Action::StartMatch(ControlMode::SinglePlayer)),
        );
        send(&mut state, &mut audio, InputEvent::Press(Control::Begin));

        let mut ticks = 0;
        while state.mode != Mode::Finished && ticks < MAX_TICKS {
            // Chase the ball, a little sluggishly
            let center = state.paddle_left_y + PADDLE_HEIGHT / 2.0;
            let (up, down) = if state.ball.vel.x < 0.0 {
                (state.ball.pos.y < center - 20.0, state.ball.pos.y > center + 20.0)
            } else {
                (false, false)
            };
            for (control, held) in [(Control::LeftUp, up), (Control::LeftDown, down)] {
                let event = if held {
                    InputEvent::Press(control)
                } else {
                    InputEvent::Release(control)
                };
                send(&mut state, &mut audio, event);
            }

            step(&mut state, &mut audio);

            if state.mode == Mode::WaitingToContinue {
                log::info!("Score {} - {}", state.score_left, state.score_right);
                send(&mut state, &mut audio, InputEvent::Press(Control::Begin));
            }
            ticks += 1;
        }

        match state.winner {
            Some(winner) => println!(
                "{} wins {} - {} after {} ticks",
                winner.label(),
                state.score_left,
                state.score_right,
                ticks
            ),
            None => println!(
                "No winner after {} ticks ({} - {})",
                ticks, state.score_left, state.score_right
            ),
        }
    }
}
