//! Kitchen Rush entry point
//!
//! On the web this exposes `WebGame` to the page's presentation layer. Natively
//! it runs a headless autoplay session and records the score.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use kitchen_rush::highscores::HighScoreStore;
    use kitchen_rush::persistence::{LocalStorage, MemoryStorage};
    use kitchen_rush::sim::{GameEngine, Notification, RecordingObserver};
    use kitchen_rush::{Catalog, GameConfig};

    /// Milliseconds between session ticks
    const TICK_INTERVAL_MS: i32 = (kitchen_rush::consts::TICK_SECONDS * 1000.0) as i32;

    #[derive(Default)]
    struct Callbacks {
        on_state: Option<js_sys::Function>,
        on_screen: Option<js_sys::Function>,
    }

    /// Everything the interval callback and the JS-facing methods share
    struct Shared {
        engine: RefCell<GameEngine>,
        observer: RecordingObserver,
        callbacks: RefCell<Callbacks>,
        interval: Cell<Option<i32>>,
        tick_closure: RefCell<Option<Closure<dyn FnMut()>>>,
    }

    impl Shared {
        /// Forward queued notifications to JS, outside any engine borrow
        fn flush(&self) {
            let events = self.observer.drain();
            if events.is_empty() {
                return;
            }
            let (on_state, on_screen) = {
                let cb = self.callbacks.borrow();
                (cb.on_state.clone(), cb.on_screen.clone())
            };
            for event in events {
                match event {
                    Notification::State(state) => {
                        if let (Some(f), Ok(json)) = (&on_state, serde_json::to_string(&state)) {
                            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                                log::warn!("State callback threw: {:?}", e);
                            }
                        }
                    }
                    Notification::Screen(screen) => {
                        if let Some(f) = &on_screen {
                            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(screen.as_str())) {
                                log::warn!("Screen callback threw: {:?}", e);
                            }
                        }
                    }
                }
            }
        }

        /// Start or stop the browser interval to match the engine
        fn sync_timer(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let ticking = self.engine.borrow().is_ticking();
            match (ticking, self.interval.get()) {
                (true, None) => {
                    let closure = self.tick_closure.borrow();
                    let Some(closure) = closure.as_ref() else {
                        return;
                    };
                    match window.set_interval_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        TICK_INTERVAL_MS,
                    ) {
                        Ok(handle) => self.interval.set(Some(handle)),
                        Err(e) => log::error!("Failed to start game timer: {:?}", e),
                    }
                }
                (false, Some(handle)) => {
                    window.clear_interval_with_handle(handle);
                    self.interval.set(None);
                }
                _ => {}
            }
        }

        fn on_tick(&self) {
            self.engine.borrow_mut().tick();
            self.flush();
            self.sync_timer();
        }
    }

    /// Game handle for the page script
    #[wasm_bindgen]
    pub struct WebGame {
        shared: Rc<Shared>,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: f64) -> WebGame {
            let high_scores = match LocalStorage::open() {
                Ok(storage) => HighScoreStore::open(storage),
                Err(e) => {
                    log::warn!("{e}; high scores will not survive a reload");
                    HighScoreStore::open(MemoryStorage::new())
                }
            };
            let observer = RecordingObserver::new();
            let engine = GameEngine::new(
                Catalog::standard(),
                GameConfig::default(),
                high_scores,
                seed as u64,
            )
            .with_observer(observer.clone());

            let shared = Rc::new(Shared {
                engine: RefCell::new(engine),
                observer,
                callbacks: RefCell::new(Callbacks::default()),
                interval: Cell::new(None),
                tick_closure: RefCell::new(None),
            });

            let weak: Weak<Shared> = Rc::downgrade(&shared);
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_tick();
                }
            });
            *shared.tick_closure.borrow_mut() = Some(closure);

            log::info!("Game initialized with seed: {}", seed as u64);
            WebGame { shared }
        }

        /// `on_state(json)` after every change, `on_screen(name)` on start/end
        pub fn set_callbacks(&self, on_state: js_sys::Function, on_screen: js_sys::Function) {
            *self.shared.callbacks.borrow_mut() = Callbacks {
                on_state: Some(on_state),
                on_screen: Some(on_screen),
            };
        }

        pub fn start_game(&self) {
            self.run(|e| e.start_game());
        }

        pub fn initialize_game(&self) {
            self.run(|e| e.initialize_game());
        }

        pub fn pause_game(&self) -> bool {
            self.run(|e| e.pause_game())
        }

        pub fn resume_game(&self) -> bool {
            self.run(|e| e.resume_game())
        }

        pub fn end_game(&self) -> bool {
            self.run(|e| e.end_game())
        }

        pub fn add_ingredient(&self, id: &str) -> bool {
            self.run(|e| e.add_ingredient(id))
        }

        pub fn remove_ingredient(&self, id: &str) -> bool {
            self.run(|e| e.remove_ingredient(id))
        }

        pub fn serve_dish(&self) -> bool {
            self.run(|e| e.serve_dish())
        }

        pub fn can_serve_dish(&self) -> bool {
            self.shared.engine.borrow().can_serve_dish()
        }

        pub fn state_json(&self) -> String {
            serde_json::to_string(&self.shared.engine.borrow().state()).unwrap_or_default()
        }

        pub fn ingredients_json(&self) -> String {
            serde_json::to_string(self.shared.engine.borrow().catalog().ingredients())
                .unwrap_or_default()
        }

        pub fn is_new_high_score(&self) -> bool {
            self.shared.engine.borrow().is_new_high_score()
        }

        pub fn save_high_score(&self, name: &str) -> Option<u32> {
            self.run(|e| e.save_high_score(name)).map(|rank| rank as u32)
        }

        pub fn high_scores_json(&self, limit: usize) -> String {
            let engine = self.shared.engine.borrow();
            serde_json::to_string(engine.high_scores().high_scores(limit)).unwrap_or_default()
        }

        pub fn clear_high_scores(&self) {
            self.shared.engine.borrow_mut().high_scores_mut().clear_all_scores();
        }
    }

    impl WebGame {
        /// Run a command, then forward notifications and resync the timer
        fn run<R>(&self, f: impl FnOnce(&mut GameEngine) -> R) -> R {
            let result = f(&mut self.shared.engine.borrow_mut());
            self.shared.flush();
            self.shared.sync_timer();
            result
        }
    }

    impl Drop for WebGame {
        fn drop(&mut self) {
            if let (Some(window), Some(handle)) = (web_sys::window(), self.shared.interval.take()) {
                window.clear_interval_with_handle(handle);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Kitchen Rush starting...");
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{Duration, Instant};

    use kitchen_rush::highscores::{DEFAULT_LIMIT, HighScoreStore, format_age};
    use kitchen_rush::persistence::{FileStorage, MemoryStorage};
    use kitchen_rush::platform::{TickClock, now_ms};
    use kitchen_rush::sim::{Autoplay, GameEngine, Notification, RecordingObserver, SessionPhase};
    use kitchen_rush::{Catalog, GameConfig};

    /// Path to a JSON `GameConfig`
    const CONFIG_ENV: &str = "KITCHEN_RUSH_CONFIG";
    /// Name recorded on the leaderboard
    const PLAYER_ENV: &str = "KITCHEN_RUSH_PLAYER";
    /// Skip real-time pacing
    const FAST_ENV: &str = "KITCHEN_RUSH_FAST";

    const FRAME: Duration = Duration::from_millis(100);

    pub fn run() {
        let config = std::env::var_os(CONFIG_ENV)
            .map(|path| GameConfig::load(Path::new(&path)))
            .unwrap_or_default();

        let high_scores = match FileStorage::open_default() {
            Ok(storage) => {
                log::info!("High scores stored in {}", storage.dir().display());
                HighScoreStore::open(storage)
            }
            Err(e) => {
                log::warn!("{e}; high scores will not be kept");
                HighScoreStore::open(MemoryStorage::new())
            }
        };

        let seed = now_ms() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let observer = RecordingObserver::new();
        let mut engine = GameEngine::new(Catalog::standard(), config, high_scores, seed)
            .with_observer(observer.clone());
        let mut bot = Autoplay::new(1);
        let fast = std::env::var_os(FAST_ENV).is_some();

        engine.start_game();
        let mut clock = TickClock::default();
        let mut last = Instant::now();

        while engine.phase() == SessionPhase::Active {
            let ticks = if fast {
                1
            } else {
                std::thread::sleep(FRAME);
                let now = Instant::now();
                let dt = now.duration_since(last).as_secs_f64();
                last = now;
                clock.advance(dt)
            };

            for _ in 0..ticks {
                bot.step(&mut engine);
                engine.tick();
            }

            for event in observer.drain() {
                if let Notification::Screen(screen) = event {
                    log::info!("Screen -> {}", screen.as_str());
                }
            }
        }

        let state = engine.state();
        println!(
            "\nSession over ({:?}): score {}, level {}",
            state.outcome, state.score, state.level
        );

        if engine.is_new_high_score() {
            let name = std::env::var(PLAYER_ENV).unwrap_or_else(|_| "Autoplay".to_string());
            if let Some(rank) = engine.save_high_score(&name) {
                println!("New high score! Rank #{rank}");
            }
        }

        println!("\nHigh scores:");
        let now = now_ms();
        for (i, entry) in engine.high_scores().high_scores(DEFAULT_LIMIT).iter().enumerate() {
            println!(
                "  #{:<2} {:<16} {:>7}  level {:<3} {}",
                i + 1,
                entry.player_name,
                entry.score,
                entry.level.map_or("-".to_string(), |l| l.to_string()),
                entry.timestamp.map_or(String::new(), |t| format_age(t, now)),
            );
        }

        engine.close();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Kitchen Rush (native) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
